// In-memory todo store
// Lives for the lifetime of the process; nothing is persisted

use tokio::sync::RwLock;

use super::Todo;

/// Append-only list of todos shared by all connections
///
/// Readers take a snapshot so no lock is held while the response is written.
#[derive(Debug, Default)]
pub struct TodoStore {
    items: RwLock<Vec<Todo>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every todo in insertion order
    pub async fn list(&self) -> Vec<Todo> {
        self.items.read().await.clone()
    }

    /// Append a todo to the end of the list
    pub async fn push(&self, todo: Todo) {
        self.items.write().await.push(todo);
    }

    pub(crate) async fn len(&self) -> usize {
        self.items.read().await.len()
    }
}
