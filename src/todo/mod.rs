//! Todo module
//!
//! The single record type served by the backend and the in-memory list holding it.

mod model;
mod store;

pub use model::Todo;
pub use store::TodoStore;
