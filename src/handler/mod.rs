//! Request handler module
//!
//! Responsible for method dispatch on the todo route and the todo handlers themselves.

pub mod router;
pub mod todos;

// Re-export main entry point
pub use router::handle_request;
