//! HTTP protocol layer module
//!
//! Response builders shared by the todo handlers, kept apart from request dispatch.

pub mod response;

// Re-export commonly used items
pub use response::{
    build_400_response, build_405_response, build_413_response, build_json_response,
    build_options_response,
};
