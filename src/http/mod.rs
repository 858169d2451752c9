//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the request handlers: MIME
//! lookup, `ETag` handling, Range parsing and response builders. Nothing in
//! here knows about the dashboard's route table.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_options_response,
};
