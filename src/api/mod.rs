//! REST API module.
//!
//! Contains all routes and handlers of the gateway surface: the member
//! collection plus the shared catalog. Error responses are plain
//! `{"error": "..."}` bodies produced by [`crate::errors::AppError`].

mod catalog;
mod members;

pub use catalog::*;
pub use members::*;
