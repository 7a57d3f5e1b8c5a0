//! Data models for the member directory.
//!
//! The wire shapes use camelCase field names so stored documents and API
//! payloads read the same in every client.

mod member;

pub use member::*;
