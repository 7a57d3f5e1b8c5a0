//! Member store backends.
//!
//! The gateway talks to its collection through the [`MemberStore`] trait so
//! the REST surface stays identical whether records live in a flat JSON
//! document on disk or in a hosted record collection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, StoreBackend};
use crate::errors::AppError;
use crate::models::{Member, MemberDraft};

mod file;
mod hosted;

pub use file::FileStore;
pub use hosted::HostedStore;

/// Capability interface over a member collection.
///
/// Mutations validate first and leave the collection untouched on failure.
/// Assigned ids grow monotonically within a store instance and are never
/// reused after a delete.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// All members in stored order.
    async fn list(&self) -> Result<Vec<Member>, AppError>;

    /// Validate the draft, assign the next id, and append the record.
    async fn create(&self, draft: MemberDraft) -> Result<Member, AppError>;

    /// Merge the draft over the record addressed by its id.
    async fn update(&self, draft: MemberDraft) -> Result<Member, AppError>;

    /// Remove the record with the given id.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

/// Build the store selected by configuration.
pub async fn open_store(config: &Config) -> Result<Arc<dyn MemberStore>, AppError> {
    match &config.store {
        StoreBackend::File { path } => Ok(Arc::new(FileStore::open(path.clone()).await?)),
        StoreBackend::Hosted {
            base_url,
            collection,
        } => Ok(Arc::new(HostedStore::new(base_url, collection))),
    }
}
