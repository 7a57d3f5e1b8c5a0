//! Flat-file member store.
//!
//! Records live in one JSON array-of-objects document. Every operation reads
//! the whole document and mutations write it back whole; the collection is
//! small by assumption and a single process owns the file.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{Member, MemberDraft};
use crate::store::MemberStore;

/// Member store backed by a JSON document on disk.
pub struct FileStore {
    path: PathBuf,
    /// Next id to assign. Seeded past the highest stored id so ids stay
    /// monotonic across restarts and are never reused after a delete.
    next_id: Mutex<i64>,
}

impl FileStore {
    /// Open the document at `path`, creating an empty collection if the file
    /// does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }

        let members = match tokio::fs::read_to_string(&path).await {
            Ok(text) => parse_document(&text, &path)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                write_document(&path, &[]).await?;
                Vec::new()
            }
            Err(err) => {
                return Err(AppError::Storage(format!(
                    "Cannot read {}: {}",
                    path.display(),
                    err
                )))
            }
        };

        let highest = members.iter().map(|m| m.id).max().unwrap_or(0);
        Ok(Self {
            path,
            next_id: Mutex::new(highest + 1),
        })
    }

    /// Assign the next id, riding over ids that arrived in the document
    /// out of band.
    async fn allocate_id(&self, members: &[Member]) -> i64 {
        let stored_max = members.iter().map(|m| m.id).max().unwrap_or(0);
        let mut next = self.next_id.lock().await;
        let id = (*next).max(stored_max + 1);
        *next = id + 1;
        id
    }
}

#[async_trait]
impl MemberStore for FileStore {
    async fn list(&self) -> Result<Vec<Member>, AppError> {
        read_document(&self.path).await
    }

    async fn create(&self, draft: MemberDraft) -> Result<Member, AppError> {
        draft.validate_create()?;

        let mut members = read_document(&self.path).await?;
        let id = self.allocate_id(&members).await;
        let member = draft.into_member(id);
        members.push(member.clone());
        write_document(&self.path, &members).await?;

        tracing::debug!(id, "member created");
        Ok(member)
    }

    async fn update(&self, draft: MemberDraft) -> Result<Member, AppError> {
        let id = draft.validate_update()?;

        let mut members = read_document(&self.path).await?;
        let Some(slot) = members.iter_mut().find(|m| m.id == id) else {
            return Err(AppError::NotFound("Member not found".to_string()));
        };
        let merged = slot.merged_with(&draft);
        *slot = merged.clone();
        write_document(&self.path, &members).await?;

        tracing::debug!(id, "member updated");
        Ok(merged)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut members = read_document(&self.path).await?;
        let before = members.len();
        members.retain(|m| m.id != id);
        if members.len() == before {
            return Err(AppError::NotFound("Member not found".to_string()));
        }
        write_document(&self.path, &members).await?;

        tracing::debug!(id, "member deleted");
        Ok(())
    }
}

async fn read_document(path: &Path) -> Result<Vec<Member>, AppError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| AppError::Storage(format!("Cannot read {}: {}", path.display(), err)))?;
    parse_document(&text, path)
}

fn parse_document(text: &str, path: &Path) -> Result<Vec<Member>, AppError> {
    serde_json::from_str(text).map_err(|err| {
        AppError::Storage(format!(
            "Corrupt member document {}: {}",
            path.display(),
            err
        ))
    })
}

async fn write_document(path: &Path, members: &[Member]) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(members)
        .map_err(|err| AppError::Storage(format!("Cannot encode member document: {}", err)))?;
    tokio::fs::write(path, text)
        .await
        .map_err(|err| AppError::Storage(format!("Cannot write {}: {}", path.display(), err)))
}
