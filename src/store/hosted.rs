//! Hosted member store.
//!
//! Talks to a PocketBase-shaped record API. Each stored record carries the
//! backend's own opaque record key plus the member document wrapped under a
//! `member` field, so member ids and record keys are unrelated and lookups
//! scan the fetched page for a matching member id.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{Member, MemberDraft};
use crate::store::MemberStore;

/// Member store backed by a hosted record collection.
pub struct HostedStore {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    /// Highest member id this instance has issued or seen. Keeps ids
    /// monotonic even when the listed page lags behind a recent create.
    high_water: Mutex<i64>,
}

/// One page of records as the backend returns them.
#[derive(Debug, Deserialize)]
struct RecordPage {
    items: Vec<MemberRecord>,
}

/// A stored record: the backend's record key plus the wrapped member.
#[derive(Debug, Deserialize)]
struct MemberRecord {
    id: String,
    member: Member,
}

/// Write payload: the backend assigns the record key itself.
#[derive(Serialize)]
struct RecordPayload<'a> {
    member: &'a Member,
}

impl HostedStore {
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            collection: collection.into(),
            high_water: Mutex::new(0),
        }
    }

    fn records_url(&self) -> String {
        format!(
            "{}/api/collections/{}/records",
            self.base_url, self.collection
        )
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.records_url(), record_id)
    }

    /// Fetch the full collection in one page; it is small by assumption.
    async fn fetch_records(&self) -> Result<Vec<MemberRecord>, AppError> {
        let response = self
            .http
            .get(self.records_url())
            .query(&[("perPage", "500")])
            .send()
            .await?;
        let page: RecordPage = ensure_success(response)?.json().await?;
        Ok(page.items)
    }

    async fn allocate_id(&self, records: &[MemberRecord]) -> i64 {
        let listed_max = records.iter().map(|r| r.member.id).max().unwrap_or(0);
        let mut high = self.high_water.lock().await;
        let id = (*high).max(listed_max) + 1;
        *high = id;
        id
    }
}

#[async_trait]
impl MemberStore for HostedStore {
    async fn list(&self) -> Result<Vec<Member>, AppError> {
        let records = self.fetch_records().await?;
        Ok(records.into_iter().map(|r| r.member).collect())
    }

    async fn create(&self, draft: MemberDraft) -> Result<Member, AppError> {
        draft.validate_create()?;

        let records = self.fetch_records().await?;
        let id = self.allocate_id(&records).await;
        let member = draft.into_member(id);

        let response = self
            .http
            .post(self.records_url())
            .json(&RecordPayload { member: &member })
            .send()
            .await?;
        ensure_success(response)?;

        tracing::debug!(id, "member created in hosted collection");
        Ok(member)
    }

    async fn update(&self, draft: MemberDraft) -> Result<Member, AppError> {
        let id = draft.validate_update()?;

        let records = self.fetch_records().await?;
        let Some(record) = records.iter().find(|r| r.member.id == id) else {
            return Err(AppError::NotFound("Member not found".to_string()));
        };
        let merged = record.member.merged_with(&draft);

        let response = self
            .http
            .patch(self.record_url(&record.id))
            .json(&RecordPayload { member: &merged })
            .send()
            .await?;
        ensure_success(response)?;

        tracing::debug!(id, "member updated in hosted collection");
        Ok(merged)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let records = self.fetch_records().await?;
        let Some(record) = records.iter().find(|r| r.member.id == id) else {
            return Err(AppError::NotFound("Member not found".to_string()));
        };

        let response = self.http.delete(self.record_url(&record.id)).send().await?;
        ensure_success(response)?;

        tracing::debug!(id, "member deleted from hosted collection");
        Ok(())
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::Storage(format!(
            "Hosted backend returned {}",
            status
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, patch};
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    #[derive(Clone, Serialize)]
    struct FakeRecord {
        id: String,
        member: Member,
    }

    type FakeRecords = Arc<Mutex<Vec<FakeRecord>>>;

    async fn fake_list(State(records): State<FakeRecords>) -> Json<serde_json::Value> {
        let records = records.lock().unwrap();
        Json(json!({
            "page": 1,
            "perPage": 500,
            "totalItems": records.len(),
            "totalPages": 1,
            "items": &*records,
        }))
    }

    async fn fake_create(
        State(records): State<FakeRecords>,
        Json(body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        let member: Member = serde_json::from_value(body["member"].clone()).unwrap();
        let record_id = uuid::Uuid::new_v4().simple().to_string();
        records.lock().unwrap().push(FakeRecord {
            id: record_id.clone(),
            member,
        });
        Json(json!({ "id": record_id }))
    }

    async fn fake_patch(
        State(records): State<FakeRecords>,
        Path((_, record_id)): Path<(String, String)>,
        Json(body): Json<serde_json::Value>,
    ) -> Result<Json<serde_json::Value>, StatusCode> {
        let member: Member = serde_json::from_value(body["member"].clone()).unwrap();
        let mut records = records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == record_id) {
            Some(record) => {
                record.member = member;
                Ok(Json(json!({ "id": record_id })))
            }
            None => Err(StatusCode::NOT_FOUND),
        }
    }

    async fn fake_delete(
        State(records): State<FakeRecords>,
        Path((_, record_id)): Path<(String, String)>,
    ) -> StatusCode {
        let mut records = records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::NO_CONTENT
        }
    }

    async fn spawn_backend(records: FakeRecords) -> String {
        let app = Router::new()
            .route(
                "/api/collections/{collection}/records",
                get(fake_list).post(fake_create),
            )
            .route(
                "/api/collections/{collection}/records/{record_id}",
                patch(fake_patch).delete(fake_delete),
            )
            .with_state(records);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn draft(name: &str, username: &str) -> MemberDraft {
        MemberDraft {
            name: Some(name.to_string()),
            username: Some(username.to_string()),
            email: Some(format!("{}@edunova.io", username)),
            role: Some("Software Engineer".to_string()),
            status: Some("Active".to_string()),
            teams: Some(vec!["Engineering".to_string()]),
            ..MemberDraft::default()
        }
    }

    fn seeded(id: i64, name: &str, username: &str) -> Member {
        draft(name, username).into_member(id)
    }

    #[tokio::test]
    async fn test_create_wraps_member_and_assigns_ids() {
        let records: FakeRecords = Arc::new(Mutex::new(Vec::new()));
        let base_url = spawn_backend(records.clone()).await;
        let store = HostedStore::new(base_url, "ed_members");

        let amy = store.create(draft("Amy Ito", "amy")).await.unwrap();
        let bo = store.create(draft("Bo Chen", "bo")).await.unwrap();
        assert_eq!(amy.id, 1);
        assert_eq!(bo.id, 2);

        let stored = records.lock().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].member.name, "Amy Ito");
        assert!(!stored[0].id.is_empty());
        assert_ne!(stored[0].id, "1");
    }

    #[tokio::test]
    async fn test_counter_rides_over_listed_ids() {
        let records: FakeRecords = Arc::new(Mutex::new(vec![FakeRecord {
            id: "r-abc".to_string(),
            member: seeded(41, "Amy Ito", "amy"),
        }]));
        let base_url = spawn_backend(records.clone()).await;
        let store = HostedStore::new(base_url, "ed_members");

        let bo = store.create(draft("Bo Chen", "bo")).await.unwrap();
        assert_eq!(bo.id, 42);
    }

    #[tokio::test]
    async fn test_update_scans_for_member_id() {
        let records: FakeRecords = Arc::new(Mutex::new(vec![
            FakeRecord {
                id: "r-abc".to_string(),
                member: seeded(7, "Amy Ito", "amy"),
            },
            FakeRecord {
                id: "r-def".to_string(),
                member: seeded(9, "Bo Chen", "bo"),
            },
        ]));
        let base_url = spawn_backend(records.clone()).await;
        let store = HostedStore::new(base_url, "ed_members");

        let mut patch = draft("Bo Chen", "bo");
        patch.id = Some(9);
        patch.role = Some("Product Manager".to_string());
        let merged = store.update(patch).await.unwrap();
        assert_eq!(merged.id, 9);
        assert_eq!(merged.role, "Product Manager");

        let stored = records.lock().unwrap();
        assert_eq!(stored[1].id, "r-def");
        assert_eq!(stored[1].member.role, "Product Manager");
        assert_eq!(stored[0].member.role, "Software Engineer");
    }

    #[tokio::test]
    async fn test_delete_by_member_id() {
        let records: FakeRecords = Arc::new(Mutex::new(vec![FakeRecord {
            id: "r-abc".to_string(),
            member: seeded(7, "Amy Ito", "amy"),
        }]));
        let base_url = spawn_backend(records.clone()).await;
        let store = HostedStore::new(base_url, "ed_members");

        store.delete(7).await.unwrap();
        assert!(records.lock().unwrap().is_empty());

        let err = store.delete(7).await.unwrap_err();
        assert_eq!(err.message(), "Member not found");
    }

    #[tokio::test]
    async fn test_backend_failure_is_storage_error() {
        let app = Router::new().route(
            "/api/collections/{collection}/records",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let store = HostedStore::new(format!("http://{}", addr), "ed_members");
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
