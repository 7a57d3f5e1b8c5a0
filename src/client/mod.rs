//! Client side of the directory.
//!
//! [`GatewayClient`] is the typed HTTP surface; [`Roster`] is the stateful
//! session a table UI drives. Every mutation goes through the gateway and is
//! followed by a full refetch, so the engine only ever renders
//! server-confirmed state. Refreshes that lose the race against a newer
//! refresh are discarded instead of overwriting fresher rows.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;

use crate::api::DeleteMemberRequest;
use crate::errors::{ClientError, ErrorBody};
use crate::models::{Member, MemberDraft};
use crate::view::{FacetFilters, MemberList, SortKey, SortOrder, ViewQuery};

/// Typed client for the gateway's REST surface.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_members(&self) -> Result<Vec<Member>, ClientError> {
        let response = self.http.get(self.url("/api/members")).send().await?;
        decode(response).await
    }

    pub async fn create_member(&self, draft: &MemberDraft) -> Result<Member, ClientError> {
        let response = self
            .http
            .post(self.url("/api/members"))
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update_member(&self, draft: &MemberDraft) -> Result<Member, ClientError> {
        let response = self
            .http
            .put(self.url("/api/members"))
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_member(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url("/api/members"))
            .json(&DeleteMemberRequest { id })
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    pub async fn list_roles(&self) -> Result<Vec<String>, ClientError> {
        let response = self.http.get(self.url("/api/roles")).send().await?;
        decode(response).await
    }

    pub async fn list_teams(&self) -> Result<Vec<String>, ClientError> {
        let response = self.http.get(self.url("/api/teams")).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let response = expect_success(response).await?;
    response
        .json()
        .await
        .map_err(|err| ClientError::Network(format!("invalid response body: {}", err)))
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("request failed with status {}", status),
    };
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// User-facing outcome of a roster operation, in toast wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl Notice {
    fn success(message: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.to_string(),
        }
    }
}

/// Hands out refresh tickets and decides which response may be adopted.
///
/// Only the most recently issued ticket is current; responses presenting an
/// older ticket lost the race and must be dropped.
#[derive(Debug, Default)]
struct RefreshGuard {
    issued: u64,
}

impl RefreshGuard {
    fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn is_current(&self, ticket: u64) -> bool {
        ticket == self.issued
    }
}

#[derive(Debug)]
struct RosterState {
    list: MemberList,
    guard: RefreshGuard,
    notices: Vec<Notice>,
}

/// A live roster session: the list engine plus its gateway mediation.
///
/// Cheap to clone; clones share the same state. View setters are synchronous
/// and recompute the visible rows immediately; collection changes go through
/// the gateway and resynchronize with a full [`Roster::refresh`].
#[derive(Debug, Clone)]
pub struct Roster {
    gateway: GatewayClient,
    state: Arc<Mutex<RosterState>>,
}

impl Roster {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_gateway(GatewayClient::new(base_url))
    }

    pub fn with_gateway(gateway: GatewayClient) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(RosterState {
                list: MemberList::new(),
                guard: RefreshGuard::default(),
                notices: Vec::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, RosterState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Refetch the full collection and adopt it, unless a newer refresh was
    /// issued while this one was in flight.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let ticket = self.state().guard.begin();
        match self.gateway.list_members().await {
            Ok(members) => {
                let mut state = self.state();
                if state.guard.is_current(ticket) {
                    state.list.set_members(members);
                } else {
                    tracing::debug!(ticket, "stale member list response discarded");
                }
                Ok(())
            }
            Err(err) => {
                self.state()
                    .notices
                    .push(Notice::error("Failed to fetch members. Please try again."));
                Err(err)
            }
        }
    }

    /// Create through the gateway, then resynchronize by full refetch.
    pub async fn add_member(&self, draft: MemberDraft) -> Result<Member, ClientError> {
        match self.gateway.create_member(&draft).await {
            Ok(member) => {
                self.refresh().await.ok();
                self.state()
                    .notices
                    .push(Notice::success("Member added successfully."));
                Ok(member)
            }
            Err(err) => {
                self.state()
                    .notices
                    .push(Notice::error("Failed to add member. Please try again."));
                Err(err)
            }
        }
    }

    /// Update through the gateway, then resynchronize by full refetch.
    pub async fn edit_member(&self, draft: MemberDraft) -> Result<Member, ClientError> {
        match self.gateway.update_member(&draft).await {
            Ok(member) => {
                self.refresh().await.ok();
                self.state()
                    .notices
                    .push(Notice::success("Member updated successfully."));
                Ok(member)
            }
            Err(err) => {
                self.state()
                    .notices
                    .push(Notice::error("Failed to update member. Please try again."));
                Err(err)
            }
        }
    }

    /// Delete through the gateway, then resynchronize by full refetch.
    pub async fn delete_member(&self, id: i64) -> Result<(), ClientError> {
        match self.gateway.delete_member(id).await {
            Ok(()) => {
                self.refresh().await.ok();
                self.state()
                    .notices
                    .push(Notice::success("Member deleted successfully."));
                Ok(())
            }
            Err(err) => {
                self.state()
                    .notices
                    .push(Notice::error("Failed to delete member. Please try again."));
                Err(err)
            }
        }
    }

    pub fn set_search_term(&self, term: &str) {
        self.state().list.set_search_term(term);
    }

    pub fn set_facet_filters(&self, filters: FacetFilters) {
        self.state().list.set_facet_filters(filters);
    }

    pub fn set_sort(&self, key: SortKey, order: SortOrder) {
        self.state().list.set_sort(key, order);
    }

    pub fn request_sort(&self, key: SortKey) {
        self.state().list.request_sort(key);
    }

    /// Snapshot of the currently visible rows.
    pub fn rows(&self) -> Vec<Member> {
        self.state().list.rows().into_iter().cloned().collect()
    }

    /// Current view criteria as a shareable query string.
    pub fn location_query(&self) -> String {
        self.state().list.query().to_query_string()
    }

    /// Restore view criteria from a shared link's query string.
    pub fn restore_location(&self, query_string: &str) {
        self.state()
            .list
            .set_query(ViewQuery::from_query_string(query_string));
    }

    /// Drain pending notices in the order they were raised.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state().notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_guard_keeps_only_latest_ticket() {
        let mut guard = RefreshGuard::default();
        let first = guard.begin();
        assert!(guard.is_current(first));

        let second = guard.begin();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[test]
    fn test_notices_keep_wording_and_kind() {
        let notice = Notice::success("Member added successfully.");
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.message, "Member added successfully.");
        assert_eq!(
            Notice::error("Failed to add member. Please try again.").kind,
            NoticeKind::Error
        );
    }
}
