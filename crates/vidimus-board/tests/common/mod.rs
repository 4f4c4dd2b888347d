//! Shared fixtures for board integration tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use vidimus_board::{BoardQuery, BoardRequest, BoardService, BoardTab};
use vidimus_core::{
    ApprovalStep, Comment, Document, DocumentId, Position, Profile, Share, StepAction, UserId,
    ViewContext, ViewLog,
};
use vidimus_storage::MemoryStore;

/// A seeded in-memory store plus a service over it.
pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub service: BoardService<MemoryStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let service = BoardService::new(store.clone());
        Self { store, service }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed instant for deterministic `created_at` values.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn doc(author: &str, title: &str, status: &str, created: DateTime<Utc>) -> Document {
    Document {
        id: DocumentId::new(),
        title: title.to_string(),
        author: author.into(),
        created_at: created,
        status: status.to_string(),
    }
}

pub fn step(
    document_id: DocumentId,
    order: u32,
    approver: &str,
    action: StepAction,
    acted_at: Option<DateTime<Utc>>,
) -> ApprovalStep {
    ApprovalStep {
        document_id,
        order,
        approver: approver.into(),
        action,
        acted_at,
    }
}

pub fn share(document_id: DocumentId, grantee: &str) -> Share {
    Share {
        document_id,
        grantee: grantee.into(),
        revoked: false,
        expires_at: None,
    }
}

pub fn expiring_share(document_id: DocumentId, grantee: &str, hours_from_now: i64) -> Share {
    Share {
        document_id,
        grantee: grantee.into(),
        revoked: false,
        expires_at: Some(Utc::now() + Duration::hours(hours_from_now)),
    }
}

pub fn view(document_id: DocumentId, viewer: &str, context: ViewContext) -> ViewLog {
    ViewLog {
        document_id,
        viewer: viewer.into(),
        context,
        viewed_at: Utc::now(),
    }
}

pub fn comment(document_id: DocumentId, author: &str, deleted: bool) -> Comment {
    Comment {
        document_id,
        author: author.into(),
        body: "note".to_string(),
        deleted,
        created_at: Utc::now(),
    }
}

pub fn profile(user: &str, name: &str, company: &str, position: &str) -> Profile {
    Profile {
        user: user.into(),
        display_name: name.to_string(),
        localized_names: Default::default(),
        company: company.to_string(),
        position: position.to_string(),
    }
}

pub fn position(company: &str, code: &str, title: &str) -> Position {
    Position {
        company: company.to_string(),
        code: code.to_string(),
        title: title.to_string(),
        localized_titles: Default::default(),
    }
}

/// Normalized query for a user and tab with everything else defaulted to `en`.
pub fn query(user: &str, tab: BoardTab) -> BoardQuery {
    BoardRequest::new(UserId::from(user), tab).normalize("en")
}
