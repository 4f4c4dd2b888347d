//! In-memory storage backend.
//!
//! Plain maps and vectors behind a `tokio::sync::RwLock`. This is the
//! reference backend for integration tests and the CLI; it implements the
//! same degradation policy a production backend must: unknown users and
//! documents produce empty results, never errors.

use std::collections::HashMap;
use tokio::sync::RwLock;

use async_trait::async_trait;
use vidimus_core::{
    ApprovalStep, Comment, Document, DocumentId, Position, Profile, Share, UserId, ViewContext,
    ViewLog,
};

use crate::traits::BoardStore;
use crate::Result;

#[derive(Debug, Default)]
struct Inner {
    documents: HashMap<DocumentId, Document>,
    steps: Vec<ApprovalStep>,
    shares: Vec<Share>,
    view_logs: Vec<ViewLog>,
    comments: Vec<Comment>,
    profiles: HashMap<UserId, Profile>,
    positions: HashMap<(String, String), Position>,
}

/// In-memory [`BoardStore`] backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document.
    pub async fn insert_document(&self, document: Document) {
        self.inner
            .write()
            .await
            .documents
            .insert(document.id, document);
    }

    /// Append an approval step.
    pub async fn insert_step(&self, step: ApprovalStep) {
        self.inner.write().await.steps.push(step);
    }

    /// Append a share grant.
    pub async fn insert_share(&self, share: Share) {
        self.inner.write().await.shares.push(share);
    }

    /// Append a view log.
    pub async fn insert_view_log(&self, log: ViewLog) {
        self.inner.write().await.view_logs.push(log);
    }

    /// Append a comment.
    pub async fn insert_comment(&self, comment: Comment) {
        self.inner.write().await.comments.push(comment);
    }

    /// Insert or replace a profile.
    pub async fn insert_profile(&self, profile: Profile) {
        self.inner
            .write()
            .await
            .profiles
            .insert(profile.user.clone(), profile);
    }

    /// Insert or replace a position entry.
    pub async fn insert_position(&self, position: Position) {
        self.inner
            .write()
            .await
            .positions
            .insert((position.company.clone(), position.code.clone()), position);
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn documents_by_author(&self, author: &UserId) -> Result<Vec<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .values()
            .filter(|d| &d.author == author)
            .cloned()
            .collect())
    }

    async fn document(&self, id: DocumentId) -> Result<Option<Document>> {
        Ok(self.inner.read().await.documents.get(&id).cloned())
    }

    async fn steps_for_document(&self, id: DocumentId) -> Result<Vec<ApprovalStep>> {
        let inner = self.inner.read().await;
        let mut steps: Vec<ApprovalStep> = inner
            .steps
            .iter()
            .filter(|s| s.document_id == id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.order);
        Ok(steps)
    }

    async fn steps_for_approver(&self, approver: &UserId) -> Result<Vec<ApprovalStep>> {
        let inner = self.inner.read().await;
        Ok(inner
            .steps
            .iter()
            .filter(|s| &s.approver == approver)
            .cloned()
            .collect())
    }

    async fn shares_for_grantee(&self, grantee: &UserId) -> Result<Vec<Share>> {
        let inner = self.inner.read().await;
        Ok(inner
            .shares
            .iter()
            .filter(|s| &s.grantee == grantee)
            .cloned()
            .collect())
    }

    async fn view_logs(
        &self,
        document: DocumentId,
        viewer: &UserId,
        context: Option<ViewContext>,
    ) -> Result<Vec<ViewLog>> {
        let inner = self.inner.read().await;
        Ok(inner
            .view_logs
            .iter()
            .filter(|v| {
                v.document_id == document
                    && &v.viewer == viewer
                    && context.map_or(true, |ctx| v.context == ctx)
            })
            .cloned()
            .collect())
    }

    async fn document_has_views(&self, document: DocumentId) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner.view_logs.iter().any(|v| v.document_id == document))
    }

    async fn comment_count(&self, document: DocumentId) -> Result<usize> {
        let inner = self.inner.read().await;
        Ok(inner
            .comments
            .iter()
            .filter(|c| c.document_id == document && !c.deleted)
            .count())
    }

    async fn profile(&self, user: &UserId) -> Result<Option<Profile>> {
        Ok(self.inner.read().await.profiles.get(user).cloned())
    }

    async fn position(&self, company: &str, code: &str) -> Result<Option<Position>> {
        Ok(self
            .inner
            .read()
            .await
            .positions
            .get(&(company.to_string(), code.to_string()))
            .cloned())
    }
}

// ============================================================================
// Tests
// ============================================================================
