//! The read-only query surface the board aggregator consumes.

use async_trait::async_trait;
use vidimus_core::{
    ApprovalStep, Document, DocumentId, Position, Profile, Share, UserId, ViewContext, ViewLog,
};

use crate::Result;

/// Read-only storage surface backing the board aggregator.
///
/// Implementations map each method onto the underlying store (parameterized
/// SQL in production, plain maps in [`crate::MemoryStore`]). Unknown users or
/// documents degrade to empty results, never errors; only genuine backend
/// failures surface as `Err`.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Documents authored by the given user.
    async fn documents_by_author(&self, author: &UserId) -> Result<Vec<Document>>;

    /// A single document by id.
    async fn document(&self, id: DocumentId) -> Result<Option<Document>>;

    /// All approval steps of a document, ordered by step order.
    async fn steps_for_document(&self, id: DocumentId) -> Result<Vec<ApprovalStep>>;

    /// All approval steps assigned to the given approver, across documents.
    async fn steps_for_approver(&self, approver: &UserId) -> Result<Vec<ApprovalStep>>;

    /// All shares granted to the given user (active or not; callers filter).
    async fn shares_for_grantee(&self, grantee: &UserId) -> Result<Vec<Share>>;

    /// View logs recorded for a document by a specific viewer.
    ///
    /// When `context` is `Some`, only logs with that exact role context are
    /// returned; `None` returns logs of every context.
    async fn view_logs(
        &self,
        document: DocumentId,
        viewer: &UserId,
        context: Option<ViewContext>,
    ) -> Result<Vec<ViewLog>>;

    /// Whether any viewer at all has opened the document.
    async fn document_has_views(&self, document: DocumentId) -> Result<bool>;

    /// Number of comments on a document, excluding soft-deleted ones.
    async fn comment_count(&self, document: DocumentId) -> Result<usize>;

    /// Organizational profile of a user.
    async fn profile(&self, user: &UserId) -> Result<Option<Profile>>;

    /// Job-title entry for a company + position code pair.
    async fn position(&self, company: &str, code: &str) -> Result<Option<Position>>;
}
