//! The board aggregation service.
//!
//! Produces paginated, sorted, filtered listings with derived display fields
//! over a [`BoardStore`]. All derivation happens here; the store only hands
//! back records. Totals are computed on the full filtered set before the
//! page is sliced.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use vidimus_core::locale::MessageCatalog;
use vidimus_core::time::OrgTimeZone;
use vidimus_core::{ApprovalStep, Document, DocumentId, StatusCode, StepAction, UserId, ViewContext};
use vidimus_storage::BoardStore;

use crate::config::BoardConfig;
use crate::params::{ApprovalView, BoardQuery, BoardTab, ReadFilter, SortKey, StatusFilter};
use crate::summary;
use crate::Result;

// ============================================================================
// Output shapes
// ============================================================================

/// One row of a board page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardItem {
    /// Document identifier.
    pub id: DocumentId,
    /// Document title.
    pub title: String,
    /// Author display name (localized when a profile carries one).
    pub author_name: String,
    /// Creation time rendered in the organizational zone, `YYYY-MM-DD HH:mm`.
    pub created_local: String,
    /// Displayed status code. On the approval tab the user's own acted step
    /// action substitutes the document status.
    pub status: String,
    /// Number of steps in the approval chain.
    pub step_total: usize,
    /// Number of steps already approved.
    pub step_done: usize,
    /// Comment count, excluding soft-deleted comments.
    pub comment_count: usize,
    /// Attachment indicator. Not yet computed; always `false`.
    pub has_attachment: bool,
    /// Derived result-summary sentence; empty when undeterminable.
    pub summary: String,
    /// Read-state for the requesting viewer. `None` only when the backing
    /// column is absent, which normal operation never produces.
    pub read: Option<bool>,
}

/// A page of board rows plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardPage {
    /// Total rows matching the query, independent of pagination.
    pub total: usize,
    /// Echo of the effective page.
    pub page: usize,
    /// Echo of the effective page size.
    pub page_size: usize,
    /// The requested slice, in sort order.
    pub items: Vec<BoardItem>,
}

/// Independent counters shown on the navigation chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BadgeCounts {
    /// Steps waiting on the user where the document sits at that exact step.
    pub pending_approval: usize,
    /// Authored documents nobody has opened yet.
    pub created_unread: usize,
    /// Active shares the user has not opened through the share.
    pub shared_unread: usize,
}

// ============================================================================
// BoardService
// ============================================================================

/// Board aggregation service over a storage backend.
pub struct BoardService<S> {
    store: Arc<S>,
    catalog: MessageCatalog,
    tz: OrgTimeZone,
}

/// A document surviving the tab filters, before sorting and slicing.
struct Candidate {
    document: Document,
    display_status: String,
    read: Option<bool>,
}

impl<S: BoardStore> BoardService<S> {
    /// Create a service with the default configuration and built-in catalog.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, &BoardConfig::default())
    }

    /// Create a service from configuration.
    pub fn with_config(store: Arc<S>, config: &BoardConfig) -> Self {
        Self {
            store,
            catalog: MessageCatalog::builtin(),
            tz: OrgTimeZone::resolve(&config.time_zone),
        }
    }

    /// Replace the message catalog (deployments with their own phrases).
    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Produce one page of the board for a normalized query.
    pub async fn list(&self, query: &BoardQuery) -> Result<BoardPage> {
        let mut candidates = match query.tab {
            BoardTab::Created => self.created_candidates(query).await?,
            BoardTab::Approval => self.approval_candidates(query).await?,
            BoardTab::Shared => self.shared_candidates(query).await?,
        };

        if let Some(needle) = &query.search {
            candidates.retain(|c| c.document.title.to_lowercase().contains(needle));
        }

        let total = candidates.len();
        sort_candidates(&mut candidates, query.sort);

        let offset = query.page.saturating_sub(1).saturating_mul(query.page_size);
        let page_slice: Vec<Candidate> = candidates
            .into_iter()
            .skip(offset)
            .take(query.page_size)
            .collect();

        let mut items = Vec::with_capacity(page_slice.len());
        for candidate in page_slice {
            items.push(self.build_item(candidate, &query.lang).await?);
        }

        tracing::debug!(
            user = %query.user,
            tab = %query.tab,
            total,
            page = query.page,
            "board page assembled"
        );

        Ok(BoardPage {
            total,
            page: query.page,
            page_size: query.page_size,
            items,
        })
    }

    /// Compute the three navigation badge counters for a user.
    pub async fn badges(&self, user: &UserId) -> Result<BadgeCounts> {
        let mut counts = BadgeCounts::default();

        for step in self.store.steps_for_approver(user).await? {
            if step.action != StepAction::Pending {
                continue;
            }
            let Some(document) = self.store.document(step.document_id).await? else {
                continue;
            };
            if StatusCode::parse(&document.status) == Some(StatusCode::Pending(step.order)) {
                counts.pending_approval += 1;
            }
        }

        for document in self.store.documents_by_author(user).await? {
            if !self.store.document_has_views(document.id).await? {
                counts.created_unread += 1;
            }
        }

        let now = Utc::now();
        let mut seen = BTreeMap::new();
        for share in self.store.shares_for_grantee(user).await? {
            if !share.is_active(now) || seen.insert(share.document_id, ()).is_some() {
                continue;
            }
            if self.store.document(share.document_id).await?.is_none() {
                continue;
            }
            let shared_views = self
                .store
                .view_logs(share.document_id, user, Some(ViewContext::Shared))
                .await?;
            if shared_views.is_empty() {
                counts.shared_unread += 1;
            }
        }

        Ok(counts)
    }

    // ------------------------------------------------------------------------
    // Per-tab candidate collection
    // ------------------------------------------------------------------------

    async fn created_candidates(&self, query: &BoardQuery) -> Result<Vec<Candidate>> {
        let mut candidates = Vec::new();
        for document in self.store.documents_by_author(&query.user).await? {
            if !status_filter_matches(query.status_filter, &document.status) {
                continue;
            }
            let read = self.read_any_context(document.id, &query.user).await?;
            candidates.push(Candidate {
                display_status: document.status.clone(),
                document,
                read: Some(read),
            });
        }
        Ok(candidates)
    }

    async fn approval_candidates(&self, query: &BoardQuery) -> Result<Vec<Candidate>> {
        // Group the user's steps by document; a chain can route through the
        // same approver more than once.
        let mut by_document: BTreeMap<DocumentId, Vec<ApprovalStep>> = BTreeMap::new();
        for step in self.store.steps_for_approver(&query.user).await? {
            by_document.entry(step.document_id).or_default().push(step);
        }

        let mut candidates = Vec::new();
        for (document_id, my_steps) in by_document {
            let Some(document) = self.store.document(document_id).await? else {
                continue;
            };
            let code = StatusCode::parse(&document.status);
            if code == Some(StatusCode::Recalled) {
                continue;
            }
            match query.approval_view {
                ApprovalView::All => {}
                ApprovalView::Pending => {
                    if !code.map_or(false, |c| c.is_pending()) {
                        continue;
                    }
                }
                ApprovalView::Approved => {
                    if !my_steps.iter().any(|s| s.action == StepAction::Approved) {
                        continue;
                    }
                }
            }
            let display_status = my_steps
                .iter()
                .filter(|s| s.action.is_acted())
                .max_by_key(|s| (s.acted_at, s.order))
                .map(|s| s.action.as_stored().to_string())
                .unwrap_or_else(|| document.status.clone());
            let read = self.read_any_context(document.id, &query.user).await?;
            candidates.push(Candidate {
                display_status,
                document,
                read: Some(read),
            });
        }
        Ok(candidates)
    }

    async fn shared_candidates(&self, query: &BoardQuery) -> Result<Vec<Candidate>> {
        let now = Utc::now();
        let mut seen = BTreeMap::new();
        let mut candidates = Vec::new();
        for share in self.store.shares_for_grantee(&query.user).await? {
            if !share.is_active(now) || seen.insert(share.document_id, ()).is_some() {
                continue;
            }
            let Some(document) = self.store.document(share.document_id).await? else {
                continue;
            };
            let shared_views = self
                .store
                .view_logs(document.id, &query.user, Some(ViewContext::Shared))
                .await?;
            let read = !shared_views.is_empty();
            match query.read_filter {
                ReadFilter::All => {}
                ReadFilter::Viewed if !read => continue,
                ReadFilter::Unviewed if read => continue,
                _ => {}
            }
            candidates.push(Candidate {
                display_status: document.status.clone(),
                document,
                read: Some(read),
            });
        }
        Ok(candidates)
    }

    async fn read_any_context(&self, document: DocumentId, viewer: &UserId) -> Result<bool> {
        Ok(!self.store.view_logs(document, viewer, None).await?.is_empty())
    }

    // ------------------------------------------------------------------------
    // Row assembly
    // ------------------------------------------------------------------------

    async fn build_item(&self, candidate: Candidate, lang: &str) -> Result<BoardItem> {
        let document = candidate.document;
        let steps = self.store.steps_for_document(document.id).await?;
        let step_total = steps.len();
        let step_done = steps
            .iter()
            .filter(|s| s.action == StepAction::Approved)
            .count();
        let comment_count = self.store.comment_count(document.id).await?;

        let code = StatusCode::parse(&document.status);
        let verb = code.and_then(|c| c.summary_verb());
        let actor = summary::resolve_actor(code, &document, &steps);
        let (actor_name, actor_position) = match &actor {
            Some(user) => self.display_parts(user, lang).await?,
            None => (String::new(), String::new()),
        };
        let summary = summary::compose(&self.catalog, lang, verb, &actor_name, &actor_position);

        let author_name = match self.store.profile(&document.author).await? {
            Some(profile) => profile.name_for(lang).to_string(),
            None => document.author.to_string(),
        };

        Ok(BoardItem {
            id: document.id,
            title: document.title,
            author_name,
            created_local: self.tz.format_local(document.created_at),
            status: candidate.display_status,
            step_total,
            step_done,
            comment_count,
            // Attachment wiring does not exist yet; the column is a stub.
            has_attachment: false,
            summary,
            read: candidate.read,
        })
    }

    /// Localized display name and job title for a user, degrading to empty
    /// parts when the profile or position is missing.
    async fn display_parts(&self, user: &UserId, lang: &str) -> Result<(String, String)> {
        let Some(profile) = self.store.profile(user).await? else {
            return Ok((String::new(), String::new()));
        };
        let name = profile.name_for(lang).to_string();
        let position = match self
            .store
            .position(&profile.company, &profile.position)
            .await?
        {
            Some(position) => position.title_for(lang).to_string(),
            None => String::new(),
        };
        Ok((name, position))
    }
}

// ============================================================================
// Filtering and sorting helpers
// ============================================================================

fn status_filter_matches(filter: StatusFilter, stored: &str) -> bool {
    let code = StatusCode::parse(stored);
    match filter {
        StatusFilter::All => true,
        StatusFilter::Approved => code == Some(StatusCode::Approved),
        StatusFilter::Rejected => code == Some(StatusCode::Rejected),
        StatusFilter::Pending => code.map_or(false, |c| c.is_pending()),
        StatusFilter::OnHold => code == Some(StatusCode::OnHold),
        StatusFilter::Recalled => code == Some(StatusCode::Recalled),
    }
}

fn sort_candidates(candidates: &mut [Candidate], sort: SortKey) {
    match sort {
        SortKey::CreatedAsc => {
            candidates.sort_by_key(|c| c.document.created_at);
        }
        SortKey::CreatedDesc => {
            candidates.sort_by_key(|c| std::cmp::Reverse(c.document.created_at));
        }
        SortKey::TitleAsc => {
            candidates.sort_by(|a, b| {
                title_key(&a.document)
                    .cmp(&title_key(&b.document))
                    .then(a.document.created_at.cmp(&b.document.created_at))
            });
        }
        SortKey::TitleDesc => {
            candidates.sort_by(|a, b| {
                title_key(&b.document)
                    .cmp(&title_key(&a.document))
                    .then(a.document.created_at.cmp(&b.document.created_at))
            });
        }
    }
}

fn title_key(document: &Document) -> String {
    document.title.to_lowercase()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candidate(title: &str, created_secs: i64) -> Candidate {
        Candidate {
            document: Document {
                id: DocumentId::new(),
                title: title.to_string(),
                author: "alice".into(),
                created_at: Utc.timestamp_opt(created_secs, 0).single().unwrap(),
                status: "Approved".to_string(),
            },
            display_status: "Approved".to_string(),
            read: Some(false),
        }
    }

    #[test]
    fn test_status_filter_matching() {
        assert!(status_filter_matches(StatusFilter::All, "anything"));
        assert!(status_filter_matches(StatusFilter::Pending, "PendingA2"));
        assert!(!status_filter_matches(StatusFilter::Pending, "Approved"));
        assert!(status_filter_matches(StatusFilter::Recalled, "Recalled"));
        // Outside the vocabulary: only All matches.
        assert!(!status_filter_matches(StatusFilter::Approved, "archived"));
    }

    #[test]
    fn test_sort_created() {
        let mut rows = vec![candidate("b", 200), candidate("a", 100), candidate("c", 300)];
        sort_candidates(&mut rows, SortKey::CreatedAsc);
        let titles: Vec<&str> = rows.iter().map(|c| c.document.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        sort_candidates(&mut rows, SortKey::CreatedDesc);
        let titles: Vec<&str> = rows.iter().map(|c| c.document.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_title_case_insensitive() {
        let mut rows = vec![candidate("banana", 1), candidate("Apple", 2), candidate("cherry", 3)];
        sort_candidates(&mut rows, SortKey::TitleAsc);
        let titles: Vec<&str> = rows.iter().map(|c| c.document.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
        sort_candidates(&mut rows, SortKey::TitleDesc);
        let titles: Vec<&str> = rows.iter().map(|c| c.document.title.as_str()).collect();
        assert_eq!(titles, vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn test_sort_title_tie_breaks_on_created() {
        let mut rows = vec![candidate("same", 300), candidate("same", 100)];
        sort_candidates(&mut rows, SortKey::TitleAsc);
        assert!(rows[0].document.created_at < rows[1].document.created_at);
    }
}
