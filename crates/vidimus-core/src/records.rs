//! Storage record shapes.
//!
//! These structs mirror the rows owned by the surrounding persistence layer.
//! Vidimus only reads and derives from them; it never mutates them (the
//! template compiler writes new artifacts, never these records).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ids::{DocumentId, UserId};
use crate::status::StepAction;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A document row.
///
/// `status` holds the raw stored status string; it is the single source of
/// truth for where the document sits in its approval chain and is parsed via
/// [`crate::StatusCode::parse`] wherever typed state is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier.
    pub id: DocumentId,
    /// Display title.
    pub title: String,
    /// Creator reference.
    pub author: UserId,
    /// Creation instant (absolute).
    pub created_at: DateTime<Utc>,
    /// Raw stored status code (`"PendingA3"`, `"Approved"`, empty for draft).
    pub status: String,
}

// ---------------------------------------------------------------------------
// ApprovalStep
// ---------------------------------------------------------------------------

/// One step of a document's sequential approval chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalStep {
    /// The document this step belongs to.
    pub document_id: DocumentId,
    /// 1-based position in the chain; strictly increasing per document.
    pub order: u32,
    /// Assigned approver.
    pub approver: UserId,
    /// Action recorded on this step.
    pub action: StepAction,
    /// When the approver acted; `None` until acted on.
    pub acted_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Share
// ---------------------------------------------------------------------------

/// A viewing grant on a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    /// The shared document.
    pub document_id: DocumentId,
    /// The user granted viewing rights.
    pub grantee: UserId,
    /// Set when the grant was withdrawn.
    pub revoked: bool,
    /// Optional expiry instant.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Share {
    /// A share is active iff it is not revoked and not expired.
    ///
    /// A share expiring exactly at `now` counts as expired.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at.map_or(true, |exp| now < exp)
    }
}

// ---------------------------------------------------------------------------
// ViewLog
// ---------------------------------------------------------------------------

/// Role context under which a viewer opened a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewContext {
    /// Opened through an active share.
    Shared,
    /// Opened in any other capacity (creator, approver, ...).
    Direct,
}

/// A record that a viewer opened a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewLog {
    /// The opened document.
    pub document_id: DocumentId,
    /// Who opened it.
    pub viewer: UserId,
    /// Role context of the view.
    pub context: ViewContext,
    /// When it was opened.
    pub viewed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A comment attached to a document. Soft-deletable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// The commented document.
    pub document_id: DocumentId,
    /// Comment author.
    pub author: UserId,
    /// Comment text.
    pub body: String,
    /// Soft-delete flag; deleted comments stay stored but never count.
    pub deleted: bool,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profile / Position
// ---------------------------------------------------------------------------

/// Organizational profile of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The profiled user.
    pub user: UserId,
    /// Base display name.
    pub display_name: String,
    /// Localized display names by UI language code.
    #[serde(default)]
    pub localized_names: HashMap<String, String>,
    /// Company code.
    pub company: String,
    /// Position code within the company.
    pub position: String,
}

impl Profile {
    /// Display name in the given UI language, falling back to the base name.
    pub fn name_for(&self, lang: &str) -> &str {
        self.localized_names
            .get(lang)
            .map(String::as_str)
            .unwrap_or(&self.display_name)
    }
}

/// A job-title entry keyed by company + position code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Company code.
    pub company: String,
    /// Position code.
    pub code: String,
    /// Base job title.
    pub title: String,
    /// Localized job titles by UI language code.
    #[serde(default)]
    pub localized_titles: HashMap<String, String>,
}

impl Position {
    /// Job title in the given UI language, falling back to the base title.
    pub fn title_for(&self, lang: &str) -> &str {
        self.localized_titles
            .get(lang)
            .map(String::as_str)
            .unwrap_or(&self.title)
    }
}

// ============================================================================
// Tests
// ============================================================================
