//! Board request parameters and their normalization.
//!
//! The presentation layer hands over raw strings; everything here is
//! forgiving by design: out-of-range pages clamp, unrecognized filter and
//! sort values fall back to defaults, blank search strings disable the
//! filter. Bad inputs are never an error (see the error-handling policy in
//! [`crate::error`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use vidimus_core::UserId;

/// Default page size when the requested one is out of range.
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: usize = 100;

// ============================================================================
// BoardTab
// ============================================================================

/// The three document-list perspectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardTab {
    /// Documents the user authored.
    #[default]
    Created,
    /// Documents waiting on (or routed through) the user as approver.
    Approval,
    /// Documents actively shared with the user.
    Shared,
}

impl BoardTab {
    /// Parse a tab selector, defaulting to `Created` for unknown values.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approval" => BoardTab::Approval,
            "shared" => BoardTab::Shared,
            _ => BoardTab::Created,
        }
    }
}

impl fmt::Display for BoardTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardTab::Created => write!(f, "created"),
            BoardTab::Approval => write!(f, "approval"),
            BoardTab::Shared => write!(f, "shared"),
        }
    }
}

// ============================================================================
// SortKey
// ============================================================================

/// Sort order of a board page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Oldest first.
    CreatedAsc,
    /// Newest first (the board default).
    #[default]
    CreatedDesc,
    /// Title A→Z (case-insensitive).
    TitleAsc,
    /// Title Z→A (case-insensitive).
    TitleDesc,
}

impl SortKey {
    /// Parse a sort selector, defaulting to `CreatedDesc` for unknown values.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "created_asc" => SortKey::CreatedAsc,
            "created_desc" => SortKey::CreatedDesc,
            "title_asc" => SortKey::TitleAsc,
            "title_desc" => SortKey::TitleDesc,
            _ => SortKey::default(),
        }
    }
}

// ============================================================================
// Title filters (per-tab vocabulary)
// ============================================================================

/// Workflow-state filter used by the `created` tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No restriction.
    #[default]
    All,
    /// Only approved documents.
    Approved,
    /// Only rejected documents.
    Rejected,
    /// Only documents pending somewhere in their chain.
    Pending,
    /// Only held documents.
    OnHold,
    /// Only recalled documents.
    Recalled,
}

impl StatusFilter {
    /// Parse a filter value, treating unknown values as `All`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approved" => StatusFilter::Approved,
            "rejected" => StatusFilter::Rejected,
            "pending" => StatusFilter::Pending,
            "onhold" => StatusFilter::OnHold,
            "recalled" => StatusFilter::Recalled,
            _ => StatusFilter::All,
        }
    }
}

/// Read-state filter used by the `shared` tab.
///
/// `viewed`/`read` and `unviewed`/`unread` are aliases; anything else means
/// no restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFilter {
    /// No restriction.
    #[default]
    All,
    /// Only documents the user has opened through the share.
    Viewed,
    /// Only documents the user has not opened through the share.
    Unviewed,
}

impl ReadFilter {
    /// Parse a filter value, treating unknown values as `All`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "viewed" | "read" => ReadFilter::Viewed,
            "unviewed" | "unread" => ReadFilter::Unviewed,
            _ => ReadFilter::All,
        }
    }
}

// ============================================================================
// ApprovalView
// ============================================================================

/// Sub-view of the `approval` tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalView {
    /// Every document routed through the user.
    #[default]
    All,
    /// Only documents still pending somewhere.
    Pending,
    /// Only documents the user's own step approved.
    Approved,
}

impl ApprovalView {
    /// Parse a view selector, treating unknown values as `All`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => ApprovalView::Pending,
            "approved" => ApprovalView::Approved,
            _ => ApprovalView::All,
        }
    }
}

// ============================================================================
// BoardRequest / BoardQuery
// ============================================================================

/// Raw board-list request as received from the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardRequest {
    /// Requesting user.
    pub user: UserId,
    /// Tab selector (`created` / `approval` / `shared`).
    pub tab: String,
    /// Requested page, 1-based.
    #[serde(default)]
    pub page: i64,
    /// Requested page size.
    #[serde(default)]
    pub page_size: i64,
    /// Title filter; vocabulary depends on the tab.
    #[serde(default)]
    pub title_filter: Option<String>,
    /// Sort selector.
    #[serde(default)]
    pub sort: Option<String>,
    /// Free-text substring search against the title.
    #[serde(default)]
    pub search: Option<String>,
    /// Approval-tab sub-view selector.
    #[serde(default)]
    pub approval_view: Option<String>,
    /// UI language code for localized display fields.
    #[serde(default)]
    pub lang: Option<String>,
}

impl BoardRequest {
    /// Minimal request for a user and tab; everything else defaulted.
    pub fn new(user: impl Into<UserId>, tab: BoardTab) -> Self {
        Self {
            user: user.into(),
            tab: tab.to_string(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE as i64,
            title_filter: None,
            sort: None,
            search: None,
            approval_view: None,
            lang: None,
        }
    }

    /// Normalize every raw input into its typed, in-range form.
    ///
    /// `default_lang` supplies the UI language when the request carries none.
    pub fn normalize(&self, default_lang: &str) -> BoardQuery {
        let tab = BoardTab::parse_or_default(&self.tab);
        let raw_filter = self.title_filter.as_deref().unwrap_or("");
        BoardQuery {
            user: self.user.clone(),
            tab,
            page: normalize_page(self.page),
            page_size: normalize_page_size(self.page_size),
            status_filter: StatusFilter::parse_or_default(raw_filter),
            read_filter: ReadFilter::parse_or_default(raw_filter),
            sort: SortKey::parse_or_default(self.sort.as_deref().unwrap_or("")),
            search: normalize_search(self.search.as_deref()),
            approval_view: ApprovalView::parse_or_default(
                self.approval_view.as_deref().unwrap_or(""),
            ),
            lang: self
                .lang
                .as_deref()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or(default_lang)
                .to_string(),
        }
    }
}

/// Fully normalized board query consumed by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardQuery {
    /// Requesting user.
    pub user: UserId,
    /// Selected tab.
    pub tab: BoardTab,
    /// Effective page (≥ 1).
    pub page: usize,
    /// Effective page size (1..=100).
    pub page_size: usize,
    /// Workflow-state filter (`created` tab vocabulary).
    pub status_filter: StatusFilter,
    /// Read-state filter (`shared` tab vocabulary).
    pub read_filter: ReadFilter,
    /// Sort order.
    pub sort: SortKey,
    /// Optional lowercased search needle; `None` when blank.
    pub search: Option<String>,
    /// Approval-tab sub-view.
    pub approval_view: ApprovalView,
    /// Effective UI language.
    pub lang: String,
}

fn normalize_page(page: i64) -> usize {
    if page < 1 {
        1
    } else {
        page as usize
    }
}

fn normalize_page_size(size: i64) -> usize {
    if size < 1 || size > MAX_PAGE_SIZE as i64 {
        DEFAULT_PAGE_SIZE
    } else {
        size as usize
    }
}

fn normalize_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

// ============================================================================
// Tests
// ============================================================================
