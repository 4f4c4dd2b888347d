//! # vidimus-board
//!
//! Board aggregation for the Vidimus approval system.
//!
//! Given a user identity and a tab selector this crate produces paginated,
//! sorted, filtered document listings with derived display fields, without
//! ever loading document bodies:
//!
//! - Request normalization (forgiving: bad inputs become defaults)
//! - Per-tab query semantics (created / approval / shared)
//! - Result-summary derivation (who last acted, localized)
//! - Read/unread state per viewing context
//! - Badge counts for the navigation chrome
//!
//! All operations are pure reads over a [`vidimus_storage::BoardStore`].

pub mod aggregator;
pub mod config;
pub mod error;
pub mod params;
pub mod summary;

pub use aggregator::{BadgeCounts, BoardItem, BoardPage, BoardService};
pub use config::BoardConfig;
pub use error::{Error, Result};
pub use params::{ApprovalView, BoardQuery, BoardRequest, BoardTab, ReadFilter, SortKey, StatusFilter};
