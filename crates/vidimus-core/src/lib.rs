//! # vidimus-core
//!
//! Shared types for the Vidimus document-approval system.
//!
//! This crate provides the foundational types used across all Vidimus crates.
//! It has no internal Vidimus dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`ids`]: Newtype identifiers for documents and users
//! - [`status`]: Document status codes and approval-step actions
//! - [`records`]: Storage record shapes (documents, steps, shares, views, comments)
//! - [`time`]: Organizational time-zone resolution and local formatting
//! - [`locale`]: Localized message catalog for derived display text

pub mod error;
pub mod ids;
mod proptests;
pub mod locale;
pub mod records;
pub mod status;
pub mod time;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use ids::{DocumentId, UserId};
pub use records::{
    ApprovalStep, Comment, Document, Position, Profile, Share, ViewContext, ViewLog,
};
pub use status::{StatusCode, StepAction, SummaryVerb};
