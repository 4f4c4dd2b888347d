//! # vidimus-template
//!
//! Template compiler for the Vidimus approval system: turns an uploaded
//! xlsx workbook whose cell comments carry a small annotation language into
//! a structured [`TemplateDescriptor`] of input fields and
//! approval-signature placements.
//!
//! # Modules
//!
//! - [`addr`]: A1 cell addressing, ranges, and output cell references
//! - [`workbook`]: In-memory workbook model the compiler runs against
//! - [`annotation`]: Cell-comment annotation parsing into directives
//! - [`compiler`]: Workbook-to-descriptor compilation
//! - [`descriptor`]: The compiled descriptor shapes
//! - [`xlsx`]: Office Open XML import into the workbook model
//! - [`upload`]: Upload intake with fixed-order precondition checks
//! - [`artifacts`]: Persisting workbook copies and descriptor JSON
//! - [`error`]: Error types and Result alias

pub mod addr;
pub mod annotation;
pub mod artifacts;
pub mod compiler;
pub mod descriptor;
pub mod error;
pub mod upload;
pub mod workbook;
pub mod xlsx;

// Re-export key types at crate root for convenience
pub use addr::{CellAddr, CellRange, CellRef};
pub use annotation::{Directive, FieldType};
pub use artifacts::{ArtifactStore, StoredArtifacts};
pub use compiler::{compile, TemplateContext};
pub use descriptor::{ApprovalDef, FieldDef, TemplateDescriptor};
pub use error::{Error, Result};
pub use upload::{compile_upload, UploadRequest};
pub use workbook::{Sheet, Workbook, META_SHEET};
