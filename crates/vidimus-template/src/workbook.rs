//! In-memory workbook model.
//!
//! The compiler never works against the xlsx package directly; the importer
//! in [`crate::xlsx`] loads the parts it cares about into this model, and
//! tests build workbooks programmatically. Sheets iterate in workbook order,
//! cells in row-major order.

use std::collections::BTreeMap;

use crate::addr::{CellAddr, CellRange};

/// Name of the reserved metadata sheet. Matched case-sensitively; a sheet
/// with this exact name never participates in annotation scans.
pub const META_SHEET: &str = "EB_META";

// ============================================================================
// Cells and validations
// ============================================================================

/// A populated cell: displayed text plus an optional comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Displayed text of the cell.
    pub text: String,
    /// Comment attached to the cell, if any.
    pub comment: Option<String>,
}

/// Data-validation rule categories relevant to field-type inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Restricted to dates.
    Date,
    /// Restricted to decimal numbers.
    Decimal,
    /// Restricted to whole numbers.
    Whole,
    /// Any other restriction (lists, text length, custom formulas).
    Other,
}

impl ValidationKind {
    /// Map an OOXML `dataValidation` `type` attribute.
    pub fn from_ooxml(ty: &str) -> Self {
        match ty {
            "date" => ValidationKind::Date,
            "decimal" => ValidationKind::Decimal,
            "whole" => ValidationKind::Whole,
            _ => ValidationKind::Other,
        }
    }
}

/// A validation rule applied to one or more ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Rule category.
    pub kind: ValidationKind,
    /// Ranges the rule covers.
    pub ranges: Vec<CellRange>,
}

// ============================================================================
// Sheet
// ============================================================================

/// One worksheet: sparse cells keyed by position, merged regions, validations.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    /// Sheet name as shown on the tab.
    pub name: String,
    cells: BTreeMap<(u32, u32), Cell>,
    /// Merged regions on this sheet.
    pub merged: Vec<CellRange>,
    /// Data-validation rules on this sheet.
    pub validations: Vec<Validation>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set (or create) a cell's displayed text.
    pub fn set_text(&mut self, addr: CellAddr, text: impl Into<String>) {
        self.cells.entry((addr.row, addr.col)).or_default().text = text.into();
    }

    /// Attach a comment to a cell, creating the cell if needed.
    pub fn set_comment(&mut self, addr: CellAddr, comment: impl Into<String>) {
        self.cells.entry((addr.row, addr.col)).or_default().comment = Some(comment.into());
    }

    /// The cell at a position, if populated.
    pub fn cell(&self, addr: CellAddr) -> Option<&Cell> {
        self.cells.get(&(addr.row, addr.col))
    }

    /// Displayed text at a position; empty for unpopulated cells.
    pub fn text_at(&self, addr: CellAddr) -> &str {
        self.cell(addr).map(|c| c.text.as_str()).unwrap_or("")
    }

    /// Populated cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellAddr, &Cell)> {
        self.cells
            .iter()
            .map(|(&(row, col), cell)| (CellAddr::new(row, col), cell))
    }

    /// The merged region containing a cell, if it belongs to one.
    pub fn merged_region(&self, addr: CellAddr) -> Option<CellRange> {
        self.merged.iter().copied().find(|r| r.contains(addr))
    }

    /// The validation category covering a cell, if any rule covers it.
    pub fn validation_at(&self, addr: CellAddr) -> Option<ValidationKind> {
        self.validations
            .iter()
            .find(|v| v.ranges.iter().any(|r| r.contains(addr)))
            .map(|v| v.kind)
    }
}

// ============================================================================
// Workbook
// ============================================================================

/// A workbook-scoped named range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedName {
    /// The range's name.
    pub name: String,
    /// Raw `refersTo` formula, usually `Sheet!$A$1` form.
    pub refers_to: String,
}

/// A loaded workbook: ordered sheets plus workbook-level defined names.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// Sheets in workbook order.
    pub sheets: Vec<Sheet>,
    /// Workbook-scoped defined names.
    pub defined_names: Vec<DefinedName>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet, returning a mutable handle to it.
    pub fn add_sheet(&mut self, name: impl Into<String>) -> &mut Sheet {
        self.sheets.push(Sheet::new(name));
        // push above guarantees non-empty
        let idx = self.sheets.len() - 1;
        &mut self.sheets[idx]
    }

    /// Look up a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// The reserved metadata sheet, if present.
    pub fn meta_sheet(&self) -> Option<&Sheet> {
        self.sheet(META_SHEET)
    }

    /// Sheets subject to annotation scanning, in workbook order.
    pub fn regular_sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter().filter(|s| s.name != META_SHEET)
    }

    /// Look up a defined name (case-sensitive).
    pub fn defined_name(&self, name: &str) -> Option<&DefinedName> {
        self.defined_names.iter().find(|d| d.name == name)
    }
}

// ============================================================================
// Tests
// ============================================================================
