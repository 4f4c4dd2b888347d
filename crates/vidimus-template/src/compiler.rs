//! Workbook-to-descriptor compilation.
//!
//! Scans every regular sheet for annotated cells, reads the reserved
//! `EB_META` sheet for overrides, resolves the template title, and emits a
//! deduplicated, stably sorted [`TemplateDescriptor`]. Parsing anomalies are
//! dropped per cell; compilation itself never fails, and a descriptor with
//! zero fields and zero approvals is a valid (if useless) result.

use std::collections::BTreeMap;

use crate::addr::{parse_qualified, CellAddr, CellRange, CellRef};
use crate::annotation::{parse_comment, Directive, FieldType};
use crate::descriptor::{ApprovalDef, FieldDef, TemplateDescriptor};
use crate::workbook::{Sheet, ValidationKind, Workbook};

/// Rows of the metadata sheet inspected for key/value pairs.
const META_SCAN_ROWS: u32 = 1000;

/// Name of the defined range consulted for the title fallback.
const TITLE_DEFINED_NAME: &str = "F_Title";

/// Company/department context the upload arrives with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    /// Owning company code.
    pub company_code: String,
    /// Owning department.
    pub department: String,
    /// Document kind/category.
    pub doc_kind: String,
    /// Document name.
    pub doc_name: String,
}

/// Overrides parsed out of the `EB_META` sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Metadata {
    approval_count: Option<u32>,
    title_cell: Option<(Option<String>, CellAddr)>,
}

/// Compile a loaded workbook into a descriptor.
pub fn compile(workbook: &Workbook, ctx: &TemplateContext) -> TemplateDescriptor {
    let metadata = read_metadata(workbook);

    let mut fields: BTreeMap<String, FieldDef> = BTreeMap::new();
    let mut approvals: BTreeMap<(u32, String), ApprovalDef> = BTreeMap::new();
    let mut tagged_title: Option<String> = None;

    for sheet in workbook.regular_sheets() {
        for (addr, cell) in sheet.cells() {
            let Some(comment) = &cell.comment else {
                continue;
            };
            let cell_ref = capture(sheet, addr);
            for directive in parse_comment(comment) {
                match directive {
                    Directive::Field { key, ty } => {
                        let ty = ty
                            .or_else(|| infer_from_validation(sheet, addr))
                            .unwrap_or_default();
                        // Last tag wins, including its casing of the key.
                        fields.insert(
                            key.to_lowercase(),
                            FieldDef {
                                key,
                                ty,
                                cell: cell_ref.clone(),
                            },
                        );
                    }
                    Directive::Approval { slot, part } => {
                        approvals.insert(
                            (slot, part.to_lowercase()),
                            ApprovalDef {
                                slot,
                                part,
                                cell: cell_ref.clone(),
                            },
                        );
                    }
                    Directive::Title => {
                        if tagged_title.is_none() {
                            tagged_title = Some(sheet.text_at(addr).to_string());
                        }
                    }
                }
            }
        }
    }

    let title = tagged_title
        .or_else(|| defined_name_title(workbook))
        .or_else(|| metadata_title(workbook, &metadata))
        .unwrap_or_default();

    let approval_count = metadata
        .approval_count
        .or_else(|| approvals.keys().map(|(slot, _)| *slot).max())
        .unwrap_or(0);

    let descriptor = TemplateDescriptor {
        company_code: ctx.company_code.clone(),
        department: ctx.department.clone(),
        doc_kind: ctx.doc_kind.clone(),
        doc_name: ctx.doc_name.clone(),
        title,
        approval_count,
        fields: fields.into_values().collect(),
        approvals: approvals.into_values().collect(),
    };
    tracing::debug!(
        doc_name = %descriptor.doc_name,
        fields = descriptor.fields.len(),
        approvals = descriptor.approvals.len(),
        approval_count = descriptor.approval_count,
        "template compiled"
    );
    descriptor
}

/// Capture a cell reference, widening to its merged region when it has one.
fn capture(sheet: &Sheet, addr: CellAddr) -> CellRef {
    match sheet.merged_region(addr) {
        Some(range) => CellRef::merged(&sheet.name, range),
        None => CellRef::single(&sheet.name, addr),
    }
}

fn infer_from_validation(sheet: &Sheet, addr: CellAddr) -> Option<FieldType> {
    match sheet.validation_at(addr)? {
        ValidationKind::Date => Some(FieldType::Date),
        ValidationKind::Decimal | ValidationKind::Whole => Some(FieldType::Num),
        ValidationKind::Other => None,
    }
}

// ============================================================================
// Metadata and title resolution
// ============================================================================

/// Scan the metadata sheet's first two columns. Unparseable values are
/// ignored; a later row for the same key overrides an earlier one.
fn read_metadata(workbook: &Workbook) -> Metadata {
    let mut metadata = Metadata::default();
    let Some(sheet) = workbook.meta_sheet() else {
        return metadata;
    };
    for row in 0..META_SCAN_ROWS {
        let key = sheet.text_at(CellAddr::new(row, 0)).trim().to_string();
        if key.is_empty() {
            continue;
        }
        let value = sheet.text_at(CellAddr::new(row, 1)).trim().to_string();
        if key.eq_ignore_ascii_case("ApprovalCount") {
            if let Ok(count) = value.parse::<u32>() {
                metadata.approval_count = Some(count);
            }
        } else if key.eq_ignore_ascii_case("TitleCell") {
            if let Ok(parsed) = parse_qualified(&value) {
                metadata.title_cell = Some(parsed);
            }
        }
    }
    metadata
}

/// Title from the `F_Title` defined name: first cell of its first range.
fn defined_name_title(workbook: &Workbook) -> Option<String> {
    let defined = workbook.defined_name(TITLE_DEFINED_NAME)?;
    let first_range = defined.refers_to.trim_start_matches('=').split(',').next()?;
    let (sheet_name, addr) = match first_range.split_once(':') {
        Some((start, _)) => parse_qualified(start).ok()?,
        None => parse_qualified(first_range).ok()?,
    };
    let sheet = match sheet_name {
        Some(name) => workbook.sheet(&name)?,
        None => workbook.regular_sheets().next()?,
    };
    Some(sheet.text_at(addr).to_string())
}

/// Title from the `TitleCell` metadata entry, resolved against the named
/// sheet or the first regular sheet when unqualified.
fn metadata_title(workbook: &Workbook, metadata: &Metadata) -> Option<String> {
    let (sheet_name, addr) = metadata.title_cell.clone()?;
    let sheet = match sheet_name {
        Some(name) => workbook.sheet(&name)?,
        None => workbook.regular_sheets().next()?,
    };
    Some(sheet.text_at(addr).to_string())
}

// ============================================================================
// Tests
// ============================================================================
