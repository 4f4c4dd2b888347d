//! Compiled template descriptors.

use serde::{Deserialize, Serialize};

use crate::addr::CellRef;
use crate::annotation::FieldType;
use crate::error::Result;

/// An input-field placement compiled from a `Field=` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field key, unique case-insensitively within a descriptor.
    pub key: String,
    /// Semantic type.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Source cell (or merged region).
    pub cell: CellRef,
}

/// An approval-signature placement compiled from `Approval=`/`ApprovalKey=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDef {
    /// 1-based approval slot.
    pub slot: u32,
    /// Part tag within the slot (signature, date, name, ...).
    pub part: String,
    /// Source cell (or merged region).
    pub cell: CellRef,
}

/// Compiled output of the template compiler.
///
/// Fields are sorted by key, approvals by `(slot, part)`, both with
/// case-insensitive collation, so serializations are stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// Owning company code.
    pub company_code: String,
    /// Owning department.
    pub department: String,
    /// Document kind/category.
    pub doc_kind: String,
    /// Document name.
    pub doc_name: String,
    /// Resolved template title; empty when unresolvable.
    pub title: String,
    /// Number of approval slots the rendered document carries.
    pub approval_count: u32,
    /// Input-field placements.
    pub fields: Vec<FieldDef>,
    /// Approval-signature placements.
    pub approvals: Vec<ApprovalDef>,
}

impl TemplateDescriptor {
    /// Serialize as pretty-printed JSON, the stored artifact form.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a stored descriptor.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::addr::CellAddr;

    #[test]
    fn test_json_roundtrip() {
        let descriptor = TemplateDescriptor {
            company_code: "ACME".to_string(),
            department: "Finance".to_string(),
            doc_kind: "expense".to_string(),
            doc_name: "Expense Report".to_string(),
            title: "Expense Report".to_string(),
            approval_count: 2,
            fields: vec![FieldDef {
                key: "amount".to_string(),
                ty: FieldType::Num,
                cell: CellRef::single("Main", CellAddr::new(2, 1)),
            }],
            approvals: vec![ApprovalDef {
                slot: 1,
                part: "Sign".to_string(),
                cell: CellRef::single("Main", CellAddr::new(0, 5)),
            }],
        };
        let json = descriptor.to_json_pretty().unwrap();
        assert!(json.contains("\"type\""));
        let back = TemplateDescriptor::from_json(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}
