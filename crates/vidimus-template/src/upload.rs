//! Upload intake.
//!
//! Preconditions are checked in a fixed order and short-circuit at the first
//! failure, each with its own error variant, before the package is ever
//! opened: file present and non-empty, company code present, document name
//! present, then the OOXML sniff.

use crate::compiler::{self, TemplateContext};
use crate::descriptor::TemplateDescriptor;
use crate::error::{Error, Result};
use crate::xlsx;

/// A template upload as received from the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Original file name of the upload.
    pub file_name: String,
    /// Raw upload bytes.
    pub bytes: Vec<u8>,
    /// Owning company code.
    pub company_code: String,
    /// Owning department.
    pub department: String,
    /// Document kind/category.
    pub doc_kind: String,
    /// Document name.
    pub doc_name: String,
}

impl UploadRequest {
    /// Run the fixed-order precondition checks without touching the package
    /// contents.
    pub fn validate(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(Error::MissingFile);
        }
        if self.company_code.trim().is_empty() {
            return Err(Error::MissingCompanyCode);
        }
        if self.doc_name.trim().is_empty() {
            return Err(Error::MissingDocumentName);
        }
        if !xlsx::sniff_ooxml(&self.bytes) {
            return Err(Error::NotASpreadsheet);
        }
        Ok(())
    }

    /// Context record for the compiler.
    pub fn context(&self) -> TemplateContext {
        TemplateContext {
            company_code: self.company_code.trim().to_string(),
            department: self.department.trim().to_string(),
            doc_kind: self.doc_kind.trim().to_string(),
            doc_name: self.doc_name.trim().to_string(),
        }
    }

    /// File extension of the upload, lowercased; `xlsx` when absent.
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| "xlsx".to_string())
    }
}

/// Validate, open, and compile an upload into a descriptor.
pub fn compile_upload(request: &UploadRequest) -> Result<TemplateDescriptor> {
    request.validate()?;
    let workbook = xlsx::read_workbook(&request.bytes)?;
    Ok(compiler::compile(&workbook, &request.context()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> UploadRequest {
        UploadRequest {
            file_name: "template.xlsx".to_string(),
            bytes: b"not really a workbook".to_vec(),
            company_code: "ACME".to_string(),
            department: "Finance".to_string(),
            doc_kind: "expense".to_string(),
            doc_name: "Expense Report".to_string(),
        }
    }

    #[test]
    fn test_check_order_file_first() {
        let mut r = request();
        r.bytes.clear();
        r.company_code.clear();
        r.doc_name.clear();
        assert!(matches!(r.validate(), Err(Error::MissingFile)));
    }

    #[test]
    fn test_check_order_company_before_name() {
        let mut r = request();
        r.company_code = "  ".to_string();
        r.doc_name.clear();
        assert!(matches!(r.validate(), Err(Error::MissingCompanyCode)));
    }

    #[test]
    fn test_check_order_name_before_sniff() {
        let mut r = request();
        r.doc_name.clear();
        assert!(matches!(r.validate(), Err(Error::MissingDocumentName)));
    }

    #[test]
    fn test_non_spreadsheet_rejected_last() {
        let r = request();
        assert!(matches!(r.validate(), Err(Error::NotASpreadsheet)));
    }

    #[test]
    fn test_extension() {
        let mut r = request();
        assert_eq!(r.extension(), "xlsx");
        r.file_name = "Template.XLSM".to_string();
        assert_eq!(r.extension(), "xlsm");
        r.file_name = "noext".to_string();
        assert_eq!(r.extension(), "xlsx");
    }
}
