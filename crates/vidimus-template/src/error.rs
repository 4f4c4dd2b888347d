//! Error types for vidimus-template

use thiserror::Error;

/// Result type alias for vidimus-template operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vidimus-template
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// No file was supplied, or the supplied file was empty.
    #[error("No file was uploaded")]
    MissingFile,

    /// The company code was missing or blank.
    #[error("A company code is required")]
    MissingCompanyCode,

    /// The document name was missing or blank.
    #[error("A document name is required")]
    MissingDocumentName,

    /// The upload is not an Office Open XML spreadsheet.
    #[error("Only .xlsx spreadsheets are supported")]
    NotASpreadsheet,

    /// A spreadsheet address could not be parsed.
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// The workbook package is structurally broken.
    #[error("Malformed workbook: {0}")]
    MalformedWorkbook(String),

    /// Reading the xlsx container failed.
    #[error("Workbook archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// An XML part inside the package could not be parsed.
    #[error("Workbook XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Serializing a descriptor failed.
    #[error("Descriptor serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing an artifact failed.
    #[error("Artifact I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Convenience constructor for malformed-workbook errors.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedWorkbook(message.into())
    }
}
