//! Artifact persistence.
//!
//! Persists the uploaded workbook untouched and the compiled descriptor as
//! pretty JSON, each under a deterministic, collision-resistant file name:
//! `{company}_{docName}_{yyyyMMdd_HHmmss}_{hex8}.{ext|json}` with components
//! sanitized to alphanumerics, `-`, `_`. Unique names make concurrent
//! uploads collision-free without locking.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::descriptor::TemplateDescriptor;
use crate::error::Result;
use crate::upload::UploadRequest;

/// Where a stored upload's two artifacts landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifacts {
    /// Path of the persisted workbook copy.
    pub workbook_path: PathBuf,
    /// Path of the serialized descriptor.
    pub descriptor_path: PathBuf,
}

/// Writes template artifacts under an application data root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist the workbook bytes and descriptor, returning both paths.
    pub fn store(
        &self,
        request: &UploadRequest,
        descriptor: &TemplateDescriptor,
    ) -> Result<StoredArtifacts> {
        self.store_at(request, descriptor, Utc::now())
    }

    /// As [`store`](Self::store), with an explicit timestamp.
    pub fn store_at(
        &self,
        request: &UploadRequest,
        descriptor: &TemplateDescriptor,
        now: DateTime<Utc>,
    ) -> Result<StoredArtifacts> {
        fs::create_dir_all(&self.root)?;
        let stem = artifact_stem(&request.company_code, &request.doc_name, now);

        let workbook_path = self.root.join(format!("{stem}.{}", request.extension()));
        fs::write(&workbook_path, &request.bytes)?;

        let descriptor_path = self.root.join(format!("{stem}.json"));
        fs::write(&descriptor_path, descriptor.to_json_pretty()?)?;

        tracing::info!(
            workbook = %workbook_path.display(),
            descriptor = %descriptor_path.display(),
            "template artifacts stored"
        );
        Ok(StoredArtifacts {
            workbook_path,
            descriptor_path,
        })
    }
}

/// Build the shared file stem for one upload's artifact pair.
fn artifact_stem(company: &str, doc_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}_{}",
        sanitize(company),
        sanitize(doc_name),
        now.format("%Y%m%d_%H%M%S"),
        random_hex8(),
    )
}

/// Keep only ASCII alphanumerics, `-`, `_`; empty results become `_`.
fn sanitize(component: &str) -> String {
    let kept: String = component
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if kept.is_empty() {
        "_".to_string()
    } else {
        kept
    }
}

/// Eight random hex characters.
fn random_hex8() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(8);
    hex
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn descriptor() -> TemplateDescriptor {
        TemplateDescriptor {
            company_code: "ACME".to_string(),
            department: "Finance".to_string(),
            doc_kind: "expense".to_string(),
            doc_name: "Expense Report".to_string(),
            title: String::new(),
            approval_count: 0,
            fields: Vec::new(),
            approvals: Vec::new(),
        }
    }

    fn request() -> UploadRequest {
        UploadRequest {
            file_name: "upload.xlsx".to_string(),
            bytes: vec![1, 2, 3],
            company_code: "ACME".to_string(),
            department: "Finance".to_string(),
            doc_kind: "expense".to_string(),
            doc_name: "Expense Report".to_string(),
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Expense Report"), "ExpenseReport");
        assert_eq!(sanitize("a/b\\c:d"), "abcd");
        assert_eq!(sanitize("ok-name_1"), "ok-name_1");
        assert_eq!(sanitize("비용보고서"), "_");
        assert_eq!(sanitize(""), "_");
    }

    #[test]
    fn test_stem_shape() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 9).unwrap();
        let stem = artifact_stem("ACME", "Expense Report", now);
        let parts: Vec<&str> = stem.split('_').collect();
        assert_eq!(parts[0], "ACME");
        assert_eq!(parts[1], "ExpenseReport");
        assert_eq!(parts[2], "20240305");
        assert_eq!(parts[3], "143009");
        assert_eq!(parts[4].len(), 8);
        assert!(parts[4].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_store_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let stored = store.store(&request(), &descriptor()).unwrap();

        assert_eq!(fs::read(&stored.workbook_path).unwrap(), vec![1, 2, 3]);
        let json = fs::read_to_string(&stored.descriptor_path).unwrap();
        let back = TemplateDescriptor::from_json(&json).unwrap();
        assert_eq!(back, descriptor());
        assert!(stored.workbook_path.to_string_lossy().ends_with(".xlsx"));
        assert!(stored.descriptor_path.to_string_lossy().ends_with(".json"));
    }

    #[test]
    fn test_concurrent_style_stores_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 9).unwrap();
        let a = store.store_at(&request(), &descriptor(), now).unwrap();
        let b = store.store_at(&request(), &descriptor(), now).unwrap();
        assert_ne!(a.workbook_path, b.workbook_path);
    }
}
