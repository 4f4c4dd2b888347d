#![forbid(unsafe_code)]

//! Vidimus CLI
//!
//! Command-line administration for Vidimus templates: compile an xlsx
//! template into a descriptor, or inspect a stored descriptor.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use vidimus_template::{compile_upload, ArtifactStore, TemplateDescriptor, UploadRequest};

/// Vidimus template administration
#[derive(Parser, Debug)]
#[command(name = "vidimus")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Compile an xlsx template into a descriptor
    Compile {
        /// Path to the xlsx template
        file: PathBuf,
        /// Owning company code
        #[arg(long)]
        company: String,
        /// Owning department
        #[arg(long, default_value = "")]
        department: String,
        /// Document kind/category
        #[arg(long, default_value = "")]
        kind: String,
        /// Document name
        #[arg(long)]
        name: String,
        /// Persist the workbook copy and descriptor under this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Pretty-print a stored descriptor
    Inspect {
        /// Path to a descriptor JSON file
        descriptor: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Args::parse().command {
        Command::Compile {
            file,
            company,
            department,
            kind,
            name,
            out_dir,
        } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let request = UploadRequest {
                file_name,
                bytes,
                company_code: company,
                department,
                doc_kind: kind,
                doc_name: name,
            };
            let descriptor = compile_upload(&request)?;
            println!("{}", descriptor.to_json_pretty()?);
            if let Some(root) = out_dir {
                let stored = ArtifactStore::new(root).store(&request, &descriptor)?;
                tracing::info!(
                    workbook = %stored.workbook_path.display(),
                    descriptor = %stored.descriptor_path.display(),
                    "artifacts written"
                );
            }
        }
        Command::Inspect { descriptor } => {
            let json = std::fs::read_to_string(&descriptor)
                .with_context(|| format!("reading {}", descriptor.display()))?;
            let parsed = TemplateDescriptor::from_json(&json)?;
            println!(
                "{} / {} \"{}\" ({} fields, {} approval placements, {} slots)",
                parsed.company_code,
                parsed.doc_name,
                parsed.title,
                parsed.fields.len(),
                parsed.approvals.len(),
                parsed.approval_count,
            );
            for field in &parsed.fields {
                println!("  field {:<20} {:?} @ {}!{}", field.key, field.ty, field.cell.sheet, field.cell.address);
            }
            for approval in &parsed.approvals {
                println!("  slot {} {:<10} @ {}!{}", approval.slot, approval.part, approval.cell.sheet, approval.cell.address);
            }
        }
    }
    Ok(())
}
