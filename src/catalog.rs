//! Catalog operations: initialize, upsert, list.
//!
//! Every call is a self-contained load → mutate → store cycle against the
//! document on disk; nothing is cached between calls. Used by the `kb init`,
//! `kb add` and `kb list` commands, and by [`search`](crate::search).

use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::document::Document;
use crate::error::{KbError, KbResult};
use crate::models::Record;
use crate::store;
use crate::template;

/// Outcome of [`initialize`].
#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub kb_dir: PathBuf,
    pub document: PathBuf,
    pub created_dir: bool,
    pub created_document: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Inserted,
    Updated,
}

/// Outcome of [`upsert_record`]: the record as stored and what happened.
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub record: Record,
    pub kind: UpsertKind,
}

/// Create the knowledge-base directory and default document if absent.
///
/// Idempotent: an existing document is left untouched.
pub fn initialize(config: &Config, root: &Path) -> KbResult<InitOutcome> {
    let kb_dir = store::resolve_root(root)?;
    let created_dir = !kb_dir.exists();
    store::ensure_dir(&kb_dir)?;
    // Canonical form now that the directory exists.
    let kb_dir = store::resolve_root(&kb_dir)?;

    let document = store::document_path(config, &kb_dir);
    if document.exists() {
        debug!(path = %document.display(), "document already exists");
        return Ok(InitOutcome {
            kb_dir,
            document,
            created_dir,
            created_document: false,
        });
    }

    let text = template::render_initial(&config.document, &kb_dir, Local::now());
    store::write_document(&document, &text)?;
    info!(path = %document.display(), "created knowledge-base document");

    Ok(InitOutcome {
        kb_dir,
        document,
        created_dir,
        created_document: true,
    })
}

/// Insert or update the record called `name` (exact, case-sensitive match).
///
/// An update always replaces the summary, replaces the local path only when a
/// non-empty one is given, and keeps the record's position. A new record is
/// appended; without a local path it defaults to `<kb_dir>/<name>`.
///
/// Inputs are trimmed first, since parsing trims cells and the stored record
/// must match what later reads return.
pub fn upsert_record(
    config: &Config,
    root: &Path,
    name: &str,
    summary: &str,
    local_path: Option<&str>,
) -> KbResult<UpsertOutcome> {
    let name = name.trim();
    let summary = summary.trim();
    let local_path = local_path.map(str::trim).filter(|p| !p.is_empty());
    Record::new(name, summary, local_path.unwrap_or("")).validate()?;

    let init = initialize(config, root)?;
    let text = store::read_document(&init.document)?.unwrap_or_default();
    let mut doc = Document::parse(&text);

    let (record, kind) = match doc.position(name) {
        Some(idx) => {
            let existing = &mut doc.records[idx];
            existing.summary = summary.to_string();
            if let Some(path) = local_path {
                existing.local_path = path.to_string();
            }
            (existing.clone(), UpsertKind::Updated)
        }
        None => {
            let path = match local_path {
                Some(p) => p.to_string(),
                None => init.kb_dir.join(name).display().to_string(),
            };
            let record = Record::new(name, summary, path);
            doc.records.push(record.clone());
            (record, UpsertKind::Inserted)
        }
    };

    store::write_document(&init.document, &doc.serialize())?;
    info!(name, kind = ?kind, records = doc.records.len(), "upserted record");

    Ok(UpsertOutcome { record, kind })
}

/// All records in document order. A missing document is an empty catalog.
pub fn list_records(config: &Config, root: &Path) -> KbResult<Vec<Record>> {
    Ok(load(config, root)?
        .map(|doc| doc.records)
        .unwrap_or_default())
}

/// Read and parse without creating anything. `None` if there is no document.
pub(crate) fn load(config: &Config, root: &Path) -> KbResult<Option<Document>> {
    let kb_dir = store::resolve_root(root)?;
    let path = store::document_path(config, &kb_dir);
    let document = store::read_document(&path)?.map(|text| Document::parse(&text));
    if document.is_none() {
        debug!(path = %path.display(), "no document; treating catalog as empty");
    }
    Ok(document)
}

/// CLI entry point for `kb init`.
pub fn run_init(config: &Config, root: &Path) -> Result<()> {
    let outcome = initialize(config, root)?;
    let file_name = &config.document.file_name;

    if outcome.created_dir {
        println!("Creating directory: {}", outcome.kb_dir.display());
    }
    if outcome.created_document {
        println!("Created {} at: {}", file_name, outcome.document.display());
    } else {
        println!(
            "{} already exists at: {}",
            file_name,
            outcome.document.display()
        );
    }
    Ok(())
}

/// CLI entry point for `kb add`.
pub fn run_add(
    config: &Config,
    root: &Path,
    name: Option<&str>,
    summary: Option<&str>,
    local_path: Option<&str>,
) -> Result<()> {
    let (name, summary) = match (non_empty(name), non_empty(summary)) {
        (Some(n), Some(s)) => (n, s),
        _ => {
            return Err(KbError::InvalidArgument(
                "--name and --summary are required for add command".to_string(),
            )
            .into())
        }
    };

    let outcome = upsert_record(config, root, name, summary, local_path)?;
    if outcome.kind == UpsertKind::Updated {
        println!(
            "Repository {} already exists, updating...",
            outcome.record.name
        );
    }
    println!("Added/Updated repository: {}", outcome.record.name);
    Ok(())
}

/// CLI entry point for `kb list`.
pub fn run_list(config: &Config, root: &Path) -> Result<()> {
    let records = list_records(config, root)?;
    if records.is_empty() {
        println!("No repositories found.");
        return Ok(());
    }

    println!("Found {} repositories:", records.len());
    for record in &records {
        println!("  - {}: {}", record.name, record.summary);
    }
    Ok(())
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
