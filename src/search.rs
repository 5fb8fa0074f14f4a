//! Read-only lookups: substring search and path resolution.
//!
//! Both match case-insensitively and treat "nothing found" as a normal
//! result rather than an error.

use anyhow::Result;
use std::path::Path;

use crate::catalog;
use crate::config::Config;
use crate::error::KbError;
use crate::models::{Record, SearchReport};

/// Records whose name or summary contains `query`, ignoring case.
///
/// `exact_match` is the first match whose name equals `query` ignoring case.
pub fn search(config: &Config, root: &Path, query: &str) -> Result<SearchReport> {
    let records = catalog::list_records(config, root)?;
    Ok(search_records(&records, query))
}

pub fn search_records(records: &[Record], query: &str) -> SearchReport {
    let needle = query.to_lowercase();

    let matches: Vec<Record> = records
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle) || r.summary.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    let exact_match = matches
        .iter()
        .find(|r| r.name.to_lowercase() == needle)
        .cloned();

    SearchReport {
        found: !matches.is_empty(),
        matches,
        exact_match,
    }
}

/// Stored local path of the first record named `name` (ignoring case), or an
/// empty string when there is none.
pub fn resolve_path(config: &Config, root: &Path, name: &str) -> Result<String> {
    let records = catalog::list_records(config, root)?;
    Ok(resolve_in(&records, name))
}

fn resolve_in(records: &[Record], name: &str) -> String {
    let needle = name.to_lowercase();
    records
        .iter()
        .find(|r| r.name.to_lowercase() == needle)
        .map(|r| r.local_path.clone())
        .unwrap_or_default()
}

/// CLI entry point for `kb find`: prints the report as JSON.
pub fn run_find(config: &Config, root: &Path, query: Option<&str>) -> Result<()> {
    let query = catalog::non_empty(query).ok_or_else(|| {
        KbError::InvalidArgument("--query is required for find command".to_string())
    })?;

    let report = search(config, root, query)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// CLI entry point for `kb get-path`: prints the path or an empty line.
pub fn run_get_path(config: &Config, root: &Path, name: Option<&str>) -> Result<()> {
    let name = catalog::non_empty(name).ok_or_else(|| {
        KbError::InvalidArgument("--name is required for get-path command".to_string())
    })?;

    println!("{}", resolve_path(config, root, name)?);
    Ok(())
}
