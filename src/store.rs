//! Locating, reading and writing the knowledge-base document.
//!
//! Writes replace the whole file in place. There is no temporary file and no
//! rename, so a crash mid-write can leave the document truncated.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{KbError, KbResult};

/// Resolve a user-supplied knowledge-base root to an absolute directory.
///
/// Expands a leading `~`, canonicalizes if the directory exists, and
/// otherwise anchors a relative path at the current directory.
pub fn resolve_root(path: &Path) -> KbResult<PathBuf> {
    let expanded = expand_tilde(path);
    match expanded.canonicalize() {
        Ok(p) => Ok(p),
        Err(_) if expanded.is_absolute() => Ok(expanded),
        Err(_) => {
            let cwd = std::env::current_dir().map_err(|e| KbError::io(".", e))?;
            Ok(cwd.join(expanded))
        }
    }
}

pub fn document_path(config: &Config, kb_dir: &Path) -> PathBuf {
    kb_dir.join(&config.document.file_name)
}

/// Read the document, or `None` if it does not exist yet.
pub fn read_document(path: &Path) -> KbResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(KbError::io(path, e)),
    }
}

pub fn write_document(path: &Path, text: &str) -> KbResult<()> {
    std::fs::write(path, text).map_err(|e| KbError::io(path, e))
}

pub fn ensure_dir(dir: &Path) -> KbResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| KbError::io(dir, e))
}

/// Expand `~` at the start of a path to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if s.starts_with("~/") || s == "~" {
        if let Some(home) = home_dir() {
            return home.join(s.strip_prefix("~/").unwrap_or(""));
        }
    }
    path.to_path_buf()
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
