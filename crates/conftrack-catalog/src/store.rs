//! Catalog file access
//!
//! The catalog lives in one JSON array. Loading is forgiving about shape
//! (a missing file or a non-array document is an empty catalog, non-object
//! elements are skipped) but a file that is not JSON at all is an error, so a
//! damaged catalog is never silently replaced.

use crate::canonical::normalize;
use crate::error::StoreError;
use crate::record::{RawRecord, Record};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default catalog location, relative to the working directory
pub const DEFAULT_CATALOG_PATH: &str = "data/conferences.json";

/// Load and normalize a catalog file
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file exists but cannot be read and
/// [`StoreError::Json`] if it is not valid JSON.
pub fn load_catalog(path: &Path) -> Result<Vec<Record>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no baseline catalog, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    if text.trim().is_empty() {
        warn!(path = %path.display(), "baseline catalog is empty");
        return Ok(Vec::new());
    }

    let document: Value = serde_json::from_str(&text).map_err(|e| StoreError::json(path, e))?;
    let Value::Array(items) = document else {
        warn!(path = %path.display(), "baseline catalog is not a JSON array, starting empty");
        return Ok(Vec::new());
    };

    let total = items.len();
    let records: Vec<Record> = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| match serde_json::from_value::<RawRecord>(item) {
            Ok(raw) => Some(normalize(&raw)),
            Err(e) => {
                warn!(error = %e, "skipping unreadable catalog entry");
                None
            }
        })
        .collect();

    if records.len() < total {
        debug!(skipped = total - records.len(), "skipped non-record elements");
    }
    info!(path = %path.display(), entries = records.len(), "baseline loaded");
    Ok(records)
}

/// Write a catalog as pretty-printed JSON with a trailing newline
///
/// Parent directories are created as needed. The text goes to a sibling
/// temporary file that is renamed over `path`, so an interrupted write leaves
/// the previous catalog in place.
///
/// # Errors
///
/// Returns [`StoreError`] if the directory or file cannot be written.
pub fn write_catalog(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut text = serde_json::to_string_pretty(records).map_err(|e| StoreError::json(path, e))?;
    text.push('\n');

    let tmp = sibling_tmp(path);
    let written = write_synced(&tmp, text.as_bytes()).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(path, e));
    }

    info!(path = %path.display(), entries = records.len(), "catalog written");
    Ok(())
}

fn sibling_tmp(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "catalog".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{name}.tmp.{}", std::process::id()))
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
