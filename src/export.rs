// src/export.rs

//! Export of the output buffer to a file.
//!
//! Whatever extension is chosen, the file receives the raw buffer text,
//! byte for byte. `.csv` and `.pdf` are offered as names only.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::engine::OutputBuffer;
use crate::errors::{RelayError, Result};
use crate::fs::FileSystem;

/// Extension appended when the chosen path has none.
pub const DEFAULT_EXTENSION: &str = "txt";

/// File types offered when choosing an export destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Csv,
    Pdf,
}

impl ExportFormat {
    pub const OFFERED: [ExportFormat; 3] = [ExportFormat::Text, ExportFormat::Csv, ExportFormat::Pdf];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::OFFERED.into_iter().find(|f| f.extension() == ext)
    }
}

/// Apply the default extension to a path that has none.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

/// Write the buffer text verbatim to `path` (default extension applied).
///
/// - A blank buffer is [`RelayError::NoResults`] and touches no file.
/// - A failed write is [`RelayError::Export`]; the buffer is never modified.
pub fn export_results(buffer: &OutputBuffer, path: &Path, fs: &dyn FileSystem) -> Result<PathBuf> {
    if buffer.is_blank() {
        return Err(RelayError::NoResults);
    }

    let target = with_default_extension(path);
    if ExportFormat::from_path(&target).is_none() {
        warn!(
            path = %target.display(),
            "unrecognised export extension; writing raw text"
        );
    }

    let text = buffer.text();
    fs.write(&target, text.as_bytes())
        .map_err(|source| RelayError::Export {
            path: target.clone(),
            // Keep the whole context chain, down to the OS reason.
            source: format!("{source:#}").into(),
        })?;

    info!(path = %target.display(), bytes = text.len(), "results exported");
    Ok(target)
}
