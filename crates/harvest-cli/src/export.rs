//! CSV export sink for harvested records.
//!
//! Runs strictly after the browser session has been released, so a failed
//! write can never leak a page handle.

use std::path::{Path, PathBuf};

use harvest_scraper::ProductRecord;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not create {path}")]
    Create {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("could not append a record to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("could not flush {path}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes the collected records to `path` as CSV.
///
/// An empty collection is a no-op: a warning is logged and no file is
/// created.
///
/// # Errors
///
/// Returns [`ExportError`] when the file cannot be created or written.
pub fn write_csv(path: &Path, records: &[ProductRecord]) -> Result<(), ExportError> {
    if records.is_empty() {
        warn!("no records were collected; skipping CSV export");
        return Ok(());
    }

    info!(path = %path.display(), count = records.len(), "writing CSV export");
    let mut writer = csv::Writer::from_path(path).map_err(|e| ExportError::Create {
        path: path.to_owned(),
        source: e,
    })?;
    for record in records {
        writer.serialize(record).map_err(|e| ExportError::Write {
            path: path.to_owned(),
            source: e,
        })?;
    }
    writer.flush().map_err(|e| ExportError::Flush {
        path: path.to_owned(),
        source: e,
    })?;
    info!(path = %path.display(), "export complete");
    Ok(())
}
