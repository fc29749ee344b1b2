//! Input file preparation
//!
//! `.zip` inputs are unpacked: the first `.csv` entry in archive order is
//! copied to a scratch file that is removed when the [`InputFile`] drops.
//! Any other path is read as CSV directly.

use super::error::{AnalyticsError, AnalyticsResult};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A CSV file ready to be read, possibly extracted from an archive
#[derive(Debug)]
pub struct InputFile {
    source: PathBuf,
    scratch: Option<NamedTempFile>,
}

impl InputFile {
    pub fn prepare(path: impl AsRef<Path>) -> AnalyticsResult<Self> {
        let path = path.as_ref();

        if !is_zip(path) {
            return Ok(Self {
                source: path.to_path_buf(),
                scratch: None,
            });
        }

        log::info!("📦 Detected ZIP file, extracting {}", path.display());
        let scratch = extract_first_csv(path)?;
        log::debug!("Extracted to: {}", scratch.path().display());

        Ok(Self {
            source: path.to_path_buf(),
            scratch: Some(scratch),
        })
    }

    /// Path of the CSV to read
    pub fn csv_path(&self) -> &Path {
        match &self.scratch {
            Some(file) => file.path(),
            None => &self.source,
        }
    }

    /// Path the caller asked for
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_extracted(&self) -> bool {
        self.scratch.is_some()
    }
}

impl Drop for InputFile {
    fn drop(&mut self) {
        if let Some(file) = &self.scratch {
            log::debug!("Cleaned up temporary file: {}", file.path().display());
        }
    }
}

pub fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("zip"))
}

fn extract_first_csv(path: &Path) -> AnalyticsResult<NamedTempFile> {
    let read_err = |source: io::Error| AnalyticsError::SourceRead {
        path: path.to_path_buf(),
        source,
    };
    let archive_err = |source: zip::result::ZipError| AnalyticsError::Archive {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_err)?;

    if archive.len() == 0 {
        return Err(AnalyticsError::EmptyArchive(path.to_path_buf()));
    }

    let mut found = None;
    for index in 0..archive.len() {
        let entry = archive.by_index(index).map_err(archive_err)?;
        if !entry.is_dir() && entry.name().to_ascii_lowercase().ends_with(".csv") {
            log::info!("Found CSV in ZIP: {}", entry.name());
            found = Some(index);
            break;
        }
    }
    let index = found.ok_or_else(|| AnalyticsError::NoCsvInArchive(path.to_path_buf()))?;

    let mut entry = archive.by_index(index).map_err(archive_err)?;
    let mut scratch = tempfile::Builder::new()
        .prefix("ad_data_")
        .suffix(".csv")
        .tempfile()
        .map_err(read_err)?;

    io::copy(&mut entry, scratch.as_file_mut()).map_err(read_err)?;
    scratch.flush().map_err(read_err)?;

    Ok(scratch)
}
