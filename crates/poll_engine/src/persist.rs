use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use poll_core::JobElement;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes the current markup of every job element as a standalone HTML snapshot.
///
/// Each write replaces the previous snapshot atomically, so a reader never sees a
/// half-written file while polling is still in progress.
pub struct SnapshotWriter {
    dir: PathBuf,
    filename: String,
}

impl SnapshotWriter {
    pub fn new(dir: PathBuf, filename: impl Into<String>) -> Self {
        Self {
            dir,
            filename: filename.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    pub fn write<'a>(
        &self,
        elements: impl IntoIterator<Item = &'a JobElement>,
    ) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let mut body = String::from("<!DOCTYPE html>\n<html><body>\n");
        for element in elements {
            body.push_str(&element.render_outer_html());
            body.push('\n');
        }
        body.push_str("</body></html>\n");

        let target = self.path();
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(body.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
