//! Persistence for the build artifacts.
//!
//! The inverted index is written as a JSON object (token → recipe ids) and the
//! augmented table as CSV. Both are written to sibling `.tmp` files first and
//! renamed into place together. Artifacts from a previous run are moved to
//! `.bak` while committing and restored if any rename fails, so a failed run
//! never leaves a new artifact behind.

use crate::error::{Error, Result};
use crate::indexer::{AugmentedTable, InvertedIndex};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An artifact written to a temporary file, waiting to be renamed into place.
///
/// Dropping it before [`commit_all`] succeeds removes the temp file.
#[derive(Debug)]
struct StagedFile {
    tmp_path: PathBuf,
    path: PathBuf,
    backup_path: Option<PathBuf>,
    committed: bool,
}

impl StagedFile {
    fn new(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Err(Error::Validation(format!(
                "Output path is a directory: {}",
                path.display()
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            tmp_path: sibling(path, ".tmp")?,
            path: path.to_path_buf(),
            backup_path: None,
            committed: false,
        })
    }

    fn back_up_existing(&mut self) -> Result<()> {
        if self.path.exists() {
            let backup = sibling(&self.path, ".bak")?;
            fs::rename(&self.path, &backup)?;
            self.backup_path = Some(backup);
        }
        Ok(())
    }

    fn install(&mut self) -> Result<()> {
        fs::rename(&self.tmp_path, &self.path)?;
        self.committed = true;
        debug!("Committed {}", self.path.display());
        Ok(())
    }

    fn roll_back(&mut self) {
        if self.committed {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("Failed to remove {}: {}", self.path.display(), e);
            }
            self.committed = false;
        }
        if let Some(backup) = self.backup_path.take() {
            if let Err(e) = fs::rename(&backup, &self.path) {
                warn!(
                    "Failed to restore {} from {}: {}",
                    self.path.display(),
                    backup.display(),
                    e
                );
            }
        }
    }

    fn discard_backup(&mut self) {
        if let Some(backup) = self.backup_path.take() {
            if let Err(e) = fs::remove_file(&backup) {
                warn!("Failed to remove backup {}: {}", backup.display(), e);
            }
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed && self.tmp_path.exists() {
            if let Err(e) = fs::remove_file(&self.tmp_path) {
                warn!(
                    "Failed to remove temporary file {}: {}",
                    self.tmp_path.display(),
                    e
                );
            }
        }
    }
}

fn sibling(path: &Path, suffix: &str) -> Result<PathBuf> {
    let mut name: OsString = path
        .file_name()
        .ok_or_else(|| Error::Validation(format!("Not a file path: {}", path.display())))?
        .to_os_string();
    name.push(suffix);
    Ok(path.with_file_name(name))
}

/// Rename every staged file into place, or none of them.
fn commit_all(mut files: Vec<StagedFile>) -> Result<()> {
    let result = files
        .iter_mut()
        .try_for_each(StagedFile::back_up_existing)
        .and_then(|()| files.iter_mut().try_for_each(StagedFile::install));

    match result {
        Ok(()) => {
            files.iter_mut().for_each(StagedFile::discard_backup);
            Ok(())
        }
        Err(e) => {
            files.iter_mut().for_each(StagedFile::roll_back);
            Err(e)
        }
    }
}

/// Write the index to a temporary file next to `path`.
fn stage_index(index: &InvertedIndex, path: &Path) -> Result<StagedFile> {
    let staged = StagedFile::new(path)?;
    let bytes = serde_json::to_vec_pretty(index)?;
    fs::write(&staged.tmp_path, &bytes)?;

    info!(
        "Staged inverted index: {} tokens, {} bytes",
        index.len(),
        bytes.len()
    );
    Ok(staged)
}

/// Write the augmented table to a temporary file next to `path`.
fn stage_table(table: &AugmentedTable, path: &Path) -> Result<StagedFile> {
    let staged = StagedFile::new(path)?;

    let mut writer = csv::Writer::from_path(&staged.tmp_path)?;
    writer.write_record(table.header())?;
    for row in table.rows() {
        writer.write_record(row.record())?;
    }
    writer.flush()?;

    info!("Staged recipe table: {} rows", table.len());
    Ok(staged)
}

/// Persist the index and the table together.
///
/// On error neither output path changes: new files are discarded and any
/// previous artifacts are left in place.
pub fn save_artifacts(
    index: &InvertedIndex,
    index_path: &Path,
    table: &AugmentedTable,
    table_path: &Path,
) -> Result<()> {
    let staged_index = stage_index(index, index_path)?;
    let staged_table = stage_table(table, table_path)?;
    commit_all(vec![staged_index, staged_table])?;

    info!("Inverted index saved to {}", index_path.display());
    info!("Recipe table saved to {}", table_path.display());
    Ok(())
}

/// Load a previously saved inverted index.
pub fn load_index(path: &Path) -> Result<InvertedIndex> {
    let bytes = fs::read(path).map_err(|source| Error::InputFile {
        path: path.to_path_buf(),
        source,
    })?;
    let index: InvertedIndex = serde_json::from_slice(&bytes)?;
    debug!(
        "Loaded inverted index from {} ({} tokens)",
        path.display(),
        index.len()
    );
    Ok(index)
}
