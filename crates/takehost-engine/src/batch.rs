//! In-place processing of many takes through one chain, with backups.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use takehost_config::ChainSpec;
use thiserror::Error;

use crate::error::HostError;
use crate::pipeline::OfflinePipeline;

/// Prefix of per-directory backup folders.
pub const BACKUP_PREFIX: &str = "_backup_vst_";

/// Marker inserted between stem and extension of temporary outputs.
const TEMP_MARKER: &str = "vsttmp";

/// Errors that stop a batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Nothing to process.
    #[error("no files selected")]
    NoFiles,

    /// A take disappeared before it was processed.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The backup folder or copy could not be created.
    #[error("failed to back up {}: {source}", path.display())]
    Backup {
        /// File or folder that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Rendering a take failed.
    #[error("failed to process {}: {source}", path.display())]
    Process {
        /// The take.
        path: PathBuf,
        /// Pipeline failure.
        #[source]
        source: HostError,
    },

    /// The rendered file could not replace the original.
    #[error("failed to replace {}: {source}", path.display())]
    Replace {
        /// The take.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Progress through a batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'p> {
    /// Files finished so far.
    pub done: usize,
    /// Files in the batch.
    pub total: usize,
    /// File being started or just finished.
    pub path: &'p Path,
}

/// Result of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files processed.
    pub processed: usize,
    /// Backup folders created, one per source directory.
    pub backup_dirs: Vec<PathBuf>,
}

/// Processes takes in place through one chain.
#[derive(Debug)]
pub struct BatchRunner<'a> {
    pipeline: &'a OfflinePipeline<'a>,
    chain: &'a ChainSpec,
    stamp: String,
}

impl<'a> BatchRunner<'a> {
    /// Runner whose backup folders are stamped with the current local time.
    pub fn new(pipeline: &'a OfflinePipeline<'a>, chain: &'a ChainSpec) -> Self {
        Self {
            pipeline,
            chain,
            stamp: chrono::Local::now().format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    /// Override the backup timestamp.
    pub fn with_stamp(mut self, stamp: impl Into<String>) -> Self {
        self.stamp = stamp.into();
        self
    }

    /// Name of the backup folder created in every source directory.
    pub fn backup_dir_name(&self) -> String {
        format!("{BACKUP_PREFIX}{}", self.stamp)
    }

    /// Process every file, stopping at the first failure.
    ///
    /// `on_progress` is called before each file with the count finished so
    /// far and after each file with the count including it.
    pub fn run(
        &self,
        files: &[PathBuf],
        mut on_progress: impl FnMut(BatchProgress<'_>),
    ) -> Result<BatchReport, BatchError> {
        if files.is_empty() {
            return Err(BatchError::NoFiles);
        }

        let mut backups: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut report = BatchReport::default();
        for file in files {
            let parent = parent_dir(file);
            if !backups.contains_key(&parent) {
                let dir = parent.join(self.backup_dir_name());
                std::fs::create_dir_all(&dir).map_err(|source| BatchError::Backup {
                    path: dir.clone(),
                    source,
                })?;
                backups.insert(parent, dir.clone());
                report.backup_dirs.push(dir);
            }
        }

        let total = files.len();
        for (index, file) in files.iter().enumerate() {
            on_progress(BatchProgress {
                done: index,
                total,
                path: file,
            });
            let backup_dir = &backups[&parent_dir(file)];
            self.process_one(file, backup_dir)?;
            report.processed += 1;
            on_progress(BatchProgress {
                done: index + 1,
                total,
                path: file,
            });
        }

        tracing::info!(files = report.processed, "batch complete");
        Ok(report)
    }

    fn process_one(&self, file: &Path, backup_dir: &Path) -> Result<(), BatchError> {
        if !file.is_file() {
            return Err(BatchError::FileNotFound(file.to_path_buf()));
        }
        if let Some(name) = file.file_name() {
            let backup = backup_dir.join(name);
            std::fs::copy(file, &backup).map_err(|source| BatchError::Backup {
                path: backup,
                source,
            })?;
        }

        let temp = TempOutput::new(temp_output_path(file));
        if temp.path.exists() {
            std::fs::remove_file(&temp.path).map_err(|source| BatchError::Replace {
                path: temp.path.clone(),
                source,
            })?;
        }

        tracing::info!(file = %file.display(), "processing");
        self.pipeline
            .run(file, &temp.path, self.chain, |_| {})
            .map_err(|source| BatchError::Process {
                path: file.to_path_buf(),
                source,
            })?;

        std::fs::rename(&temp.path, file).map_err(|source| BatchError::Replace {
            path: file.to_path_buf(),
            source,
        })
    }
}

fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `<stem>.vsttmp.<ext>` next to `file`.
pub fn temp_output_path(file: &Path) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    let name = match file.extension() {
        Some(ext) => format!("{stem}.{TEMP_MARKER}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{TEMP_MARKER}"),
    };
    file.with_file_name(name)
}

/// Removes the temporary output when processing does not get as far as
/// renaming it.
struct TempOutput {
    path: PathBuf,
}

impl TempOutput {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for TempOutput {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_name_keeps_extension() {
        assert_eq!(
            temp_output_path(Path::new("/takes/a_01.wav")),
            Path::new("/takes/a_01.vsttmp.wav")
        );
        assert_eq!(
            temp_output_path(Path::new("/takes/raw")),
            Path::new("/takes/raw.vsttmp")
        );
    }

    #[test]
    fn bare_file_name_uses_current_dir() {
        assert_eq!(parent_dir(Path::new("take.wav")), PathBuf::from("."));
    }
}
