//! Output writer for generated files
//!
//! Writes rendered files under an output base directory. Supports dry-run
//! mode. Existing files are backed up before being overwritten; if a later
//! write fails, backups are restored and new files removed, so a failed run
//! leaves the previous tree as it was.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::executor::RenderedFile;

/// Suffix of the copy kept while an existing file is overwritten
pub const BACKUP_SUFFIX: &str = ".bak";

/// Result of writing a set of files
#[derive(Debug, Clone, Default)]
pub struct WriteResult {
    /// Target paths, in write order
    pub paths: Vec<PathBuf>,
    /// Files actually written (zero in dry-run mode)
    pub files_written: usize,
    /// Whether this was a dry-run
    pub dry_run: bool,
}

/// Writes rendered files under a base directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    base: PathBuf,
    output_package: String,
    dry_run: bool,
}

impl OutputWriter {
    /// Create a writer placing `output_package` at `base`
    pub fn new(base: impl Into<PathBuf>, output_package: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            output_package: output_package.into(),
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Base directory
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Where `file` will be written
    pub fn target_path(&self, file: &RenderedFile) -> PathBuf {
        self.base.join(file.relative_path(&self.output_package))
    }

    /// Write every file, or none of them
    pub fn write_all(&self, files: &[RenderedFile]) -> Result<WriteResult, GenerationError> {
        let paths: Vec<PathBuf> = files.iter().map(|f| self.target_path(f)).collect();
        if self.dry_run {
            return Ok(WriteResult {
                paths,
                files_written: 0,
                dry_run: true,
            });
        }

        let mut touched: Vec<(PathBuf, Option<PathBuf>)> = Vec::new();
        for (file, path) in files.iter().zip(&paths) {
            let backup = if path.is_file() {
                match create_backup(path) {
                    Ok(backup) => Some(backup),
                    Err(e) => {
                        rollback(&touched);
                        return Err(e);
                    }
                }
            } else {
                None
            };
            touched.push((path.clone(), backup));

            if let Err(e) = write_file(path, &file.assemble()) {
                rollback(&touched);
                return Err(e);
            }
            debug!(path = %path.display(), "wrote file");
        }

        discard_backups(&touched);
        Ok(WriteResult {
            files_written: touched.len(),
            paths,
            dry_run: false,
        })
    }
}

/// Backup location for `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn create_backup(path: &Path) -> Result<PathBuf, GenerationError> {
    let backup = backup_path(path);
    fs::copy(path, &backup).map_err(|e| {
        GenerationError::WriteFailed(format!("Failed to back up {}: {}", path.display(), e))
    })?;
    Ok(backup)
}

fn write_file(path: &Path, content: &[u8]) -> Result<(), GenerationError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            GenerationError::WriteFailed(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    fs::write(path, content).map_err(|e| {
        GenerationError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
    })
}

fn rollback(touched: &[(PathBuf, Option<PathBuf>)]) {
    for (path, backup) in touched.iter().rev() {
        let restored = match backup {
            Some(backup) => fs::rename(backup, path),
            None if path.exists() => fs::remove_file(path),
            None => Ok(()),
        };
        if let Err(e) = restored {
            warn!(path = %path.display(), error = %e, "rollback failed");
        }
    }
}

fn discard_backups(touched: &[(PathBuf, Option<PathBuf>)]) {
    for backup in touched.iter().filter_map(|(_, backup)| backup.as_ref()) {
        if let Err(e) = fs::remove_file(backup) {
            warn!(path = %backup.display(), error = %e, "failed to remove backup");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const OUT: &str = "github.com/acme/app";

    fn file(relative: &str, stem: &str) -> RenderedFile {
        RenderedFile {
            package_name: "server".to_string(),
            package_path: format!("{}/{}", OUT, relative),
            file_stem: stem.to_string(),
            header: Vec::new(),
            documentation: None,
            imports: Vec::new(),
            body: "\nvar x = 1\n".to_string(),
        }
    }

    #[test]
    fn test_write_all_creates_tree() {
        let temp = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp.path(), OUT);
        let result = writer
            .write_all(&[file("server", "server"), file("server/controller/secret", "secret")])
            .unwrap();
        assert_eq!(result.files_written, 2);
        let content =
            fs::read_to_string(temp.path().join("server/controller/secret/secret.go")).unwrap();
        assert_eq!(content, "package server\n\nvar x = 1\n");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp.path(), OUT).with_dry_run(true);
        let result = writer.write_all(&[file("server", "server")]).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.files_written, 0);
        assert_eq!(result.paths, vec![temp.path().join("server/server.go")]);
        assert!(!temp.path().join("server").exists());
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let temp = TempDir::new().unwrap();
        // A regular file where a directory is needed makes the second write fail
        fs::write(temp.path().join("blocked"), "").unwrap();
        let writer = OutputWriter::new(temp.path(), OUT);
        let err = writer
            .write_all(&[file("server", "server"), file("blocked/inner", "x")])
            .unwrap_err();
        assert!(matches!(err, GenerationError::WriteFailed(_)));
        assert!(!temp.path().join("server/server.go").exists());
    }

    #[test]
    fn test_failed_write_restores_previous_output() {
        let temp = TempDir::new().unwrap();
        let server = temp.path().join("server/server.go");
        fs::create_dir_all(server.parent().unwrap()).unwrap();
        fs::write(&server, "previous run output").unwrap();
        fs::write(temp.path().join("blocked"), "").unwrap();

        let writer = OutputWriter::new(temp.path(), OUT);
        let err = writer
            .write_all(&[file("server", "server"), file("blocked/inner", "x")])
            .unwrap_err();

        assert!(matches!(err, GenerationError::WriteFailed(_)));
        assert_eq!(fs::read_to_string(&server).unwrap(), "previous run output");
        assert!(!backup_path(&server).exists());
    }

    #[test]
    fn test_successful_overwrite_leaves_no_backup() {
        let temp = TempDir::new().unwrap();
        let server = temp.path().join("server/server.go");
        fs::create_dir_all(server.parent().unwrap()).unwrap();
        fs::write(&server, "previous run output").unwrap();

        OutputWriter::new(temp.path(), OUT)
            .write_all(&[file("server", "server")])
            .unwrap();

        assert_eq!(fs::read_to_string(&server).unwrap(), "package server\n\nvar x = 1\n");
        assert!(!backup_path(&server).exists());
    }
}
