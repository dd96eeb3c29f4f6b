//! Project provider backed by a directory on the local filesystem.

use crate::constants::{CONFIG_FILE, IGNORE_FILE};
use crate::error::{Error, Result};
use crate::ignore::parse_ignore_patterns;
use crate::provider::{is_reserved, FileHandler, ProjectProvider};
use globset::GlobSet;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Provides project files from a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSystemProvider {
    root: PathBuf,
}

impl FileSystemProvider {
    /// Creates a provider rooted at `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn ignore_patterns(&self) -> Result<GlobSet> {
        let ignore_path = self.root.join(IGNORE_FILE);
        let contents = if ignore_path.is_file() {
            debug!("Loading ignore patterns from {}", ignore_path.display());
            Some(read_file(&ignore_path)?)
        } else {
            None
        };
        parse_ignore_patterns(contents.as_deref())
    }

    /// Walks the project root in file name order, pruning the `output` directory.
    fn walk(&self, output: Option<&Path>, handler: &mut FileHandler<'_>) -> Result<()> {
        let ignored = self.ignore_patterns()?;
        // Only an existing directory can hold files from a previous run.
        let output = output.and_then(|path| fs::canonicalize(path).ok());

        let entries = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_output_dir(entry, output.as_deref()));

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path
                .strip_prefix(&self.root)
                .map_err(|e| Error::ProviderError(e.to_string()))?;

            if is_reserved(relative) {
                continue;
            }
            if ignored.is_match(relative) {
                debug!("Skipping ignored file {}", relative.display());
                continue;
            }

            let name = entry.file_name().to_str().ok_or_else(|| {
                Error::ProviderError(format!("Invalid file name: {}", path.display()))
            })?;
            let dir = relative.parent().unwrap_or_else(|| Path::new(""));
            let content = read_file(path)?;

            debug!("Processing source file: {}", relative.display());
            handler(dir, name, &content)?;
        }

        Ok(())
    }
}

impl ProjectProvider for FileSystemProvider {
    /// Reads `bp.yaml` from the project root.
    fn read_config(&self) -> Result<String> {
        let config_path = self.root.join(CONFIG_FILE);
        if !config_path.is_file() {
            return Err(Error::ConfigNotFound { path: config_path.display().to_string() });
        }

        debug!("Loading configuration from {}", config_path.display());
        read_file(&config_path)
    }

    fn process_files(&self, handler: &mut FileHandler<'_>) -> Result<()> {
        self.walk(None, handler)
    }

    /// Skips `output` when the build directory lives inside the project.
    fn process_files_except(&self, output: &Path, handler: &mut FileHandler<'_>) -> Result<()> {
        self.walk(Some(output), handler)
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|source| Error::ReadError { path: path.display().to_string(), source })
}

fn is_output_dir(entry: &DirEntry, output: Option<&Path>) -> bool {
    let Some(output) = output else {
        return false;
    };
    // The project root itself is never pruned.
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    if fs::canonicalize(entry.path()).is_ok_and(|path| path == output) {
        debug!("Skipping output directory {}", entry.path().display());
        return true;
    }
    false
}
