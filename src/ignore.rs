//! File and directory ignore pattern handling for blueprint projects.
//! Processes the `.bpignore` file to exclude specific paths from rendering,
//! similar to .gitignore functionality.

use crate::constants::DEFAULT_IGNORE_PATTERNS;
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;

/// Builds the set of ignore patterns from the contents of a `.bpignore` file.
///
/// # Arguments
/// * `contents` - Contents of the ignore file, `None` if the project has none
///
/// # Notes
/// - The default patterns are always part of the returned set
/// - Each non-empty line not starting with `#` is a separate glob pattern
/// - Invalid patterns result in an `IgnoreError`
///
/// # Example
/// ```ignore
/// # Contents of .bpignore:
/// *.pyc
/// __pycache__/**
/// ```
pub fn parse_ignore_patterns(contents: Option<&str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in DEFAULT_IGNORE_PATTERNS {
        builder.add(compile_pattern(pattern)?);
    }

    match contents {
        Some(contents) => {
            for line in contents.lines().map(str::trim) {
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                builder.add(compile_pattern(line)?);
            }
        }
        None => debug!("No ignore file, using default patterns"),
    }

    builder
        .build()
        .map_err(|e| Error::IgnoreError(format!("ignore patterns loading failed: {e}")))
}

fn compile_pattern(pattern: &str) -> Result<Glob> {
    Glob::new(pattern)
        .map_err(|e| Error::IgnoreError(format!("invalid pattern '{pattern}': {e}")))
}
