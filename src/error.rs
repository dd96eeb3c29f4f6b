//! Error handling for blueprint.
//! Defines the error kinds raised along the rendering pipeline and the result
//! alias used throughout the crate.

use std::io;
use thiserror::Error;

/// Errors raised while loading a project and rendering it.
///
/// None of these are recovered inside the pipeline: the first one raised stops
/// the run and is handed back to the caller of [`crate::processor::process`].
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file is missing from the project root.
    #[error("Configuration file '{path}' not found.")]
    ConfigNotFound { path: String },

    /// The configuration file could not be parsed.
    #[error("Configuration error: {0}.")]
    ConfigParseError(String),

    /// Filesystem failure while reading project files.
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A project file could not be read.
    #[error("Failed to read '{path}': {source}.")]
    ReadError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failure while walking the project directory.
    #[error("Failed to traverse project: {0}.")]
    WalkDirError(#[from] walkdir::Error),

    /// Failure while cloning or reading a git repository.
    #[error("Git error: {0}.")]
    Git2Error(#[from] git2::Error),

    /// Any other failure reported by a project provider.
    #[error("Provider error: {0}.")]
    ProviderError(String),

    /// A project file is not a syntactically valid template.
    #[error("Failed to compile template '{name}': {source}.")]
    TemplateCompileError {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// A template failed while being rendered.
    #[error("Failed to render template '{name}': {source}.")]
    TemplateExecutionError {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// An output directory or file could not be created or written.
    #[error("Failed to write '{path}': {source}.")]
    OutputWriteError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Invalid pattern in the ignore file.
    #[error("Ignore pattern error: {0}.")]
    IgnoreError(String),
}

/// Convenience type alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Prints the error to stderr and exits with status code 1.
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
