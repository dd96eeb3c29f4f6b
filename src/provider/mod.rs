//! Project providers: where the configuration and template files of a project
//! come from.
use crate::constants::{CONFIG_FILE, IGNORE_FILE};
use crate::error::Result;
use log::info;
use std::path::{Path, PathBuf};
use url::Url;

pub mod git;
pub mod local;

pub use git::GitProvider;
pub use local::FileSystemProvider;

/// Callback invoked once per project file with its directory relative to the
/// project root, its file name and its content.
pub type FileHandler<'a> = dyn FnMut(&Path, &str, &str) -> Result<()> + 'a;

/// Access to the files of a project.
pub trait ProjectProvider {
    /// Returns the raw content of the project's configuration file.
    ///
    /// # Errors
    /// * `Error::ConfigNotFound` if the project has no configuration file
    fn read_config(&self) -> Result<String>;

    /// Calls `handler` for every project file.
    ///
    /// Directories, the configuration file, the ignore file and ignored paths are
    /// skipped. The first error returned by `handler` or raised while traversing
    /// stops the enumeration and is returned.
    fn process_files(&self, handler: &mut FileHandler<'_>) -> Result<()>;

    /// Same as [`ProjectProvider::process_files`], but never yields files from
    /// `output`, the directory the current run writes to.
    ///
    /// Only providers whose files can live next to the output need to override it.
    fn process_files_except(&self, output: &Path, handler: &mut FileHandler<'_>) -> Result<()> {
        let _ = output;
        self.process_files(handler)
    }
}

/// Represents the source location of a project.
#[derive(Debug, PartialEq, Eq)]
pub enum ProjectSource {
    /// Local filesystem project path
    FileSystem(PathBuf),
    /// Git repository URL (HTTPS, SSH or file)
    Git(String),
}

impl std::fmt::Display for ProjectSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectSource::FileSystem(path) => {
                write!(f, "local path: '{}'", path.display())
            }
            ProjectSource::Git(repo) => write!(f, "git repository: '{repo}'"),
        }
    }
}

impl ProjectSource {
    /// Classifies a command-line argument as a git URL or a local path.
    pub fn from_string(s: &str) -> Self {
        if is_git_url(s) {
            Self::Git(s.to_string())
        } else {
            Self::FileSystem(PathBuf::from(s))
        }
    }
}

/// Whether `s` looks like a git remote rather than a local path.
pub fn is_git_url(s: &str) -> bool {
    if s.starts_with("git@") {
        return true;
    }

    match Url::parse(s) {
        Ok(url) => matches!(url.scheme(), "https" | "http" | "git" | "ssh" | "file"),
        Err(_) => false,
    }
}

/// Returns the provider for the project named by `source`.
///
/// Git sources are cloned right away, optionally at `branch`.
pub fn get_provider(source: &str, branch: Option<&str>) -> Result<Box<dyn ProjectProvider>> {
    let source = ProjectSource::from_string(source);
    info!("Using project from the {source}");

    let provider: Box<dyn ProjectProvider> = match source {
        ProjectSource::Git(url) => Box::new(GitProvider::new(url, branch)?),
        ProjectSource::FileSystem(path) => Box::new(FileSystemProvider::new(path)),
    };
    Ok(provider)
}

/// Files at the project root that are never handed to the renderer.
pub(crate) fn is_reserved(relative: &Path) -> bool {
    relative == Path::new(CONFIG_FILE) || relative == Path::new(IGNORE_FILE)
}
