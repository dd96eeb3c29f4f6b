//! Project provider backed by a git repository cloned on demand.

use crate::constants::{CONFIG_FILE, IGNORE_FILE};
use crate::error::{Error, Result};
use crate::ignore::parse_ignore_patterns;
use crate::provider::{is_reserved, FileHandler, ProjectProvider};
use git2::{ErrorCode, ObjectType, Repository, Tree, TreeEntry, TreeWalkMode, TreeWalkResult};
use globset::GlobSet;
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Provides project files from a remote git repository.
///
/// The repository is cloned once, bare, into a temporary directory owned by the
/// provider and removed when the provider is dropped. Files are read from the
/// tree `HEAD` points at.
pub struct GitProvider {
    url: String,
    // Dropped before `store` so the repository is closed before its files go.
    repo: Repository,
    store: TempDir,
}

impl GitProvider {
    /// Clones `url`, checking out `branch` or the remote default branch.
    ///
    /// # Errors
    /// * `Error::Git2Error` if the clone fails; nothing is kept from a failed clone
    pub fn new<S: Into<String>>(url: S, branch: Option<&str>) -> Result<Self> {
        let url = url.into();
        let store = tempfile::Builder::new().prefix("bp-clone-").tempdir()?;

        debug!("Cloning repository '{}' to '{}'.", url, store.path().display());

        // Set up authentication callbacks
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, _allowed_types| {
            let home = std::env::var("HOME")
                .map_err(|_| git2::Error::from_str("HOME is not set, cannot locate SSH key"))?;
            git2::Cred::ssh_key(
                username_from_url.unwrap_or("git"),
                None,
                &PathBuf::from(home).join(".ssh").join("id_rsa"),
                None,
            )
        });

        let mut fetch_opts = git2::FetchOptions::new();
        fetch_opts.remote_callbacks(callbacks);

        let mut builder = git2::build::RepoBuilder::new();
        builder.bare(true).fetch_options(fetch_opts);
        if let Some(branch) = branch {
            builder.branch(branch);
        }

        let repo = builder.clone(&url, store.path())?;
        Ok(Self { url, repo, store })
    }

    /// Location of the temporary clone.
    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    fn head_tree(&self) -> Result<Tree<'_>> {
        Ok(self.repo.head()?.peel_to_tree()?)
    }

    fn read_blob(&self, tree: &Tree<'_>, path: &str) -> Result<Option<String>> {
        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if entry.kind() != Some(ObjectType::Blob) {
            return Ok(None);
        }
        self.blob_content(&entry, path).map(Some)
    }

    fn blob_content(&self, entry: &TreeEntry<'_>, path: &str) -> Result<String> {
        let blob = self.repo.find_blob(entry.id())?;
        let content = std::str::from_utf8(blob.content())
            .map_err(|e| Error::ProviderError(format!("'{path}' is not valid UTF-8: {e}")))?;
        Ok(content.to_string())
    }

    fn visit(
        &self,
        root: &str,
        entry: &TreeEntry<'_>,
        ignored: &GlobSet,
        handler: &mut FileHandler<'_>,
    ) -> Result<()> {
        let name = entry
            .name()
            .ok_or_else(|| Error::ProviderError(format!("Invalid file name in '{root}'")))?;
        let dir = Path::new(root.trim_end_matches('/'));
        let relative = dir.join(name);

        if is_reserved(&relative) {
            return Ok(());
        }
        if ignored.is_match(&relative) {
            debug!("Skipping ignored file {}", relative.display());
            return Ok(());
        }

        let content = self.blob_content(entry, &relative.display().to_string())?;
        debug!("Processing source file: {}", relative.display());
        handler(dir, name, &content)
    }
}

impl ProjectProvider for GitProvider {
    /// Reads `bp.yaml` from the root of the repository.
    fn read_config(&self) -> Result<String> {
        let tree = self.head_tree()?;
        self.read_blob(&tree, CONFIG_FILE)?
            .ok_or_else(|| Error::ConfigNotFound { path: format!("{}/{}", self.url, CONFIG_FILE) })
    }

    /// Walks the `HEAD` tree in pre-order.
    fn process_files(&self, handler: &mut FileHandler<'_>) -> Result<()> {
        let tree = self.head_tree()?;
        let ignored = parse_ignore_patterns(self.read_blob(&tree, IGNORE_FILE)?.as_deref())?;

        let mut failure = None;
        let walked = tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() != Some(ObjectType::Blob) {
                return TreeWalkResult::Ok;
            }
            match self.visit(root, entry, &ignored, &mut *handler) {
                Ok(()) => TreeWalkResult::Ok,
                Err(e) => {
                    failure = Some(e);
                    TreeWalkResult::Abort
                }
            }
        });

        if let Some(e) = failure {
            return Err(e);
        }
        walked?;
        Ok(())
    }
}
