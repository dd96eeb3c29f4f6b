use std::fs;
use std::path::{Path, PathBuf};

use blueprint::error::Error;
use blueprint::processor::process;
use blueprint::provider::{FileSystemProvider, GitProvider, ProjectProvider};
use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;

fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// Collects (relative dir, name, content) for every file the provider yields.
fn collect(provider: &dyn ProjectProvider) -> Vec<(PathBuf, String, String)> {
    let mut entries = Vec::new();
    provider
        .process_files(&mut |dir: &Path, name: &str, content: &str| {
            entries.push((dir.to_path_buf(), name.to_string(), content.to_string()));
            Ok(())
        })
        .unwrap();
    entries
}

fn entry(dir: &str, name: &str, content: &str) -> (PathBuf, String, String) {
    (PathBuf::from(dir), name.to_string(), content.to_string())
}

#[test]
fn test_local_read_config() {
    let temp_dir = TempDir::new().unwrap();
    let provider = FileSystemProvider::new(temp_dir.path());

    match provider.read_config() {
        Err(Error::ConfigNotFound { path }) => assert!(path.ends_with("bp.yaml")),
        other => panic!("Expected ConfigNotFound, got {other:?}"),
    }

    write_tree(temp_dir.path(), &[("bp.yaml", "key: value")]);
    assert_eq!(provider.read_config().unwrap(), "key: value");
}

#[test]
fn test_local_config_directory_is_not_a_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("bp.yaml")).unwrap();

    let provider = FileSystemProvider::new(temp_dir.path());
    assert!(matches!(provider.read_config(), Err(Error::ConfigNotFound { .. })));
}

#[test]
fn test_local_enumeration() {
    let temp_dir = TempDir::new().unwrap();
    write_tree(
        temp_dir.path(),
        &[
            ("bp.yaml", "key: value"),
            ("b.txt", "b"),
            ("a.txt", "a"),
            ("sub/bp.yaml", "nested"),
            ("sub/deep/c.txt", "c"),
        ],
    );
    fs::create_dir_all(temp_dir.path().join("empty/dir")).unwrap();

    let entries = collect(&FileSystemProvider::new(temp_dir.path()));

    assert_eq!(
        entries,
        vec![
            entry("", "a.txt", "a"),
            entry("", "b.txt", "b"),
            entry("sub", "bp.yaml", "nested"),
            entry("sub/deep", "c.txt", "c"),
        ]
    );
}

#[test]
fn test_local_ignore_patterns() {
    let temp_dir = TempDir::new().unwrap();
    write_tree(
        temp_dir.path(),
        &[
            ("bp.yaml", ""),
            (".bpignore", "# compiled files\n*.pyc\n\nnotes/**\n"),
            ("keep.py", "keep"),
            ("drop.pyc", "drop"),
            ("notes/todo.md", "drop"),
            (".git/HEAD", "ref: refs/heads/main"),
            ("sub/.DS_Store", "drop"),
        ],
    );

    let entries = collect(&FileSystemProvider::new(temp_dir.path()));

    assert_eq!(entries, vec![entry("", "keep.py", "keep")]);
}

#[test]
fn test_local_invalid_ignore_pattern() {
    let temp_dir = TempDir::new().unwrap();
    write_tree(temp_dir.path(), &[("bp.yaml", ""), (".bpignore", "a[\n"), ("a.txt", "a")]);

    let provider = FileSystemProvider::new(temp_dir.path());
    let result = provider.process_files(&mut |_: &Path, _: &str, _: &str| Ok(()));
    assert!(matches!(result, Err(Error::IgnoreError(_))));
}

#[test]
fn test_local_handler_error_stops_enumeration() {
    let temp_dir = TempDir::new().unwrap();
    write_tree(temp_dir.path(), &[("a.txt", "a"), ("b.txt", "b"), ("c.txt", "c")]);

    let mut seen = Vec::new();
    let result = FileSystemProvider::new(temp_dir.path()).process_files(
        &mut |_dir: &Path, name: &str, _content: &str| {
            seen.push(name.to_string());
            if name == "b.txt" {
                return Err(Error::ProviderError("stop".to_string()));
            }
            Ok(())
        },
    );

    assert!(matches!(result, Err(Error::ProviderError(msg)) if msg == "stop"));
    assert_eq!(seen, vec!["a.txt", "b.txt"]);
}

#[test]
fn test_local_unreadable_file_names_path() {
    let temp_dir = TempDir::new().unwrap();
    write_tree(temp_dir.path(), &[("bp.yaml", ""), ("a.txt", "a")]);
    fs::write(temp_dir.path().join("logo.png"), [0xff, 0xfe, 0x00]).unwrap();

    let provider = FileSystemProvider::new(temp_dir.path());
    match provider.process_files(&mut |_: &Path, _: &str, _: &str| Ok(())) {
        Err(err @ Error::ReadError { .. }) => assert!(err.to_string().contains("logo.png")),
        other => panic!("Expected ReadError, got {other:?}"),
    }
}

#[test]
fn test_local_skips_output_directory() {
    let temp_dir = TempDir::new().unwrap();
    write_tree(
        temp_dir.path(),
        &[("bp.yaml", ""), ("a.txt", "a"), ("build/a.txt", "old"), ("sub/build/c.txt", "c")],
    );
    let provider = FileSystemProvider::new(temp_dir.path());

    let mut entries = Vec::new();
    provider
        .process_files_except(
            &temp_dir.path().join("build"),
            &mut |dir: &Path, name: &str, content: &str| {
                entries.push((dir.to_path_buf(), name.to_string(), content.to_string()));
                Ok(())
            },
        )
        .unwrap();

    assert_eq!(entries, vec![entry("", "a.txt", "a"), entry("sub/build", "c.txt", "c")]);
    assert_eq!(collect(&provider).len(), 3);
}

/// Creates a repository at `root` with one commit holding `files`.
fn init_repository(root: &Path, files: &[(&str, &str)]) {
    write_tree(root, files);
    let repo = Repository::init(root).unwrap();
    let mut index = repo.index().unwrap();
    index.add_all(["*"], IndexAddOption::DEFAULT, None).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = Signature::now("blueprint", "blueprint@example.com").unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[]).unwrap();
}

#[test]
fn test_git_provider() {
    let remote = TempDir::new().unwrap();
    init_repository(
        remote.path(),
        &[
            ("bp.yaml", "name: demo\n"),
            (".bpignore", "*.log\n"),
            ("README.md", "{{ Get(\"name\") }}"),
            ("debug.log", "ignored"),
            ("sub/a/template.txt", "template"),
        ],
    );

    let provider = GitProvider::new(remote.path().to_str().unwrap(), None).unwrap();
    let store = provider.store_path().to_path_buf();
    assert!(store.exists());

    assert_eq!(provider.read_config().unwrap(), "name: demo\n");
    assert_eq!(
        collect(&provider),
        vec![
            entry("", "README.md", "{{ Get(\"name\") }}"),
            entry("sub/a", "template.txt", "template"),
        ]
    );

    let output = TempDir::new().unwrap();
    process(&provider, output.path()).unwrap();
    assert_eq!(fs::read_to_string(output.path().join("build/README.md")).unwrap(), "demo");
    assert_eq!(
        fs::read_to_string(output.path().join("build/sub/a/template.txt")).unwrap(),
        "template"
    );

    drop(provider);
    assert!(!store.exists());
}

#[test]
fn test_git_provider_missing_config() {
    let remote = TempDir::new().unwrap();
    init_repository(remote.path(), &[("template.txt", "template")]);

    let provider = GitProvider::new(remote.path().to_str().unwrap(), None).unwrap();
    let output = TempDir::new().unwrap();

    assert!(matches!(provider.read_config(), Err(Error::ConfigNotFound { .. })));
    assert!(process(&provider, output.path()).is_err());
    assert!(!output.path().join("build").exists());
}

#[test]
fn test_git_provider_clone_failure() {
    let missing = TempDir::new().unwrap();
    let url = missing.path().join("does-not-exist");

    let result = GitProvider::new(url.to_str().unwrap(), None);
    assert!(matches!(result, Err(Error::Git2Error(_))));
}
