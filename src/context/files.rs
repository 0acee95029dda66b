//
//  commit-info
//  context/files.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Metadata Directory Parser
//!
//! Reads git's on-disk state directly, for machines where the `git`
//! executable is missing or broken.
//!
//! ## Files Read
//!
//! | File | Content |
//! |------|---------|
//! | `HEAD` | `ref: refs/heads/<branch>` or a bare commit hash |
//! | `<ref>` | The commit hash the branch points at |
//! | `config` | INI-style config with a `[remote "origin"]` section |
//!
//! ## Notes
//!
//! - Missing files are not errors; the directory simply yields nothing
//! - Contents are decoded lossily, so stray non-UTF-8 bytes never fail a read
//! - A `HEAD` or ref that exists but cannot be read is reported as [`ResolveError`]
//! - An unreadable `config` only loses the origin URL
//! - With a bare hash in `HEAD` the branch comes out as `"HEAD"`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::patterns::{extract_origin_url, extract_owner};
use super::{is_blank, RepositoryInfo, ResolveError};

/// Name of git's metadata directory inside a working tree.
pub const GIT_DIR: &str = ".git";

const HEAD_FILE: &str = "HEAD";
const CONFIG_FILE: &str = "config";
const REF_MARKER: &str = "ref:";

/// Metadata directories to try for a project, in priority order.
///
/// The project's own `.git` comes first, then the parent directory's, which
/// covers projects living one level below the repository root.
///
/// # Example
///
/// ```rust
/// use commit_info::context::files::candidate_dirs;
/// use std::path::Path;
///
/// let dirs = candidate_dirs(Path::new("/work/repo/plugin"));
/// assert_eq!(dirs.len(), 2);
/// assert!(dirs[0].ends_with("plugin/.git"));
/// ```
pub fn candidate_dirs(project_dir: &Path) -> Vec<PathBuf> {
    let base = project_dir
        .canonicalize()
        .unwrap_or_else(|_| project_dir.to_path_buf());
    vec![base.join(GIT_DIR), base.join("..").join(GIT_DIR)]
}

/// Parses a single metadata directory.
///
/// Returns `Ok(None)` when no commit hash could be read from the `HEAD`
/// chain. On success the returned info carries the full, untruncated hash,
/// the branch, and the origin URL and owner if `config` has them.
pub fn parse_metadata_dir(dir: &Path) -> Result<Option<RepositoryInfo>, ResolveError> {
    let head_path = dir.join(HEAD_FILE);
    let Some(head) = read_if_exists(&head_path)? else {
        return Ok(None);
    };

    let (hash_path, branch) = match head.strip_prefix(REF_MARKER) {
        Some(reference) => {
            let reference = reference.trim();
            let path = dir.join(reference);
            let branch = last_segment(&path).unwrap_or_else(|| reference.to_string());
            (path, branch)
        }
        None => (head_path.clone(), last_segment(&head_path).unwrap_or_default()),
    };

    let commit_hash = if hash_path == head_path {
        head.trim().to_string()
    } else {
        match read_if_exists(&hash_path)? {
            Some(content) => content.trim().to_string(),
            None => String::new(),
        }
    };

    if is_blank(&commit_hash) {
        tracing::debug!("No commit hash found through {}", head_path.display());
        return Ok(None);
    }

    let mut info = RepositoryInfo {
        commit_hash,
        branch,
        ..Default::default()
    };

    let config_path = dir.join(CONFIG_FILE);
    match read_if_exists(&config_path) {
        Ok(Some(config)) => {
            if let Some(url) = extract_origin_url(&config) {
                info.owner = extract_owner(&url);
                info.origin_url = url;
            }
        }
        Ok(None) => {}
        Err(err) => tracing::debug!("Skipping origin lookup: {}", err),
    }

    Ok(Some(info))
}

/// Parses each directory in order and returns the first one with a commit.
pub fn parse_metadata_dirs(dirs: &[PathBuf]) -> Result<Option<(PathBuf, RepositoryInfo)>, ResolveError> {
    for dir in dirs {
        if let Some(info) = parse_metadata_dir(dir)? {
            return Ok(Some((dir.clone(), info)));
        }
        tracing::debug!("No repository metadata in {}", dir.display());
    }
    Ok(None)
}

/// Reads `path` as lossily decoded text, `None` if it does not exist.
fn read_if_exists(path: &Path) -> Result<Option<String>, ResolveError> {
    if !path.exists() {
        return Ok(None);
    }
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ResolveError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn last_segment(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HASH: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_ref_head() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "HEAD", "ref: refs/heads/main\n");
        write(dir.path(), "refs/heads/main", &format!("{HASH}\n"));

        let info = parse_metadata_dir(dir.path()).unwrap().unwrap();
        assert_eq!(info.commit_hash, HASH);
        assert_eq!(info.branch, "main");
        assert_eq!(info.origin_url, "");
    }

    #[test]
    fn test_nested_branch_keeps_last_segment() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "HEAD", "ref: refs/heads/feature/login");
        write(dir.path(), "refs/heads/feature/login", HASH);

        let info = parse_metadata_dir(dir.path()).unwrap().unwrap();
        assert_eq!(info.branch, "login");
    }

    #[test]
    fn test_detached_head_reports_head_as_branch() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "HEAD", &format!("{HASH}\n"));

        let info = parse_metadata_dir(dir.path()).unwrap().unwrap();
        assert_eq!(info.commit_hash, HASH);
        assert_eq!(info.branch, "HEAD");
    }

    #[test]
    fn test_missing_ref_file_is_not_success() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "HEAD", "ref: refs/heads/unborn\n");
        write(dir.path(), "config", "[remote \"origin\"]\n\turl = https://github.com/o/r\n");

        assert!(parse_metadata_dir(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_missing_dir_is_not_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(parse_metadata_dir(&dir.path().join("nope")).unwrap().is_none());
    }

    #[test]
    fn test_config_origin_and_owner() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "HEAD", "ref: refs/heads/main\n");
        write(dir.path(), "refs/heads/main", HASH);
        write(
            dir.path(),
            "config",
            "[core]\n\tbare = false\n[remote \"origin\"]\n\turl = https://github.com/Owner/Repo.git\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n",
        );

        let info = parse_metadata_dir(dir.path()).unwrap().unwrap();
        assert_eq!(info.origin_url, "https://github.com/Owner/Repo.git");
        assert_eq!(info.owner, "Owner");
    }

    #[test]
    fn test_non_utf8_config_keeps_origin() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "HEAD", "ref: refs/heads/main\n");
        write(dir.path(), "refs/heads/main", HASH);
        let mut config = b"[user]\n\tname = Jos".to_vec();
        config.push(0xe9);
        config.extend_from_slice(b"\n[remote \"origin\"]\n\turl = https://github.com/Owner/Repo.git\n");
        fs::write(dir.path().join("config"), config).unwrap();

        let info = parse_metadata_dir(dir.path()).unwrap().unwrap();
        assert_eq!(info.commit_hash, HASH);
        assert_eq!(info.branch, "main");
        assert_eq!(info.origin_url, "https://github.com/Owner/Repo.git");
        assert_eq!(info.owner, "Owner");
    }

    #[test]
    fn test_unreadable_config_only_drops_origin() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "HEAD", "ref: refs/heads/main\n");
        write(dir.path(), "refs/heads/main", HASH);
        fs::create_dir_all(dir.path().join("config")).unwrap();

        let info = parse_metadata_dir(dir.path()).unwrap().unwrap();
        assert_eq!(info.commit_hash, HASH);
        assert_eq!(info.branch, "main");
        assert_eq!(info.origin_url, "");
    }

    #[test]
    fn test_unreadable_head_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("HEAD")).unwrap();

        let err = parse_metadata_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ResolveError::Read { ref path, .. } if path.ends_with("HEAD")));
    }

    #[test]
    fn test_first_successful_candidate_wins() {
        let root = tempfile::tempdir().unwrap();
        let first = root.path().join("first");
        let second = root.path().join("second");
        let third = root.path().join("third");
        write(&first, "HEAD", "ref: refs/heads/gone\n");
        write(&second, "HEAD", "ref: refs/heads/dev\n");
        write(&second, "refs/heads/dev", HASH);
        write(&third, "HEAD", "ref: refs/heads/main\n");
        write(&third, "refs/heads/main", "ffffffffffffffffffffffffffffffffffffffff");

        let (dir, info) = parse_metadata_dirs(&[first, second.clone(), third])
            .unwrap()
            .unwrap();
        assert_eq!(dir, second);
        assert_eq!(info.branch, "dev");
        assert_eq!(info.commit_hash, HASH);
    }

    #[test]
    fn test_candidates_own_then_parent() {
        let root = tempfile::tempdir().unwrap();
        let project = root.path().join("plugin");
        fs::create_dir_all(&project).unwrap();

        let dirs = candidate_dirs(&project);
        let canonical = project.canonicalize().unwrap();
        assert_eq!(dirs[0], canonical.join(".git"));
        assert_eq!(dirs[1], canonical.join("..").join(".git"));
    }
}
