//
//  commit-info
//  context/resolver.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository Info Resolver
//!
//! This module ties the [`TextSource`] and the metadata file parser together
//! into a single resolution that never fails.
//!
//! ## Resolution Priority
//!
//! 1. **Text source**: `git rev-parse HEAD`, then (unless status is skipped)
//!    `git status` and the origin URL
//! 2. **Project metadata**: `<project>/.git`
//! 3. **Parent metadata**: `<project>/../.git`
//!
//! Values from the text source win. Metadata files only fill fields that are
//! still empty, and an empty value never clears one that is already set.
//!
//! ## Failure Handling
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | `git` missing or failing | Warning, fall back to files |
//! | Status query fails | Warning, state stays unknown |
//! | Branch not found in status | High importance message |
//! | `HEAD` or ref unreadable | Error `CI0001`, partial result |
//! | Nothing found | Commit `local`, message `CI0002` |
//!
//! ## Example
//!
//! ```rust
//! use commit_info::context::{GitQuery, ResolveOptions, Resolver, StaticSource};
//! use std::path::Path;
//!
//! let source = StaticSource::new()
//!     .with_text(GitQuery::CommitHash, "4b825dc642cb6eb9a060e54bf8d69288fbee4904")
//!     .with_text(GitQuery::Status, "On branch main\nnothing to commit, working tree clean")
//!     .with_text(GitQuery::OriginUrl, "https://github.com/octocat/hello.git");
//!
//! let resolution = Resolver::new(source, ResolveOptions::default()).resolve(Path::new("."));
//! assert_eq!(resolution.info.commit_hash, "4b825dc");
//! assert_eq!(resolution.info.branch, "main");
//! assert_eq!(resolution.info.owner, "octocat");
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::files::{candidate_dirs, parse_metadata_dirs};
use super::patterns::{extract_owner, parse_status};
use super::{is_blank, truncate_hash, GitQuery, ModificationState, RepositoryInfo, TextSource};
use crate::diagnostics::{codes, Diagnostic, Importance, Level, Location, TASK_NAME};

/// Default number of commit hash characters kept.
pub const DEFAULT_HASH_LENGTH: NonZeroUsize = match NonZeroUsize::new(7) {
    Some(len) => len,
    None => unreachable!(),
};

/// Unexpected failure while reading repository metadata.
///
/// Never escapes [`Resolver::resolve`]; it is turned into an error
/// diagnostic there.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A metadata file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Knobs controlling a resolution.
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `hash_length` | `7` |
/// | `use_git` | `true` |
/// | `skip_status` | `false` |
/// | `fill_missing_from_files` | `false` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum number of commit hash characters reported.
    pub hash_length: NonZeroUsize,
    /// Ask the text source at all. When false only metadata files are read.
    pub use_git: bool,
    /// Skip the status and origin queries after a successful commit query.
    pub skip_status: bool,
    /// After a successful text source pass, fill an empty branch or origin
    /// URL from the metadata files.
    pub fill_missing_from_files: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
            use_git: true,
            skip_status: false,
            fill_missing_from_files: false,
        }
    }
}

/// Outcome of a resolution: the data plus everything worth reporting.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub info: RepositoryInfo,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// True when a commit hash was found.
    pub fn is_repository(&self) -> bool {
        self.info.has_commit()
    }

    /// Diagnostics of the given level.
    pub fn diagnostics_at(&self, level: Level) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.level == level)
    }

    /// Returns the diagnostic carrying `code`, if any.
    pub fn diagnostic_with_code(&self, code: &str) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.code == Some(code))
    }

    /// Forwards all diagnostics to the `tracing` subscriber.
    pub fn emit(&self) {
        for diagnostic in &self.diagnostics {
            diagnostic.emit();
        }
    }
}

/// Resolves [`RepositoryInfo`] for project directories.
///
/// Generic over the [`TextSource`] so tests can swap `git` for canned text.
pub struct Resolver<S> {
    source: S,
    options: ResolveOptions,
    location: Option<Location>,
}

impl<S: TextSource> Resolver<S> {
    pub fn new(source: S, options: ResolveOptions) -> Self {
        Self {
            source,
            options,
            location: None,
        }
    }

    /// Location attached to the coded `CI0001` and `CI0002` diagnostics,
    /// usually the project being built.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolves metadata for `project_dir`.
    ///
    /// Never fails. Problems are reported through
    /// [`Resolution::diagnostics`] and the `local` commit sentinel.
    pub fn resolve(&self, project_dir: &Path) -> Resolution {
        let mut state = ResolutionState::new(self.options.hash_length);

        if let Err(err) = self.resolve_into(project_dir, &mut state) {
            state.push(self.located(
                Diagnostic::error(format!("Error in {TASK_NAME}: {err}")).with_code(codes::GIT_FAILED),
            ));
        }

        if !state.info.has_commit() {
            state.push(self.located(
                Diagnostic::message(
                    Importance::High,
                    "Project does not appear to be in a git repository.",
                )
                .with_code(codes::GIT_NO_REPOSITORY),
            ));
        }

        state.finish()
    }

    fn located(&self, diagnostic: Diagnostic) -> Diagnostic {
        match &self.location {
            Some(location) => diagnostic.with_location(location.clone()),
            None => diagnostic,
        }
    }

    fn resolve_into(&self, project_dir: &Path, state: &mut ResolutionState) -> Result<(), ResolveError> {
        let mut from_source = false;

        if self.options.use_git {
            if let Some(hash) = self.commit_from_source(state) {
                state.set_commit(&hash);
                from_source = true;
                if !self.options.skip_status {
                    self.status_from_source(state);
                    self.origin_from_source(state);
                }
            }
        } else {
            tracing::debug!("git disabled, reading metadata files only");
        }

        let fill_gaps = self.options.fill_missing_from_files && state.has_gaps();
        if from_source && !fill_gaps {
            return Ok(());
        }

        let candidates = candidate_dirs(project_dir);
        if let Some((dir, info)) = parse_metadata_dirs(&candidates)? {
            tracing::debug!("Using repository metadata from {}", dir.display());
            state.merge(info);
        }
        Ok(())
    }

    fn commit_from_source(&self, state: &mut ResolutionState) -> Option<String> {
        match self.source.text(GitQuery::CommitHash) {
            Ok(text) if !is_blank(&text) => Some(text),
            Ok(_) => {
                tracing::debug!("'{}' returned no output", GitQuery::CommitHash);
                None
            }
            Err(err) => {
                state.push(Diagnostic::warning(format!(
                    "Error getting commit hash from 'git' command: {err}"
                )));
                None
            }
        }
    }

    fn status_from_source(&self, state: &mut ResolutionState) {
        match self.source.text(GitQuery::Status) {
            Ok(text) => {
                let status = parse_status(&text);
                if is_blank(&status.branch) {
                    state.push(Diagnostic::message(
                        Importance::High,
                        format!("Unable to retrieve branch name from status text: \n{text}"),
                    ));
                }
                state.fill_branch(&status.branch);
                state.fill_modification_state(status.modification_state);
                state.info.is_pull_request = status.is_pull_request;
            }
            Err(err) => {
                state.push(Diagnostic::warning(format!("Error getting 'git status': {err}")));
            }
        }
    }

    fn origin_from_source(&self, state: &mut ResolutionState) {
        match self.source.text(GitQuery::OriginUrl) {
            Ok(url) => state.fill_origin(&url),
            Err(err) => {
                state.push(Diagnostic::warning(format!("Error getting git origin URL: {err}")));
            }
        }
    }
}

/// Field-by-field accumulator. Every setter only fills empty fields.
struct ResolutionState {
    info: RepositoryInfo,
    diagnostics: Vec<Diagnostic>,
    hash_length: NonZeroUsize,
}

impl ResolutionState {
    fn new(hash_length: NonZeroUsize) -> Self {
        Self {
            info: RepositoryInfo::default(),
            diagnostics: Vec::new(),
            hash_length,
        }
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn has_gaps(&self) -> bool {
        is_blank(&self.info.branch) || is_blank(&self.info.origin_url)
    }

    fn set_commit(&mut self, hash: &str) {
        if !self.info.has_commit() && !is_blank(hash) {
            self.info.commit_hash = truncate_hash(hash.trim(), self.hash_length.get());
        }
    }

    fn fill_branch(&mut self, branch: &str) {
        if is_blank(&self.info.branch) && !is_blank(branch) {
            self.info.branch = branch.to_string();
        }
    }

    fn fill_modification_state(&mut self, state: ModificationState) {
        if !self.info.modification_state.is_known() {
            self.info.modification_state = state;
        }
    }

    // The owner always follows the URL it was derived from.
    fn fill_origin(&mut self, url: &str) {
        if is_blank(&self.info.origin_url) && !is_blank(url) {
            self.info.origin_url = url.trim().to_string();
            self.info.owner = extract_owner(&self.info.origin_url);
        }
    }

    fn merge(&mut self, other: RepositoryInfo) {
        self.set_commit(&other.commit_hash);
        self.fill_branch(&other.branch);
        self.fill_modification_state(other.modification_state);
        self.fill_origin(&other.origin_url);
    }

    fn finish(self) -> Resolution {
        Resolution {
            info: self.info,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{StaticSource, LOCAL_COMMIT};
    use std::fs;

    const HASH: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";
    const OTHER_HASH: &str = "ffffffffffffffffffffffffffffffffffffffff";

    fn write(dir: &Path, rel: &str, content: &[u8]) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn git_repo(dir: &Path, branch: &str, hash: &str) {
        write(dir, ".git/HEAD", format!("ref: refs/heads/{branch}\n").as_bytes());
        write(dir, &format!(".git/refs/heads/{branch}"), format!("{hash}\n").as_bytes());
    }

    fn options() -> ResolveOptions {
        ResolveOptions::default()
    }

    fn no_git() -> ResolveOptions {
        ResolveOptions {
            use_git: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_text_source_path() {
        let dir = tempfile::tempdir().unwrap();
        let source = StaticSource::new()
            .with_text(GitQuery::CommitHash, HASH)
            .with_text(GitQuery::Status, "On branch feature/x\nChanges not staged for commit:\n")
            .with_text(GitQuery::OriginUrl, "https://github.com/Owner/Repo.git");

        let resolver = Resolver::new(source, options());
        let resolution = resolver.resolve(dir.path());

        assert_eq!(resolution.info.commit_hash, "4b825dc");
        assert_eq!(resolution.info.branch, "feature/x");
        assert!(!resolution.info.is_pull_request);
        assert_eq!(resolution.info.modification_state, ModificationState::Modified);
        assert_eq!(resolution.info.origin_url, "https://github.com/Owner/Repo.git");
        assert_eq!(resolution.info.owner, "Owner");
        assert!(resolution.diagnostics.is_empty());
        assert_eq!(
            resolver.source().queries(),
            vec![GitQuery::CommitHash, GitQuery::Status, GitQuery::OriginUrl]
        );
    }

    #[test]
    fn test_hash_length_truncation() {
        let dir = tempfile::tempdir().unwrap();
        for len in 1..=HASH.len() {
            let source = StaticSource::new().with_text(GitQuery::CommitHash, HASH);
            let opts = ResolveOptions {
                hash_length: NonZeroUsize::new(len).unwrap(),
                skip_status: true,
                ..Default::default()
            };
            let resolution = Resolver::new(source, opts).resolve(dir.path());
            assert_eq!(resolution.info.commit_hash, &HASH[..len]);
        }

        let source = StaticSource::new().with_text(GitQuery::CommitHash, "abc");
        let resolution = Resolver::new(source, options()).resolve(dir.path());
        assert_eq!(resolution.info.commit_hash, "abc");
    }

    #[test]
    fn test_detached_pull_request() {
        let dir = tempfile::tempdir().unwrap();
        let source = StaticSource::new()
            .with_text(GitQuery::CommitHash, HASH)
            .with_text(GitQuery::Status, "HEAD detached at pull/42/head\nnothing to commit, working tree clean\n")
            .with_text(GitQuery::OriginUrl, "");

        let resolution = Resolver::new(source, options()).resolve(dir.path());
        assert_eq!(resolution.info.branch, "pull/42/head");
        assert!(resolution.info.is_pull_request);
        assert_eq!(resolution.info.modification_state, ModificationState::Unmodified);
        assert_eq!(resolution.info.origin_url, "");
        assert_eq!(resolution.info.owner, "");
    }

    #[test]
    fn test_skip_status_only_asks_for_commit() {
        let dir = tempfile::tempdir().unwrap();
        let source = StaticSource::new()
            .with_text(GitQuery::CommitHash, HASH)
            .with_text(GitQuery::Status, "On branch main\n");
        let opts = ResolveOptions {
            skip_status: true,
            ..Default::default()
        };

        let resolver = Resolver::new(source, opts);
        let resolution = resolver.resolve(dir.path());
        assert_eq!(resolution.info.branch, "");
        assert_eq!(resolution.info.modification_state, ModificationState::Unknown);
        assert_eq!(resolver.source().queries(), vec![GitQuery::CommitHash]);
    }

    #[test]
    fn test_status_failure_leaves_state_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let source = StaticSource::new()
            .with_text(GitQuery::CommitHash, HASH)
            .with_failure(GitQuery::Status, "fatal: index file corrupt")
            .with_text(GitQuery::OriginUrl, "https://github.com/Owner/Repo.git");

        let resolution = Resolver::new(source, options()).resolve(dir.path());
        assert_eq!(resolution.info.modification_state, ModificationState::Unknown);
        assert_eq!(resolution.info.branch, "");
        assert_eq!(resolution.info.owner, "Owner");

        let warnings: Vec<_> = resolution.diagnostics_at(Level::Warning).collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("git status"));
    }

    #[test]
    fn test_unparseable_branch_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = StaticSource::new()
            .with_text(GitQuery::CommitHash, HASH)
            .with_text(GitQuery::Status, "Auf Branch main\nnichts zu committen\n")
            .with_text(GitQuery::OriginUrl, "");

        let resolution = Resolver::new(source, options()).resolve(dir.path());
        assert_eq!(resolution.info.branch, "");
        assert_eq!(resolution.info.modification_state, ModificationState::Modified);
        let message = resolution.diagnostics_at(Level::Message).next().unwrap();
        assert!(message.is_high_importance());
        assert!(message.message.starts_with("Unable to retrieve branch name"));
    }

    #[test]
    fn test_no_git_reads_metadata_files() {
        let dir = tempfile::tempdir().unwrap();
        git_repo(dir.path(), "main", HASH);

        let resolver = Resolver::new(StaticSource::new(), no_git());
        let resolution = resolver.resolve(dir.path());

        assert_eq!(resolution.info.commit_hash, "4b825dc");
        assert_eq!(resolution.info.branch, "main");
        assert_eq!(resolution.info.modification_state, ModificationState::Unknown);
        assert!(resolver.source().queries().is_empty());
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_git_failure_falls_back_to_files() {
        let dir = tempfile::tempdir().unwrap();
        git_repo(dir.path(), "develop", HASH);
        write(
            dir.path(),
            ".git/config",
            b"[remote \"origin\"]\n\turl = https://github.com/Owner/Repo.git\n",
        );
        let source = StaticSource::new().with_failure(GitQuery::CommitHash, "git: not found");

        let resolver = Resolver::new(source, options());
        let resolution = resolver.resolve(dir.path());

        assert_eq!(resolution.info.commit_hash, "4b825dc");
        assert_eq!(resolution.info.branch, "develop");
        assert_eq!(resolution.info.owner, "Owner");
        assert_eq!(resolution.diagnostics_at(Level::Warning).count(), 1);
        assert_eq!(resolver.source().queries(), vec![GitQuery::CommitHash]);
    }

    #[test]
    fn test_empty_commit_text_falls_back_to_files() {
        let dir = tempfile::tempdir().unwrap();
        git_repo(dir.path(), "main", HASH);
        let source = StaticSource::new().with_text(GitQuery::CommitHash, "   ");

        let resolution = Resolver::new(source, options()).resolve(dir.path());
        assert_eq!(resolution.info.commit_hash, "4b825dc");
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_parent_directory_metadata() {
        let root = tempfile::tempdir().unwrap();
        git_repo(root.path(), "main", HASH);
        let project = root.path().join("plugin");
        fs::create_dir_all(&project).unwrap();

        let resolution = Resolver::new(StaticSource::new(), no_git()).resolve(&project);
        assert_eq!(resolution.info.commit_hash, "4b825dc");
        assert_eq!(resolution.info.branch, "main");
    }

    #[test]
    fn test_own_metadata_beats_parent() {
        let root = tempfile::tempdir().unwrap();
        git_repo(root.path(), "main", OTHER_HASH);
        let project = root.path().join("plugin");
        git_repo(&project, "child", HASH);

        let resolution = Resolver::new(StaticSource::new(), no_git()).resolve(&project);
        assert_eq!(resolution.info.commit_hash, "4b825dc");
        assert_eq!(resolution.info.branch, "child");
    }

    #[test]
    fn test_nothing_found_reports_local() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("a").join("b");
        fs::create_dir_all(&project).unwrap();

        let resolution = Resolver::new(StaticSource::new(), options()).resolve(&project);
        assert_eq!(resolution.info.commit_hash, LOCAL_COMMIT);
        assert!(!resolution.is_repository());

        let diag = resolution
            .diagnostic_with_code(codes::GIT_NO_REPOSITORY)
            .unwrap();
        assert!(diag.is_high_importance());
        assert_eq!(diag.level, Level::Message);
        assert_eq!(diag.location, None);
    }

    #[test]
    fn test_coded_diagnostics_carry_location() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("a").join("b");
        fs::create_dir_all(&project).unwrap();
        let source = StaticSource::new().with_failure(GitQuery::CommitHash, "git: not found");

        let resolution = Resolver::new(source, options())
            .with_location(Location::new(&project))
            .resolve(&project);

        let diag = resolution
            .diagnostic_with_code(codes::GIT_NO_REPOSITORY)
            .unwrap();
        assert_eq!(diag.location, Some(Location::new(&project)));
        assert!(diag.to_string().starts_with(&format!("{}: GetCommitInfo: CI0002", project.display())));

        let warning = resolution.diagnostics_at(Level::Warning).next().unwrap();
        assert_eq!(warning.location, None);
    }

    #[test]
    fn test_fill_missing_never_overwrites_source_fields() {
        let dir = tempfile::tempdir().unwrap();
        git_repo(dir.path(), "main", OTHER_HASH);
        write(
            dir.path(),
            ".git/config",
            b"[remote \"origin\"]\n\turl = https://github.com/FileOwner/Repo.git\n",
        );
        let source = StaticSource::new()
            .with_text(GitQuery::CommitHash, HASH)
            .with_text(GitQuery::Status, "On branch feature/x\nnothing to commit\n")
            .with_failure(GitQuery::OriginUrl, "error: no such remote");
        let opts = ResolveOptions {
            fill_missing_from_files: true,
            ..Default::default()
        };

        let resolution = Resolver::new(source, opts).resolve(dir.path());
        assert_eq!(resolution.info.commit_hash, "4b825dc");
        assert_eq!(resolution.info.branch, "feature/x");
        assert_eq!(resolution.info.modification_state, ModificationState::Unmodified);
        assert_eq!(resolution.info.origin_url, "https://github.com/FileOwner/Repo.git");
        assert_eq!(resolution.info.owner, "FileOwner");
    }

    #[test]
    fn test_without_fill_missing_files_are_ignored_after_git() {
        let dir = tempfile::tempdir().unwrap();
        git_repo(dir.path(), "main", OTHER_HASH);
        write(
            dir.path(),
            ".git/config",
            b"[remote \"origin\"]\n\turl = https://github.com/FileOwner/Repo.git\n",
        );
        let source = StaticSource::new()
            .with_text(GitQuery::CommitHash, HASH)
            .with_text(GitQuery::Status, "On branch feature/x\n")
            .with_text(GitQuery::OriginUrl, "");

        let resolution = Resolver::new(source, options()).resolve(dir.path());
        assert_eq!(resolution.info.origin_url, "");
        assert_eq!(resolution.info.owner, "");
    }

    #[test]
    fn test_non_utf8_config_keeps_commit() {
        let dir = tempfile::tempdir().unwrap();
        git_repo(dir.path(), "main", HASH);
        write(
            dir.path(),
            ".git/config",
            b"[user]\n\tname = Jos\xe9\n[remote \"origin\"]\n\turl = https://github.com/Owner/Repo.git\n",
        );

        let resolution = Resolver::new(StaticSource::new(), no_git()).resolve(dir.path());
        assert_eq!(resolution.info.commit_hash, "4b825dc");
        assert_eq!(resolution.info.branch, "main");
        assert_eq!(resolution.info.owner, "Owner");
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_unreadable_head_is_error_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git").join("HEAD")).unwrap();

        let resolution = Resolver::new(StaticSource::new(), no_git()).resolve(dir.path());
        assert_eq!(resolution.info.commit_hash, LOCAL_COMMIT);

        let error = resolution.diagnostic_with_code(codes::GIT_FAILED).unwrap();
        assert_eq!(error.level, Level::Error);
        assert!(error.message.starts_with("Error in GetCommitInfo"));
        assert!(resolution.diagnostic_with_code(codes::GIT_NO_REPOSITORY).is_some());
    }

    #[test]
    fn test_unreadable_metadata_keeps_earlier_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git").join("HEAD")).unwrap();
        let source = StaticSource::new()
            .with_text(GitQuery::CommitHash, HASH)
            .with_text(GitQuery::Status, "On branch main\n")
            .with_failure(GitQuery::OriginUrl, "no origin");
        let opts = ResolveOptions {
            fill_missing_from_files: true,
            ..Default::default()
        };

        let resolution = Resolver::new(source, opts).resolve(dir.path());
        assert_eq!(resolution.info.commit_hash, "4b825dc");
        assert_eq!(resolution.info.branch, "main");
        assert!(resolution.diagnostic_with_code(codes::GIT_FAILED).is_some());
        assert!(resolution.diagnostic_with_code(codes::GIT_NO_REPOSITORY).is_none());
    }
}
