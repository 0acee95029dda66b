//
//  commit-info
//  context/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository Context Module
//!
//! This module resolves git metadata for a project directory: the commit
//! hash, branch, working tree state, origin URL and repository owner.
//!
//! ## Overview
//!
//! Resolution runs down two paths:
//! - **Text source**: ask `git` (or any [`TextSource`]) for the commit hash,
//!   status text and origin URL, then parse the text
//! - **Metadata files**: read `.git/HEAD`, the ref it points at and
//!   `.git/config` directly, for machines without a usable `git`
//!
//! ## Architecture
//!
//! - [`TextSource`]: Obtains raw text for a [`GitQuery`]
//! - [`patterns`]: Regexes and extractors for status, config and URL text
//! - [`files`]: Direct parsing of the metadata directory
//! - [`Resolver`]: Orchestrates both paths and merges the results
//! - [`RepositoryInfo`]: The resolved record
//!
//! ## Example
//!
//! ```rust,no_run
//! use commit_info::context::{GitCommandSource, ResolveOptions, Resolver};
//! use std::path::Path;
//!
//! let project = Path::new(".");
//! let resolver = Resolver::new(GitCommandSource::new(project), ResolveOptions::default());
//! let resolution = resolver.resolve(project);
//! resolution.emit();
//! println!("{} on {}", resolution.info.commit_hash, resolution.info.branch);
//! ```

pub mod files;
pub mod patterns;
mod resolver;
mod source;

pub use resolver::*;
pub use source::*;

use std::fmt;

use serde::Serialize;

/// Commit hash reported when no repository could be detected.
pub const LOCAL_COMMIT: &str = "local";

/// Whether the working tree has uncommitted changes.
///
/// `Unknown` is used when the state could not be determined, for example when
/// the status query was skipped or `git` is not installed. It renders as an
/// empty string so build scripts can test for emptiness.
///
/// # Example
///
/// ```rust
/// use commit_info::context::ModificationState;
///
/// assert_eq!(ModificationState::Modified.as_str(), "Modified");
/// assert_eq!(ModificationState::Unknown.to_string(), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModificationState {
    Unmodified,
    Modified,
    #[default]
    Unknown,
}

impl ModificationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unmodified => "Unmodified",
            Self::Modified => "Modified",
            Self::Unknown => "",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }
}

impl fmt::Display for ModificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ModificationState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Git metadata resolved for a project.
///
/// Unresolved fields are empty strings (or [`ModificationState::Unknown`]);
/// there is no distinction between "missing" and "empty". The commit hash is
/// the exception: it holds [`LOCAL_COMMIT`] when nothing was found.
///
/// # Fields
///
/// * `commit_hash` - Current revision, truncated to the configured length
/// * `branch` - Branch name, or the detached HEAD descriptor
/// * `is_pull_request` - True when the detached branch looks like `pull/...`
/// * `modification_state` - Whether the working tree has changes
/// * `origin_url` - URL of the `origin` remote
/// * `owner` - GitHub user or organization derived from `origin_url`
///
/// # Example
///
/// ```rust
/// use commit_info::context::RepositoryInfo;
///
/// let info = RepositoryInfo::default();
/// assert_eq!(info.commit_hash, "local");
/// assert!(!info.has_commit());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    pub commit_hash: String,
    pub branch: String,
    pub is_pull_request: bool,
    #[serde(rename = "modified")]
    pub modification_state: ModificationState,
    pub origin_url: String,
    pub owner: String,
}

impl Default for RepositoryInfo {
    fn default() -> Self {
        Self {
            commit_hash: LOCAL_COMMIT.to_string(),
            branch: String::new(),
            is_pull_request: false,
            modification_state: ModificationState::Unknown,
            origin_url: String::new(),
            owner: String::new(),
        }
    }
}

impl RepositoryInfo {
    /// Returns true once a real commit hash replaced the `local` sentinel.
    pub fn has_commit(&self) -> bool {
        !is_blank(&self.commit_hash) && self.commit_hash != LOCAL_COMMIT
    }
}

/// True for empty or whitespace-only values.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Shortens a commit hash to at most `max_len` characters.
///
/// # Example
///
/// ```rust
/// use commit_info::context::truncate_hash;
///
/// assert_eq!(truncate_hash("0123456789abcdef", 7), "0123456");
/// assert_eq!(truncate_hash("abc", 7), "abc");
/// ```
pub fn truncate_hash(hash: &str, max_len: usize) -> String {
    hash.chars().take(max_len).collect()
}
