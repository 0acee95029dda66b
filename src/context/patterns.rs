//
//  commit-info
//  context/patterns.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Text Pattern Extractors
//!
//! Regular expressions and small extractors that turn semi-structured git
//! text into fields of [`RepositoryInfo`](super::RepositoryInfo).
//!
//! ## Supported Inputs
//!
//! ### `git status` output
//! - `On branch feature/x`
//! - `HEAD detached at pull/42/head`
//! - `nothing to commit, working tree clean`
//! - `nothing added to commit but untracked files present`
//!
//! ### `.git/config`
//! ```text
//! [remote "origin"]
//!     url = https://github.com/owner/repo.git
//!     fetch = +refs/heads/*:refs/remotes/origin/*
//! ```
//!
//! ## Example
//!
//! ```rust
//! use commit_info::context::patterns::{extract_owner, parse_status};
//! use commit_info::context::ModificationState;
//!
//! let status = parse_status("On branch main\nnothing to commit, working tree clean\n");
//! assert_eq!(status.branch, "main");
//! assert_eq!(status.modification_state, ModificationState::Unmodified);
//!
//! assert_eq!(extract_owner("https://github.com/rust-lang/rust.git"), "rust-lang");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::ModificationState;

/// Regular expression for the `origin` remote URL in a git config file.
///
/// Matches a `[remote "origin"]` header followed, within the same section,
/// by a `url = <value>` line. Case-insensitive and tolerant of whitespace.
///
/// # Capture Groups
/// 1. The URL, without trailing whitespace
static ORIGIN_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?im)\[\s*remote\s*"origin"\s*\][^\[]*?^[ \t]*url[ \t]*=[ \t]*(.*?)\s*$"#)
        .unwrap()
});

/// Regular expression for the branch line of `git status`.
///
/// # Capture Groups
/// 1. Branch name (e.g., "feature/x")
static STATUS_BRANCH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^On branch (.*)$").unwrap());

/// Regular expression for the detached HEAD line of `git status`.
///
/// # Capture Groups
/// 1. Whatever HEAD is detached at (e.g., "pull/42/head" or a short hash)
static DETACHED_BRANCH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^HEAD detached at (.*)$").unwrap());

/// Status text marker for a clean working tree.
const UNMODIFIED_TEXT: &str = "NOTHING TO COMMIT";

/// Status text marker for a tree with only untracked files.
const UNTRACKED_ONLY_TEXT: &str = "NOTHING ADDED TO COMMIT";

/// Host marker that identifies GitHub URLs.
pub const GITHUB_HOST_MARKER: &str = "GITHUB.COM";

/// Branch prefix GitHub uses for pull request refs.
pub const PULL_REQUEST_PREFIX: &str = "pull/";

/// Fields parsed out of `git status` text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    /// Branch name, empty if neither pattern matched.
    pub branch: String,
    pub is_pull_request: bool,
    pub modification_state: ModificationState,
}

/// Parses `git status` output.
///
/// The branch comes from the `On branch` line, or failing that from the
/// `HEAD detached at` line; only the latter can mark a pull request. The tree
/// counts as unmodified when either "nothing to commit" marker appears,
/// compared case-insensitively.
pub fn parse_status(text: &str) -> StatusInfo {
    let mut status = StatusInfo::default();

    if let Some(branch) = capture(&STATUS_BRANCH_PATTERN, text) {
        status.branch = branch;
    } else if let Some(branch) = capture(&DETACHED_BRANCH_PATTERN, text) {
        status.is_pull_request = branch.starts_with(PULL_REQUEST_PREFIX);
        status.branch = branch;
    }

    status.modification_state = modification_state(text);
    status
}

/// Interprets status text as modified or unmodified.
pub fn modification_state(text: &str) -> ModificationState {
    let upper = text.to_uppercase();
    if upper.contains(UNMODIFIED_TEXT) || upper.contains(UNTRACKED_ONLY_TEXT) {
        ModificationState::Unmodified
    } else {
        ModificationState::Modified
    }
}

/// Extracts the `origin` remote URL from the contents of a git config file.
///
/// # Example
///
/// ```rust
/// use commit_info::context::patterns::extract_origin_url;
///
/// let config = "[core]\n\tbare = false\n[remote \"origin\"]\n\turl = git@github.com:o/r.git\n";
/// assert_eq!(extract_origin_url(config).as_deref(), Some("git@github.com:o/r.git"));
/// assert_eq!(extract_origin_url("[core]\n"), None);
/// ```
pub fn extract_origin_url(config: &str) -> Option<String> {
    capture(&ORIGIN_URL_PATTERN, config)
}

/// Derives the repository owner from a GitHub URL.
///
/// Splits on `/` and `\`, skips empty segments, and returns the segment right
/// after the first one containing `github.com` (any case). Returns an empty
/// string when there is no such segment. `:` is not a separator, so for
/// scp-style URLs the host segment also swallows the owner.
///
/// # Example
///
/// ```rust
/// use commit_info::context::patterns::extract_owner;
///
/// assert_eq!(extract_owner("https://github.com/Owner/Repo.git"), "Owner");
/// assert_eq!(extract_owner("https://gitlab.com/Owner/Repo.git"), "");
/// assert_eq!(extract_owner("https://github.com"), "");
/// ```
pub fn extract_owner(url: &str) -> String {
    let mut segments = url.split(['/', '\\']).filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if segment.to_uppercase().contains(GITHUB_HOST_MARKER) {
            return segments.next().unwrap_or_default().to_string();
        }
    }
    String::new()
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}
