//
//  commit-info
//  context/source.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Git Text Sources
//!
//! This module abstracts "ask git something and get text back" behind the
//! [`TextSource`] trait. The resolver only knows about the three logical
//! queries in [`GitQuery`]; how the text is obtained is up to the
//! implementation.
//!
//! ## Implementations
//!
//! - [`GitCommandSource`]: Spawns the `git` executable in the project
//!   directory, with a timeout
//! - [`StaticSource`]: Returns canned answers, for tests and dry runs
//!
//! ## Query Mapping
//!
//! | Query | Command |
//! |-------|---------|
//! | [`GitQuery::CommitHash`] | `git rev-parse HEAD` |
//! | [`GitQuery::Status`] | `git status` |
//! | [`GitQuery::OriginUrl`] | `git config --get remote.origin.url` |
//!
//! ## Notes
//!
//! - An empty answer is not an error; only transport failures are
//! - `git` runs with `LC_ALL=C` so status text is not localized

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Default time allowed for a single `git` invocation.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(10);

/// The logical questions the resolver can ask a [`TextSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitQuery {
    /// Full identifier of the current revision.
    CommitHash,
    /// Human readable working tree status.
    Status,
    /// URL of the `origin` remote.
    OriginUrl,
}

impl GitQuery {
    /// Arguments passed to `git` for this query.
    pub fn git_args(&self) -> &'static [&'static str] {
        match self {
            Self::CommitHash => &["rev-parse", "HEAD"],
            Self::Status => &["status"],
            Self::OriginUrl => &["config", "--get", "remote.origin.url"],
        }
    }
}

impl fmt::Display for GitQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.git_args().join(" "))
    }
}

/// Transport-level failure of a [`TextSource`] query.
///
/// Distinct from an empty answer: these mean the question could not be asked
/// at all, and the resolver falls back to reading metadata files.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The executable could not be started (usually: not installed).
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully.
    #[error("'{query}' exited with {}: {stderr}", describe_exit(.code))]
    Failed {
        query: GitQuery,
        code: Option<i32>,
        stderr: String,
    },

    /// The command did not finish in time and was killed.
    #[error("'{query}' timed out after {timeout:?}")]
    Timeout { query: GitQuery, timeout: Duration },

    /// The source has no answer configured for the query.
    #[error("no text configured for '{0}'")]
    NotConfigured(GitQuery),

    /// Any other I/O failure while talking to the process.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Something that can answer [`GitQuery`] questions with raw text.
pub trait TextSource {
    /// Returns the trimmed text produced for `query`.
    fn text(&self, query: GitQuery) -> Result<String, SourceError>;
}

impl<T: TextSource + ?Sized> TextSource for &T {
    fn text(&self, query: GitQuery) -> Result<String, SourceError> {
        (**self).text(query)
    }
}

impl<T: TextSource + ?Sized> TextSource for Box<T> {
    fn text(&self, query: GitQuery) -> Result<String, SourceError> {
        (**self).text(query)
    }
}

/// Answers queries by running the `git` executable.
///
/// # Example
///
/// ```rust,no_run
/// use commit_info::context::{GitCommandSource, GitQuery, TextSource};
/// use std::time::Duration;
///
/// let git = GitCommandSource::new(".").with_timeout(Duration::from_secs(2));
/// let hash = git.text(GitQuery::CommitHash)?;
/// println!("HEAD is at {}", hash);
/// # Ok::<(), commit_info::context::SourceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GitCommandSource {
    program: OsString,
    work_dir: PathBuf,
    timeout: Duration,
}

impl GitCommandSource {
    /// Creates a source that runs `git` inside `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: OsString::from("git"),
            work_dir: work_dir.into(),
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }

    /// Overrides the executable, e.g. a full path to `git`.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets how long a single invocation may run before it is killed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the query on a current-thread runtime, bounded by the timeout.
    ///
    /// The child is spawned with `kill_on_drop`, so when the timeout fires
    /// and the output future is dropped, the process is killed with it.
    fn run(&self, query: GitQuery) -> Result<String, SourceError> {
        tracing::debug!("Running {} in {}", query, self.work_dir.display());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run_with_timeout(query))
    }

    async fn run_with_timeout(&self, query: GitQuery) -> Result<String, SourceError> {
        let child = Command::new(&self.program)
            .args(query.git_args())
            .current_dir(&self.work_dir)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SourceError::Spawn {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                return Err(SourceError::Timeout {
                    query,
                    timeout: self.timeout,
                })
            }
        };

        if !output.status.success() {
            return Err(SourceError::Failed {
                query,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl TextSource for GitCommandSource {
    fn text(&self, query: GitQuery) -> Result<String, SourceError> {
        self.run(query)
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "signal".to_string(),
    }
}

/// A deterministic [`TextSource`] with canned answers.
///
/// Queries without a configured answer fail with
/// [`SourceError::NotConfigured`], which the resolver treats like a missing
/// `git` executable. Every query is recorded so callers can check what was
/// asked.
///
/// # Example
///
/// ```rust
/// use commit_info::context::{GitQuery, StaticSource, TextSource};
///
/// let source = StaticSource::new()
///     .with_text(GitQuery::CommitHash, "0123456789abcdef0123456789abcdef01234567")
///     .with_failure(GitQuery::Status, "git: command not found");
///
/// assert!(source.text(GitQuery::CommitHash).is_ok());
/// assert!(source.text(GitQuery::Status).is_err());
/// assert_eq!(source.queries(), vec![GitQuery::CommitHash, GitQuery::Status]);
/// ```
#[derive(Debug, Default)]
pub struct StaticSource {
    answers: HashMap<GitQuery, Result<String, String>>,
    queries: RefCell<Vec<GitQuery>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `query` with `text`.
    pub fn with_text(mut self, query: GitQuery, text: impl Into<String>) -> Self {
        self.answers.insert(query, Ok(text.into()));
        self
    }

    /// Makes `query` fail as if the command exited with an error.
    pub fn with_failure(mut self, query: GitQuery, stderr: impl Into<String>) -> Self {
        self.answers.insert(query, Err(stderr.into()));
        self
    }

    /// Queries asked so far, in order.
    pub fn queries(&self) -> Vec<GitQuery> {
        self.queries.borrow().clone()
    }
}

impl TextSource for StaticSource {
    fn text(&self, query: GitQuery) -> Result<String, SourceError> {
        self.queries.borrow_mut().push(query);
        match self.answers.get(&query) {
            Some(Ok(text)) => Ok(text.trim().to_string()),
            Some(Err(stderr)) => Err(SourceError::Failed {
                query,
                code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Err(SourceError::NotConfigured(query)),
        }
    }
}
