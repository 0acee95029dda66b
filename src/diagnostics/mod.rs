//
//  commit-info
//  diagnostics/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Diagnostics Module
//!
//! Resolution never fails outright. Everything that goes wrong along the way
//! is recorded as a [`Diagnostic`] and handed back to the caller next to the
//! resolved data, so the resolver itself stays free of logging side effects.
//!
//! ## Levels
//!
//! | Level | Typical cause |
//! |-------|---------------|
//! | [`Level::Message`] | Informational, e.g. branch could not be parsed |
//! | [`Level::Warning`] | A `git` query failed and a fallback was used |
//! | [`Level::Error`] | Unexpected failure while reading repository files |
//!
//! ## Emitting
//!
//! The sink is `tracing`. Call [`Diagnostic::emit`] (or
//! [`Resolution::emit`](crate::context::Resolution::emit)) at the boundary
//! to forward the collected events.
//!
//! ```rust
//! use commit_info::diagnostics::{Diagnostic, Importance};
//!
//! let diag = Diagnostic::message(Importance::High, "Unable to retrieve branch name");
//! assert!(diag.is_high_importance());
//! diag.emit();
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Name reported as the origin of every diagnostic.
pub const TASK_NAME: &str = "GetCommitInfo";

/// Stable diagnostic codes.
///
/// Build logs are grepped for these, so the values must never change.
pub mod codes {
    /// Unexpected failure while resolving repository metadata.
    pub const GIT_FAILED: &str = "CI0001";

    /// The project does not appear to be inside a git repository.
    pub const GIT_NO_REPOSITORY: &str = "CI0002";
}

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Message,
    Warning,
    Error,
}

/// Importance of a diagnostic, mirrors the verbosity buckets of build logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Normal,
    High,
}

/// Where a diagnostic points to, in the `file:line:column` form build logs use.
///
/// Line and column are 1-based and optional; a location may name just a file
/// or directory.
///
/// # Example
///
/// ```rust
/// use commit_info::diagnostics::Location;
///
/// let location = Location::new("app/build.toml").at(3, 14);
/// assert_eq!(location.to_string(), "app/build.toml:3:14");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Location {
    pub fn new(file: impl AsRef<Path>) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            line: None,
            column: None,
        }
    }

    /// Narrows the location to a line and column.
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
            if let Some(column) = self.column {
                write!(f, ":{}", column)?;
            }
        }
        Ok(())
    }
}

/// A single leveled diagnostic event produced during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub importance: Importance,
    /// Stable code from [`codes`], if the event has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub message: String,
}

impl Diagnostic {
    /// Creates a message-level diagnostic.
    pub fn message(importance: Importance, message: impl Into<String>) -> Self {
        Self {
            level: Level::Message,
            importance,
            code: None,
            location: None,
            message: message.into(),
        }
    }

    /// Creates a warning. Warnings are always high importance.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            importance: Importance::High,
            code: None,
            location: None,
            message: message.into(),
        }
    }

    /// Creates an error. Errors are always high importance.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            importance: Importance::High,
            code: None,
            location: None,
            message: message.into(),
        }
    }

    /// Attaches a stable code to the diagnostic.
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches the source location the diagnostic refers to.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn is_high_importance(&self) -> bool {
        self.importance == Importance::High
    }

    /// Forwards the diagnostic to the `tracing` subscriber.
    ///
    /// High importance messages are logged at `info`, everything else at
    /// `debug`. Warnings and errors map to their `tracing` counterparts.
    pub fn emit(&self) {
        let code = self.code.unwrap_or("");
        match (self.level, self.importance) {
            (Level::Error, _) => tracing::error!(code = code, "{}", self),
            (Level::Warning, _) => tracing::warn!(code = code, "{}", self),
            (Level::Message, Importance::High) => tracing::info!(code = code, "{}", self),
            (Level::Message, _) => tracing::debug!(code = code, "{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{}: ", location)?;
        }
        match self.code {
            Some(code) => write!(f, "{}: {} {}", TASK_NAME, code, self.message),
            None => write!(f, "{}: {}", TASK_NAME, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_is_high_importance() {
        let diag = Diagnostic::warning("git missing");
        assert_eq!(diag.level, Level::Warning);
        assert!(diag.is_high_importance());
    }

    #[test]
    fn test_display_includes_code() {
        let diag = Diagnostic::message(Importance::High, "Project does not appear to be in a git repository.")
            .with_code(codes::GIT_NO_REPOSITORY);
        assert_eq!(
            diag.to_string(),
            "GetCommitInfo: CI0002 Project does not appear to be in a git repository."
        );
    }

    #[test]
    fn test_display_without_code() {
        let diag = Diagnostic::message(Importance::Low, "hello");
        assert_eq!(diag.to_string(), "GetCommitInfo: hello");
    }

    #[test]
    fn test_serialize_skips_missing_code() {
        let json = serde_json::to_value(Diagnostic::warning("x")).unwrap();
        assert_eq!(json["level"], "warning");
        assert!(json.get("code").is_none());
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_display_prefixes_location() {
        let diag = Diagnostic::error("boom")
            .with_code(codes::GIT_FAILED)
            .with_location(Location::new("work/app"));
        assert_eq!(diag.to_string(), "work/app: GetCommitInfo: CI0001 boom");

        let diag = Diagnostic::warning("late").with_location(Location::new("build.toml").at(7, 2));
        assert_eq!(diag.to_string(), "build.toml:7:2: GetCommitInfo: late");
    }

    #[test]
    fn test_serialize_location() {
        let diag = Diagnostic::warning("x").with_location(Location::new("app").at(1, 5));
        let json = serde_json::to_value(diag).unwrap();
        assert_eq!(json["location"]["file"], "app");
        assert_eq!(json["location"]["line"], 1);
        assert_eq!(json["location"]["column"], 5);
    }
}
