//
//  commit-info
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # commit-info Library
//!
//! Resolves git metadata for a project so build scripts can stamp it into
//! their artifacts: commit hash, branch, working tree state, origin URL and
//! repository owner.
//!
//! ## Overview
//!
//! Resolution asks `git` first and falls back to reading the `.git`
//! directory when `git` is missing or fails. It never errors: whatever could
//! not be found is left empty, the commit hash becomes `local`, and the
//! reasons are returned as [`diagnostics`].
//!
//! ## Features
//!
//! - **Works without git**: Parses `HEAD`, refs and `config` directly
//! - **Nested projects**: Looks in the parent directory's `.git` too
//! - **Pull request detection**: Recognizes detached `pull/...` checkouts
//! - **Build friendly output**: Table, JSON or `KEY=value` lines
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`config`]: Configuration file management
//! - [`context`]: Text sources, parsers and the resolver
//! - [`diagnostics`]: Leveled diagnostic events
//! - [`output`]: Output formatting (Table, JSON, Env)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use commit_info::context::{GitCommandSource, ResolveOptions, Resolver};
//! use std::path::Path;
//!
//! let project = Path::new(".");
//! let resolution = Resolver::new(GitCommandSource::new(project), ResolveOptions::default())
//!     .resolve(project);
//! println!("Building {}", resolution.info.commit_hash);
//! ```

/// Command-line interface definitions.
pub mod cli;

/// Configuration file management.
///
/// Settings live in a TOML file in the platform config directory and can be
/// overridden per invocation from the command line.
pub mod config;

/// Repository metadata resolution.
///
/// Contains the [`TextSource`](context::TextSource) abstraction over `git`,
/// the pattern extractors, the `.git` directory parser and the
/// [`Resolver`](context::Resolver) that merges them.
pub mod context;

/// Diagnostic events produced during resolution.
pub mod diagnostics;

/// Output formatting for different modes.
pub mod output;

pub use cli::Cli;
pub use config::Config;
pub use context::{RepositoryInfo, Resolution, Resolver};

/// Application name constant.
pub const APP_NAME: &str = "commit-info";

/// Application version, taken from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Resolution itself always exits with [`SUCCESS`](exit_codes::SUCCESS);
/// [`ERROR`](exit_codes::ERROR) is reserved for bad configuration and usage.
/// Argument parsing errors exit through clap with its own status.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error, e.g. an unreadable configuration file.
    pub const ERROR: i32 = 1;
}
