//
//  commit-info
//  cli/resolve.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository metadata resolution command
//!
//! Always exits successfully once arguments and configuration are valid:
//! a project outside git still builds, it just reports `local`.

use std::num::{NonZeroU64, NonZeroUsize};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::config::Config;
use crate::context::{GitCommandSource, RepositoryInfo, ResolveOptions, Resolution, Resolver};
use crate::diagnostics::{Diagnostic, Location};
use crate::output::{FieldOutput, OutputFormat, OutputWriter};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Project directory (defaults to the current directory)
    #[arg(default_value = ".")]
    pub project_dir: PathBuf,

    /// Number of commit hash characters to print
    #[arg(long, short = 'l', env = "COMMIT_INFO_HASH_LENGTH")]
    pub hash_length: Option<NonZeroUsize>,

    /// Do not run git, read the .git directory only
    #[arg(long, env = "COMMIT_INFO_NO_GIT")]
    pub no_git: bool,

    /// Do not query working tree status or the origin URL
    #[arg(long)]
    pub skip_status: bool,

    /// Fill a missing branch or origin from .git files after git ran
    #[arg(long)]
    pub fill_missing: bool,

    /// git executable to run
    #[arg(long, value_name = "PATH")]
    pub git_program: Option<String>,

    /// Seconds before a git invocation is abandoned
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<NonZeroU64>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// What `resolve` prints: the metadata plus the diagnostics behind it.
#[derive(Debug, Serialize)]
pub struct ResolveReport<'a> {
    #[serde(flatten)]
    pub info: &'a RepositoryInfo,
    pub diagnostics: &'a [Diagnostic],
}

impl<'a> From<&'a Resolution> for ResolveReport<'a> {
    fn from(resolution: &'a Resolution) -> Self {
        Self {
            info: &resolution.info,
            diagnostics: &resolution.diagnostics,
        }
    }
}

impl FieldOutput for ResolveReport<'_> {
    fn fields(&self) -> Vec<(&'static str, String)> {
        self.info.fields()
    }
}

impl ResolveCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load(global.config.as_deref()).context("Failed to load configuration")?;
        let options = self.options(&config)?;

        let program = self.git_program.clone().unwrap_or_else(|| config.git.program.clone());
        let timeout = match self.timeout {
            Some(secs) => Duration::from_secs(secs.get()),
            None => config.git.timeout()?,
        };
        let source = GitCommandSource::new(&self.project_dir)
            .with_program(program)
            .with_timeout(timeout);

        let resolution = Resolver::new(source, options)
            .with_location(Location::new(&self.project_dir))
            .resolve(&self.project_dir);
        resolution.emit();

        OutputWriter::new(self.format).write(&ResolveReport::from(&resolution))
    }

    /// Merges the configuration file with command-line overrides.
    pub fn options(&self, config: &Config) -> Result<ResolveOptions> {
        let mut options = config.resolve_options()?;
        if let Some(len) = self.hash_length {
            options.hash_length = len;
        }
        if self.no_git {
            options.use_git = false;
        }
        if self.skip_status {
            options.skip_status = true;
        }
        if self.fill_missing {
            options.fill_missing_from_files = true;
        }
        Ok(options)
    }
}
