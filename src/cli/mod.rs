//
//  commit-info
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod config;
mod owner;
mod resolve;

pub use config::ConfigCommand;
pub use owner::OwnerCommand;
pub use resolve::{ResolveCommand, ResolveReport};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "commit-info",
    version,
    about = "Resolve git commit metadata for builds",
    long_about = "commit-info reports the commit hash, branch, working tree state, origin URL and \
                  owner of a project.\n\n\
                  It asks git when it can and reads the .git directory when it cannot. \
                  Missing metadata is never an error.",
    propagate_version = true,
    after_help = "Use 'commit-info <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Configuration file to use instead of the default location
    #[arg(long, short = 'c', global = true, env = "COMMIT_INFO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve metadata for a project directory
    #[command(visible_alias = "r")]
    Resolve(ResolveCommand),

    /// Print the GitHub owner of a remote URL
    Owner(OwnerCommand),

    /// Get and set configuration values
    Config(ConfigCommand),

    Version,
}
