//
//  commit-info
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Get, set and list the values stored in the configuration file, and show
//! where that file lives.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::config::{Config, ConfigError, CONFIG_KEYS};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Print all configuration values
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    pub key: String,

    pub value: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ConfigCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::List(args) => self.list(args, global),
            ConfigSubcommand::Path => self.path(global),
        }
    }

    fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        let config = Config::load(global.config.as_deref())?;
        match config.get(&args.key) {
            Some(value) => println!("{}", value),
            None => {
                return Err(ConfigError::UnknownKey {
                    key: args.key.clone(),
                }
                .into())
            }
        }
        Ok(())
    }

    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let mut config = Config::load(global.config.as_deref())?;
        config.set(&args.key, &args.value)?;
        config.save(global.config.as_deref())?;

        println!(
            "{} Set {} = {}",
            style("✓").green(),
            style(&args.key).cyan(),
            args.value
        );
        Ok(())
    }

    fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let config = Config::load(global.config.as_deref())?;

        if args.json {
            let values: serde_json::Map<String, serde_json::Value> = CONFIG_KEYS
                .iter()
                .filter_map(|key| config.get(key).map(|v| (key.to_string(), v.into())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
        } else {
            for key in CONFIG_KEYS {
                if let Some(value) = config.get(key) {
                    println!("{}={}", key, value);
                }
            }
        }
        Ok(())
    }

    fn path(&self, global: &GlobalOptions) -> Result<()> {
        let path: PathBuf = match &global.config {
            Some(path) => path.clone(),
            None => Config::config_path()?,
        };
        println!("{}", path.display());
        Ok(())
    }
}
