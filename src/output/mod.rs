//
//  commit-info
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Formats resolved metadata for people and for build scripts:
//!
//! - **Table format**: Human-readable table for interactive terminal use
//! - **JSON format**: Machine-readable JSON for scripting
//! - **Env format**: `KEY=value` lines for build step outputs
//!
//! ## Architecture
//!
//! - [`table`]: Table rendering using `comfy_table`
//! - [`json`]: JSON serialization using `serde_json`
//! - [`env`]: `KEY=value` rendering
//!
//! ## Example
//!
//! ```rust,no_run
//! use commit_info::context::RepositoryInfo;
//! use commit_info::output::{OutputFormat, OutputWriter};
//!
//! let writer = OutputWriter::new(OutputFormat::Env);
//! writer.write(&RepositoryInfo::default())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod env;
mod json;
mod table;

pub use env::*;
pub use json::*;
pub use table::*;

use std::io::Write;

use serde::Serialize;

use crate::context::RepositoryInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Env,
}

/// Types that can be shown as labeled fields.
pub trait FieldOutput {
    /// Field labels and display values, in output order.
    fn fields(&self) -> Vec<(&'static str, String)>;
}

impl FieldOutput for RepositoryInfo {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Commit Hash", self.commit_hash.clone()),
            ("Branch", self.branch.clone()),
            ("Is Pull Request", self.is_pull_request.to_string()),
            ("Modified", self.modification_state.to_string()),
            ("Origin URL", self.origin_url.clone()),
            ("Git User", self.owner.clone()),
        ]
    }
}

/// Renders values to stdout in the selected [`OutputFormat`].
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer for `format`.
    ///
    /// Table coloring follows `console`'s terminal detection, so piping the
    /// output or setting `NO_COLOR` yields plain text.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Writes `value` to stdout.
    pub fn write<T: Serialize + FieldOutput>(&self, value: &T) -> anyhow::Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.write_to(&mut handle, value)
    }

    /// Writes `value` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub fn write_to<W: Write, T: Serialize + FieldOutput>(
        &self,
        writer: &mut W,
        value: &T,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json_to(writer, value)?,
            OutputFormat::Env => write_env_to(writer, value)?,
            OutputFormat::Table => writeln!(writer, "{}", fields_table(value, self.color))?,
        }
        Ok(())
    }
}
