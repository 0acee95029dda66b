//
//  commit-info
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Human-readable tables for interactive use, rendered with `comfy_table`.
//!
//! ## Example
//!
//! ```rust
//! use commit_info::output::TableBuilder;
//!
//! let table = TableBuilder::new()
//!     .color(false)
//!     .headers(["Field", "Value"])
//!     .row(["Branch", "main"])
//!     .build();
//! assert!(table.to_string().contains("main"));
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use super::FieldOutput;

/// Creates an empty table with the standard UTF-8 preset.
///
/// Content arrangement is dynamic, so long origin URLs wrap to the terminal
/// width instead of overflowing it.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Fluent wrapper around [`Table`] that applies header coloring.
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    /// Starts a table; color follows the terminal's capabilities.
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    /// Forces header coloring on or off.
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the header row, cyan when color is enabled.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(|s| s.into()).collect();
        if self.color {
            let header_cells: Vec<Cell> = headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect();
            self.table.set_header(header_cells);
        } else {
            self.table.set_header(headers);
        }
        self
    }

    /// Appends a data row.
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(|s| s.into()).collect();
        self.table.add_row(row);
        self
    }

    /// Finishes the builder, returning the table for rendering.
    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a two-column field/value table. Empty values show as `-`.
pub fn fields_table<T: FieldOutput>(value: &T, color: bool) -> Table {
    let mut builder = TableBuilder::new().color(color).headers(["Field", "Value"]);
    for (label, value) in value.fields() {
        let shown = if value.is_empty() {
            "-".to_string()
        } else {
            format_state(&value, color)
        };
        builder = builder.row([label.to_string(), shown]);
    }
    builder.build()
}

/// Colors working tree states; other values pass through.
pub fn format_state(value: &str, color: bool) -> String {
    if !color {
        return value.to_string();
    }

    use console::style;
    match value {
        "Unmodified" => style(value).green().to_string(),
        "Modified" => style(value).yellow().to_string(),
        _ => value.to_string(),
    }
}
