//
//  commit-info
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # JSON Output Formatting
//!
//! Pretty-printed JSON for scripts that would rather parse than grep.
//!
//! ```rust
//! use commit_info::context::RepositoryInfo;
//! use commit_info::output::write_json_to;
//!
//! let mut buf = Vec::new();
//! write_json_to(&mut buf, &RepositoryInfo::default())?;
//! assert!(String::from_utf8(buf)?.contains("\"commitHash\": \"local\""));
//! # Ok::<(), anyhow::Error>(())
//! ```

use serde::Serialize;
use std::io::Write;

/// Writes `value` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn write_json_to<W: Write, T: Serialize>(writer: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}
