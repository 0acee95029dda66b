//
//  commit-info
//  output/env.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Environment-Style Output
//!
//! One `KEY=value` line per field, the shape build systems expect for
//! step outputs (`$GITHUB_OUTPUT`, `.env` files, `make` includes).
//!
//! ```text
//! COMMIT_HASH=4b825dc
//! BRANCH=main
//! IS_PULL_REQUEST=false
//! MODIFIED=Unmodified
//! ORIGIN_URL=https://github.com/octocat/hello.git
//! GIT_USER=octocat
//! ```
//!
//! Unresolved fields are printed with an empty value, never omitted.

use std::io::Write;

use super::FieldOutput;

/// Turns a field label like `"Commit Hash"` into `COMMIT_HASH`.
pub fn env_key(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| word.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn write_env_to<W: Write, T: FieldOutput>(writer: &mut W, value: &T) -> anyhow::Result<()> {
    for (label, value) in value.fields() {
        writeln!(writer, "{}={}", env_key(label), value)?;
    }
    Ok(())
}
