//
//  commit-info
//  cli/owner.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Owner lookup command

use anyhow::Result;
use clap::Args;

use crate::context::patterns::extract_owner;

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct OwnerCommand {
    /// Remote URL, e.g. https://github.com/owner/repo.git
    pub url: String,
}

impl OwnerCommand {
    pub fn run(&self, _global: &GlobalOptions) -> Result<()> {
        let owner = extract_owner(&self.url);
        if owner.is_empty() {
            tracing::debug!("No GitHub owner in {}", self.url);
        }
        println!("{}", owner);
        Ok(())
    }
}
