/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::YamlLoader;

use g3_ftp_client::FtpClientConfig;

pub(crate) fn load_from_file(path: &Path) -> anyhow::Result<FtpClientConfig> {
    let content = std::fs::read_to_string(path)
        .context(format!("failed to read config file {}", path.display()))?;
    load_from_str(&content).context(format!("invalid config file {}", path.display()))
}

fn load_from_str(content: &str) -> anyhow::Result<FtpClientConfig> {
    let docs = YamlLoader::load_from_str(content).map_err(|e| anyhow!("invalid yaml: {e}"))?;
    match docs.first() {
        Some(doc) => FtpClientConfig::parse_yaml(doc),
        None => Ok(FtpClientConfig::default()),
    }
}
