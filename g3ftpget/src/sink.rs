/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tokio::fs::File;

fn file_name(url_path: &str) -> Option<&str> {
    url_path
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
}

fn sink_path_in(home: &Path, url_path: &str) -> anyhow::Result<PathBuf> {
    let name = file_name(url_path).ok_or_else(|| anyhow!("no file name in path {url_path}"))?;
    Ok(home.join("Downloads").join(name))
}

/// `$HOME/Downloads/<file name of url_path>`
pub(crate) fn default_sink_path(url_path: &str) -> anyhow::Result<PathBuf> {
    let home = std::env::var_os("HOME").ok_or_else(|| anyhow!("no HOME environment variable"))?;
    sink_path_in(Path::new(&home), url_path)
}

/// Open the local file, an existing one will be truncated.
pub(crate) async fn create_sink(path: &Path) -> anyhow::Result<File> {
    File::create(path)
        .await
        .context(format!("failed to open output file {}", path.display()))
}
