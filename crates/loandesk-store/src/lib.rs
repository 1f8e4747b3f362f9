// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod seed;
mod submissions;

pub use seed::{sample_employees, sample_roster};
pub use submissions::{SubmissionLog, SubmittedLoan};

use anyhow::{Context, Result, anyhow, bail};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const APP_NAME: &str = "loandesk";
pub const SUBMISSIONS_PATH_ENV: &str = "LOANDESK_SUBMISSIONS_PATH";

pub fn data_dir() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set {SUBMISSIONS_PATH_ENV} to a writable file path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

pub fn default_submissions_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os(SUBMISSIONS_PATH_ENV) {
        return Ok(PathBuf::from(override_path));
    }
    Ok(data_dir()?.join("submissions.json"))
}

pub fn default_log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(format!("{APP_NAME}.log")))
}

pub fn validate_submissions_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        bail!("submissions path must not be empty");
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "submissions path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("submissions path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    Ok(())
}
