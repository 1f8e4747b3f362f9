// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use loandesk_app::{DEFAULT_TICK_INTERVAL, Locale, StatusFilter};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
pub const CONFIG_PATH_ENV: &str = "LOANDESK_CONFIG_PATH";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub submissions_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub locale: Option<String>,
    pub tick_interval: Option<String>,
    pub status_filter: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            locale: Some(Locale::default().as_str().to_owned()),
            tick_interval: Some("1s".to_owned()),
            status_filter: Some("all".to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub filter: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(loandesk_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` and put values under [storage], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(submissions_path) = &self.storage.submissions_path {
            loandesk_store::validate_submissions_path(submissions_path)
                .with_context(|| format!("storage.submissions_path in {}", path.display()))?;
        }

        if let Some(locale) = &self.ui.locale
            && Locale::parse(locale).is_none()
        {
            bail!(
                "ui.locale in {} must be \"en\" or \"ru\", got {locale:?}",
                path.display()
            );
        }

        if let Some(interval) = &self.ui.tick_interval {
            let parsed = parse_duration(interval)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "ui.tick_interval in {} must be positive, got {}",
                    path.display(),
                    interval
                );
            }
        }

        if let Some(filter) = &self.ui.status_filter {
            StatusFilter::parse(filter)
                .with_context(|| format!("ui.status_filter in {}", path.display()))?;
        }

        if let Some(file) = &self.log.file
            && file.trim().is_empty()
        {
            bail!("log.file in {} must not be empty", path.display());
        }

        Ok(())
    }

    /// Explicit config value first, then `LOANDESK_SUBMISSIONS_PATH`, then the
    /// platform data dir.
    pub fn submissions_path(&self) -> Result<PathBuf> {
        match &self.storage.submissions_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => loandesk_store::default_submissions_path(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.ui
            .locale
            .as_deref()
            .and_then(Locale::parse)
            .unwrap_or_default()
    }

    pub fn tick_interval(&self) -> Result<Duration> {
        match &self.ui.tick_interval {
            Some(raw) => parse_duration(raw),
            None => Ok(DEFAULT_TICK_INTERVAL),
        }
    }

    pub fn status_filter(&self) -> Result<StatusFilter> {
        match &self.ui.status_filter {
            Some(raw) => Ok(StatusFilter::parse(raw)?),
            None => Ok(StatusFilter::All),
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(path) => Ok(PathBuf::from(path)),
            None => loandesk_store::default_log_path(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# loandesk config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is the platform data dir (for example ~/.local/share/loandesk/submissions.json)\n# submissions_path = \"/absolute/path/to/submissions.json\"\n\n[ui]\n# \"en\" or \"ru\"\nlocale = \"en\"\ntick_interval = \"1s\"\n# all, new, in_progress, approved, rejected or issued\nstatus_filter = \"all\"\n\n[log]\n# Overridden by LOANDESK_LOG\nfilter = \"{DEFAULT_LOG_FILTER}\"\n# file = \"/absolute/path/to/loandesk.log\"\n",
            path.display(),
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 1s)")
}

#[cfg(test)]
mod tests {
    use super::{CONFIG_PATH_ENV, Config, parse_duration};
    use anyhow::Result;
    use loandesk_app::{ApplicationStatus, Locale, StatusFilter};
    use loandesk_store::SUBMISSIONS_PATH_ENV;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.locale(), Locale::En);
        assert_eq!(config.tick_interval()?, Duration::from_secs(1));
        assert_eq!(config.status_filter()?, StatusFilter::All);
        assert_eq!(config.log_filter(), "info");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\nlocale = \"ru\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[storage], [ui], and [log]"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[storage]\nsubmissions_path = \"/srv/loandesk/submissions.json\"\n[ui]\nlocale = \"ru\"\ntick_interval = \"250ms\"\nstatus_filter = \"in-progress\"\n[log]\nfilter = \"loandesk_app=debug\"\nfile = \"/var/log/loandesk.log\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(
            config.submissions_path()?,
            PathBuf::from("/srv/loandesk/submissions.json")
        );
        assert_eq!(config.locale(), Locale::Ru);
        assert_eq!(config.tick_interval()?, Duration::from_millis(250));
        assert_eq!(
            config.status_filter()?,
            StatusFilter::Only(ApplicationStatus::InProgress)
        );
        assert_eq!(config.log_filter(), "loandesk_app=debug");
        assert_eq!(config.log_path()?, PathBuf::from("/var/log/loandesk.log"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn unknown_locale_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nlocale = \"de\"\n")?;
        let error = Config::load(&path).expect_err("unknown locale should fail");
        assert!(error.to_string().contains("ui.locale"));
        Ok(())
    }

    #[test]
    fn unknown_status_filter_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstatus_filter = \"pending\"\n")?;
        let error = Config::load(&path).expect_err("unknown filter should fail");
        let message = format!("{error:#}");
        assert!(message.contains("ui.status_filter"));
        assert!(message.contains("pending"));
        Ok(())
    }

    #[test]
    fn zero_tick_interval_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\ntick_interval = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero interval should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn uri_submissions_path_is_rejected() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[storage]\nsubmissions_path = \"https://example.com/log.json\"\n",
        )?;
        let error = Config::load(&path).expect_err("URI path should fail validation");
        assert!(format!("{error:#}").contains("looks like a URI"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn submissions_path_prefers_config_over_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config(
            "version = 1\n[storage]\nsubmissions_path = \"/explicit/from-config.json\"\n",
        )?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(SUBMISSIONS_PATH_ENV, "/from/env.json");
        }
        let config = Config::load(&path)?;
        let resolved = config.submissions_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(SUBMISSIONS_PATH_ENV);
        }
        assert_eq!(resolved, PathBuf::from("/explicit/from-config.json"));
        Ok(())
    }

    #[test]
    fn submissions_path_uses_env_override_when_unset() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(SUBMISSIONS_PATH_ENV, "/from/env-only.json");
        }
        let config = Config::load(&path)?;
        let resolved = config.submissions_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(SUBMISSIONS_PATH_ENV);
        }
        assert_eq!(resolved, PathBuf::from("/from/env-only.json"));
        Ok(())
    }

    #[test]
    fn parse_duration_accepts_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        let error = parse_duration("soon").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid duration"));
    }

    #[test]
    fn example_config_loads_cleanly() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("[storage]"));
        assert!(example.contains("[log]"));

        std::fs::write(&path, &example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.locale(), Locale::En);
        Ok(())
    }
}
