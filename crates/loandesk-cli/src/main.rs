// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod report;

use anyhow::{Context, Result};
use config::Config;
use loandesk_app::{AppState, StatusFilter};
use loandesk_store::{SubmissionLog, sample_roster};
use loandesk_tui::ViewSettings;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use time::OffsetDateTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILTER_ENV: &str = "LOANDESK_LOG";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `loandesk --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let submissions_path = config.submissions_path()?;
    if options.print_submissions_path {
        println!("{}", submissions_path.display());
        return Ok(());
    }

    init_tracing(&config);

    let log = SubmissionLog::open(&submissions_path);
    let existing = log.list().with_context(|| {
        format!(
            "open submission log {} -- if this path is wrong, set [storage].submissions_path or {}",
            submissions_path.display(),
            loandesk_store::SUBMISSIONS_PATH_ENV
        )
    })?;
    let tick_interval = config.tick_interval()?;
    let status_filter = match options.status {
        Some(filter) => filter,
        None => config.status_filter()?,
    };
    if options.check_only {
        tracing::info!(submissions = existing.len(), "startup check passed");
        return Ok(());
    }

    if let Some(request_path) = &options.submit {
        let request = report::load_request(request_path)?;
        let submitted = log.append(&request, now())?;
        print!("{}", report::render_submitted(&submitted));
        return Ok(());
    }

    if options.show_submissions {
        print!("{}", report::render_submissions(&existing)?);
        return Ok(());
    }

    let mut roster = sample_roster();
    let search = options.search.clone().unwrap_or_default();
    let locale = config.locale();

    if options.list {
        let rows = roster.filter(&search, status_filter);
        print!("{}", report::render_list(&rows, locale));
        return Ok(());
    }

    if options.stats {
        print!("{}", report::render_stats(&roster.stats()));
        return Ok(());
    }

    let mut state = AppState {
        locale,
        search,
        status_filter,
        ..AppState::default()
    };
    loandesk_tui::run_app(&mut state, &mut roster, ViewSettings { tick_interval })
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Logs go to a file; the terminal belongs to the TUI.
fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_new(config.log_filter()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let log_file = config.log_path().ok().and_then(|path| {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && fs::create_dir_all(parent).is_err()
        {
            return None;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()
            .map(|file| (path, file))
    });

    match log_file {
        Some((path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::debug!(path = %path.display(), "logging initialized");
        }
        // No log file means no logs rather than writing over the TUI.
        None => tracing_subscriber::registry().with(env_filter).init(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_submissions_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    list: bool,
    stats: bool,
    show_submissions: bool,
    search: Option<String>,
    status: Option<StatusFilter>,
    submit: Option<PathBuf>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        ..CliOptions::default()
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_submissions_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--list" => {
                options.list = true;
            }
            "--stats" => {
                options.stats = true;
            }
            "--submissions" => {
                options.show_submissions = true;
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--search requires a query"))?;
                options.search = Some(value.as_ref().to_owned());
            }
            "--status" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--status requires a value: all or a status name")
                })?;
                let filter = StatusFilter::parse(value.as_ref())
                    .context("--status accepts all, new, in_progress, approved, rejected, issued")?;
                options.status = Some(filter);
            }
            "--submit" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--submit requires a request file path"))?;
                options.submit = Some(PathBuf::from(value.as_ref()));
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("loandesk");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved submission log path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and submission log, then exit");
    println!("  --list                   Print the roster instead of opening the TUI");
    println!("  --stats                  Print roster counts");
    println!("  --search <text>          Filter by client name, phone or id");
    println!("  --status <all|status>    Filter by status (new, in_progress, approved, ...)");
    println!("  --submit <request.toml>  Validate a loan request and append it to the log");
    println!("  --submissions            Print the submission log");
    println!("  --help                   Show this help");
}
