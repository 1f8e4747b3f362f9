// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Plain-text output for the headless commands.

use anyhow::{Context, Result};
use loandesk_app::{Application, LoanRequest, Locale, RosterStats, format_amount, timer_label};
use loandesk_store::SubmittedLoan;
use std::fs;
use std::path::Path;
use time::format_description::well_known::Rfc3339;

pub fn render_list(applications: &[&Application], locale: Locale) -> String {
    let mut out = format!(
        "{:<8} {:<20} {:<19} {:<12} {:>10} {:<12} {:<8} {}\n",
        "id", "client", "phone", "type", "amount", "status", "priority", "timer"
    );
    for app in applications {
        let line = format!(
            "{:<8} {:<20} {:<19} {:<12} {:>10} {:<12} {:<8} {}",
            app.id.as_str(),
            app.client_name,
            app.phone,
            app.loan_type.label(locale),
            format_amount(app.amount),
            app.status.label(locale),
            app.priority.label(locale),
            timer_label(app, locale),
        );
        // Finished applications have a blank timer column.
        out.push_str(line.trim_end());
        out.push('\n');
    }
    if applications.is_empty() {
        out.push_str("(no matching applications)\n");
    }
    out
}

pub fn render_stats(stats: &RosterStats) -> String {
    format!(
        "total: {}\nnew: {}\nin progress: {}\napproved: {}\noverdue: {}\n",
        stats.total, stats.new, stats.processing, stats.approved, stats.overdue
    )
}

pub fn render_submitted(entry: &SubmittedLoan) -> String {
    format!(
        "{} {} requested {} repay {} within {} days\n",
        entry.id,
        entry.request.full_name(),
        format_amount(entry.request.loan_amount),
        format_amount(entry.repayment),
        entry.term_days,
    )
}

pub fn render_submissions(entries: &[SubmittedLoan]) -> Result<String> {
    if entries.is_empty() {
        return Ok("(no submissions)\n".to_owned());
    }
    let mut out = String::new();
    for entry in entries {
        let at = entry
            .submitted_at
            .format(&Rfc3339)
            .context("format submission timestamp")?;
        out.push_str(&format!(
            "{} {at} {:<10} {} due {} owes {}\n",
            entry.id,
            entry.status.as_str(),
            entry.request.full_name(),
            entry.due_date(),
            format_amount(entry.repayment),
        ));
    }
    Ok(out)
}

/// Reads a loan request from a TOML file using the same camelCase keys as the
/// submission log.
pub fn load_request(path: &Path) -> Result<LoanRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read loan request {}", path.display()))?;
    toml::from_str(&raw).with_context(|| {
        format!(
            "parse loan request {}; expected keys firstName, lastName, birthDate, passportSeries, passportNumber, address, loanAmount",
            path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{load_request, render_list, render_stats, render_submissions, render_submitted};
    use anyhow::Result;
    use loandesk_app::{ApplicationStatus, Locale, StatusFilter};
    use loandesk_store::{SubmissionLog, sample_roster};
    use time::macros::datetime;

    const REQUEST_TOML: &str = "firstName = \"Olga\"\nlastName = \"Smirnova\"\nbirthDate = \"1988-02-11\"\npassportSeries = \"4012\"\npassportNumber = \"654321\"\naddress = \"Kazan, Bauman St 5\"\nloanAmount = 20000\n";

    #[test]
    fn list_renders_header_and_filtered_rows() {
        let roster = sample_roster();
        let rows = roster.filter("", StatusFilter::Only(ApplicationStatus::New));
        let text = render_list(&rows, Locale::En);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id "));
        assert!(lines[1].starts_with("APP002"));
        assert!(lines[1].contains("500,000 ₽"));
        assert!(lines[1].ends_with("8h 0m 0s"));
    }

    #[test]
    fn list_leaves_timer_blank_for_approved_application() {
        let roster = sample_roster();
        let rows = roster.filter("kozlov", StatusFilter::All);
        let text = render_list(&rows, Locale::En);
        let row = text.lines().nth(1).unwrap_or_default();
        assert!(row.starts_with("APP003"));
        assert!(!row.contains("overdue"));
    }

    #[test]
    fn list_reports_empty_result() {
        let roster = sample_roster();
        let rows = roster.filter("nobody", StatusFilter::All);
        assert!(render_list(&rows, Locale::En).contains("(no matching applications)"));
    }

    #[test]
    fn stats_render_reference_counts() {
        let text = render_stats(&sample_roster().stats());
        assert_eq!(
            text,
            "total: 3\nnew: 1\nin progress: 1\napproved: 1\noverdue: 0\n"
        );
    }

    #[test]
    fn request_file_loads_and_submits() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let request_path = temp.path().join("request.toml");
        std::fs::write(&request_path, REQUEST_TOML)?;

        let request = load_request(&request_path)?;
        assert_eq!(request.full_name(), "Smirnova Olga");
        assert!(request.workplace.is_empty());

        let log = SubmissionLog::open(temp.path().join("submissions.json"));
        let entry = log.append(&request, datetime!(2026-03-01 08:00 UTC))?;
        let line = render_submitted(&entry);
        assert!(line.starts_with("ZFI-"));
        assert!(line.contains("requested 20,000 ₽ repay 26,000 ₽ within 30 days"));

        let listed = render_submissions(&log.list()?)?;
        assert!(listed.contains("2026-03-01T08:00:00Z approved"));
        assert!(listed.ends_with("Smirnova Olga due 2026-03-31 owes 26,000 ₽\n"));
        Ok(())
    }

    #[test]
    fn request_file_missing_keys_names_expected_fields() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let request_path = temp.path().join("request.toml");
        std::fs::write(&request_path, "firstName = \"Olga\"\n")?;

        let error = load_request(&request_path).expect_err("incomplete request should fail");
        assert!(error.to_string().contains("expected keys firstName"));
        Ok(())
    }

    #[test]
    fn empty_submission_log_renders_placeholder() -> Result<()> {
        assert_eq!(render_submissions(&[])?, "(no submissions)\n");
        Ok(())
    }
}
