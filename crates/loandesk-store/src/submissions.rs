// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use loandesk_app::{ApplicationStatus, LOAN_TERM_DAYS, LoanRequest, SubmissionId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use time::{Date, Duration, OffsetDateTime};
use time::format_description::well_known::Rfc3339;

const ID_PREFIX: &str = "ZFI-";
const ID_MODULUS: u64 = 100_000_000;

/// A loan request as written to the submission log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedLoan {
    pub id: SubmissionId,
    #[serde(flatten)]
    pub request: LoanRequest,
    pub repayment: u64,
    pub term_days: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    pub status: ApplicationStatus,
}

impl SubmittedLoan {
    /// Repayment is due `term_days` after the submission date.
    pub fn due_date(&self) -> Date {
        self.submitted_at
            .date()
            .saturating_add(Duration::days(i64::from(self.term_days)))
    }
}

/// Append-only JSON array of submitted requests on disk. A request is written
/// once it has been processed, so entries are recorded as approved.
#[derive(Debug, Clone)]
pub struct SubmissionLog {
    path: PathBuf,
}

impl SubmissionLog {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Result<Vec<SubmittedLoan>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read submission log {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).with_context(|| {
            format!(
                "parse submission log {}; the file must hold a JSON array",
                self.path.display()
            )
        })
    }

    pub fn append(&self, request: &LoanRequest, now: OffsetDateTime) -> Result<SubmittedLoan> {
        request.validate().context("invalid loan request")?;

        let mut entries = self.list()?;
        let id = unique_id(&entries, request, now)?;
        let submitted = SubmittedLoan {
            id,
            request: request.clone(),
            repayment: request.repayment(),
            term_days: LOAN_TERM_DAYS,
            submitted_at: now,
            status: ApplicationStatus::Approved,
        };
        entries.push(submitted.clone());
        self.write_all(&entries)?;

        tracing::info!(
            id = %submitted.id,
            amount = submitted.request.loan_amount,
            repayment = submitted.repayment,
            path = %self.path.display(),
            "loan request submitted"
        );
        Ok(submitted)
    }

    fn write_all(&self, entries: &[SubmittedLoan]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }

        let encoded =
            serde_json::to_string_pretty(entries).context("encode submission log entries")?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, encoded)
            .with_context(|| format!("write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "replace submission log {} with {}",
                self.path.display(),
                temp_path.display()
            )
        })?;
        Ok(())
    }
}

fn unique_id(
    existing: &[SubmittedLoan],
    request: &LoanRequest,
    now: OffsetDateTime,
) -> Result<SubmissionId> {
    let timestamp = now.format(&Rfc3339).context("format submission timestamp")?;
    let body = serde_json::to_vec(request).context("encode loan request")?;

    let mut salt = existing.len() as u64;
    loop {
        let mut hasher = Sha256::new();
        hasher.update(timestamp.as_bytes());
        hasher.update(&body);
        hasher.update(salt.to_le_bytes());
        let digest = hasher.finalize();

        let mut prefix = [0_u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        let number = u64::from_le_bytes(prefix) % ID_MODULUS;
        let candidate = SubmissionId::new(format!("{ID_PREFIX}{number:08}"));
        if existing.iter().all(|entry| entry.id != candidate) {
            return Ok(candidate);
        }
        salt = salt.wrapping_add(1);
    }
}
