// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "ru" => Some(Self::Ru),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status {value:?}; expected one of: new, in_progress, approved, rejected, issued")]
pub struct InvalidStatus {
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    New,
    InProgress,
    Approved,
    Rejected,
    Issued,
}

impl ApplicationStatus {
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::InProgress,
        Self::Approved,
        Self::Rejected,
        Self::Issued,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Issued => "issued",
        }
    }

    /// Accepts the canonical names in any case, with `-` or a space standing
    /// in for `_`.
    pub fn parse(value: &str) -> Result<Self, InvalidStatus> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "issued" => Ok(Self::Issued),
            _ => Err(InvalidStatus {
                value: value.to_owned(),
            }),
        }
    }

    pub const fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, Self::New) => "new",
            (Locale::En, Self::InProgress) => "in progress",
            (Locale::En, Self::Approved) => "approved",
            (Locale::En, Self::Rejected) => "rejected",
            (Locale::En, Self::Issued) => "issued",
            (Locale::Ru, Self::New) => "Новая",
            (Locale::Ru, Self::InProgress) => "В обработке",
            (Locale::Ru, Self::Approved) => "Одобрена",
            (Locale::Ru, Self::Rejected) => "Отклонена",
            (Locale::Ru, Self::Issued) => "Выдана",
        }
    }

    /// Statuses that stop an application from counting as overdue.
    pub const fn is_terminal_success(self) -> bool {
        matches!(self, Self::Approved | Self::Issued)
    }
}

impl FromStr for ApplicationStatus {
    type Err = InvalidStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    /// Order of the quick filter buttons on the roster screen.
    pub const CYCLE: [Self; 4] = [
        Self::All,
        Self::Only(ApplicationStatus::New),
        Self::Only(ApplicationStatus::InProgress),
        Self::Only(ApplicationStatus::Approved),
    ];

    pub fn parse(value: &str) -> Result<Self, InvalidStatus> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        ApplicationStatus::parse(value).map(Self::Only)
    }

    pub fn matches(self, status: ApplicationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }

    pub fn next(self) -> Self {
        let current = Self::CYCLE
            .iter()
            .position(|filter| *filter == self)
            .unwrap_or(0);
        Self::CYCLE[(current + 1) % Self::CYCLE.len()]
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::All, Locale::En) => "all",
            (Self::All, Locale::Ru) => "Все",
            (Self::Only(status), locale) => status.label(locale),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => f.write_str(status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Loan,
    Refinancing,
    Mortgage,
}

impl LoanType {
    pub const fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, Self::Loan) => "loan",
            (Locale::En, Self::Refinancing) => "refinancing",
            (Locale::En, Self::Mortgage) => "mortgage",
            (Locale::Ru, Self::Loan) => "Займ",
            (Locale::Ru, Self::Refinancing) => "Рефинансирование",
            (Locale::Ru, Self::Mortgage) => "Ипотека",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, Self::Low) => "low",
            (Locale::En, Self::Medium) => "medium",
            (Locale::En, Self::High) => "high",
            (Locale::Ru, Self::Low) => "Низкий",
            (Locale::Ru, Self::Medium) => "Средний",
            (Locale::Ru, Self::High) => "Высокий",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Manager,
    Senior,
    Admin,
}

impl EmployeeRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Senior => "senior",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub client_id: ClientId,
    pub client_name: String,
    pub phone: String,
    pub loan_type: LoanType,
    pub amount: u64,
    pub status: ApplicationStatus,
    pub created_at: OffsetDateTime,
    pub assigned_to: String,
    pub priority: Priority,
    /// Seconds left until the processing deadline. Never increases.
    pub timer: u64,
    pub documents: Vec<String>,
    pub comments: Vec<String>,
}

impl Application {
    pub fn is_overdue(&self) -> bool {
        self.timer == 0 && !self.status.is_terminal_success()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: EmployeeRole,
    pub is_online: bool,
    pub workload: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RosterStats {
    pub total: usize,
    pub new: usize,
    pub processing: usize,
    pub approved: usize,
    pub overdue: usize,
}

/// Result of a roster mutation. Callers log it; it is never surfaced as an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    UnknownApplication,
    EmptyComment,
}

impl MutationOutcome {
    pub const fn applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(" ₽");
    grouped
}

#[cfg(test)]
mod tests {
    use super::{ApplicationStatus, Locale, StatusFilter, format_amount};

    #[test]
    fn status_parse_accepts_canonical_and_spaced_names() {
        assert_eq!(
            ApplicationStatus::parse("in_progress"),
            Ok(ApplicationStatus::InProgress)
        );
        assert_eq!(
            ApplicationStatus::parse(" In Progress "),
            Ok(ApplicationStatus::InProgress)
        );
        assert_eq!(
            ApplicationStatus::parse("ISSUED"),
            Ok(ApplicationStatus::Issued)
        );
    }

    #[test]
    fn status_parse_rejects_unknown_values() {
        let error = ApplicationStatus::parse("pending").expect_err("unknown status");
        assert_eq!(error.value, "pending");
        assert!(error.to_string().contains("in_progress"));
    }

    #[test]
    fn every_status_round_trips_through_its_name() {
        for status in ApplicationStatus::ALL {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn status_filter_parses_all_and_statuses() {
        assert_eq!(StatusFilter::parse("all"), Ok(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("approved"),
            Ok(StatusFilter::Only(ApplicationStatus::Approved))
        );
        assert!(StatusFilter::parse("everything").is_err());
    }

    #[test]
    fn status_filter_cycle_wraps_and_recovers_from_off_cycle_values() {
        assert_eq!(
            StatusFilter::All.next(),
            StatusFilter::Only(ApplicationStatus::New)
        );
        assert_eq!(
            StatusFilter::Only(ApplicationStatus::Approved).next(),
            StatusFilter::All
        );
        assert_eq!(
            StatusFilter::Only(ApplicationStatus::Rejected).next(),
            StatusFilter::Only(ApplicationStatus::New)
        );
    }

    #[test]
    fn labels_follow_locale() {
        assert_eq!(ApplicationStatus::InProgress.label(Locale::En), "in progress");
        assert_eq!(ApplicationStatus::InProgress.label(Locale::Ru), "В обработке");
        assert_eq!(StatusFilter::All.label(Locale::Ru), "Все");
    }

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(0), "0 ₽");
        assert_eq!(format_amount(999), "999 ₽");
        assert_eq!(format_amount(75_000), "75,000 ₽");
        assert_eq!(format_amount(1_500_000), "1,500,000 ₽");
    }
}
