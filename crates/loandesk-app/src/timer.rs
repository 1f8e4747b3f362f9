// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Application, Locale};

/// Countdowns under an hour are shown as urgent.
pub const URGENT_THRESHOLD_SECS: u64 = 3600;

struct UnitLabels {
    hours: &'static str,
    minutes: &'static str,
    seconds: &'static str,
    overdue: &'static str,
}

const fn unit_labels(locale: Locale) -> UnitLabels {
    match locale {
        Locale::En => UnitLabels {
            hours: "h",
            minutes: "m",
            seconds: "s",
            overdue: "overdue",
        },
        Locale::Ru => UnitLabels {
            hours: "ч",
            minutes: "м",
            seconds: "с",
            overdue: "Просрочено",
        },
    }
}

/// Renders remaining seconds as `1h 1m 1s`, or `2m 5s` when under an hour.
/// Zero renders as the overdue label.
pub fn format_remaining(seconds: u64, locale: Locale) -> String {
    let labels = unit_labels(locale);
    if seconds == 0 {
        return labels.overdue.to_owned();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!(
            "{hours}{} {minutes}{} {secs}{}",
            labels.hours, labels.minutes, labels.seconds
        )
    } else {
        format!("{minutes}{} {secs}{}", labels.minutes, labels.seconds)
    }
}

pub fn is_urgent(seconds: u64) -> bool {
    seconds > 0 && seconds < URGENT_THRESHOLD_SECS
}

/// The countdown cell for one application. Blank once time has run out on an
/// application that was approved or issued.
pub fn timer_label(app: &Application, locale: Locale) -> String {
    if app.timer == 0 && !app.is_overdue() {
        return String::new();
    }
    format_remaining(app.timer, locale)
}

#[cfg(test)]
mod tests {
    use super::{format_remaining, is_urgent, timer_label};
    use crate::{
        Application, ApplicationId, ApplicationStatus, ClientId, LoanType, Locale, Priority,
    };
    use time::macros::datetime;

    #[test]
    fn zero_is_overdue() {
        assert_eq!(format_remaining(0, Locale::En), "overdue");
        assert_eq!(format_remaining(0, Locale::Ru), "Просрочено");
    }

    #[test]
    fn hours_minutes_seconds() {
        assert_eq!(format_remaining(3661, Locale::En), "1h 1m 1s");
        assert_eq!(format_remaining(28_800, Locale::En), "8h 0m 0s");
        assert_eq!(format_remaining(3661, Locale::Ru), "1ч 1м 1с");
    }

    #[test]
    fn under_an_hour_omits_hours() {
        assert_eq!(format_remaining(125, Locale::En), "2m 5s");
        assert_eq!(format_remaining(59, Locale::En), "0m 59s");
        assert_eq!(format_remaining(3599, Locale::En), "59m 59s");
        assert_eq!(format_remaining(3600, Locale::En), "1h 0m 0s");
    }

    #[test]
    fn large_values_stay_in_hours() {
        assert_eq!(format_remaining(90_061, Locale::En), "25h 1m 1s");
    }

    #[test]
    fn urgency_threshold() {
        assert!(!is_urgent(0));
        assert!(is_urgent(1));
        assert!(is_urgent(3599));
        assert!(!is_urgent(3600));
    }

    #[test]
    fn timer_label_blank_only_for_finished_applications() {
        let mut app = Application {
            id: ApplicationId::new("APP001"),
            client_id: ClientId::new("CLI001"),
            client_name: "Ivan Petrov".to_owned(),
            phone: "+7 (999) 123-45-67".to_owned(),
            loan_type: LoanType::Loan,
            amount: 150_000,
            status: ApplicationStatus::InProgress,
            created_at: datetime!(2024-07-20 10:30 UTC),
            assigned_to: "Anna Ivanova".to_owned(),
            priority: Priority::High,
            timer: 125,
            documents: Vec::new(),
            comments: Vec::new(),
        };
        assert_eq!(timer_label(&app, Locale::En), "2m 5s");

        app.timer = 0;
        assert_eq!(timer_label(&app, Locale::En), "overdue");

        app.status = ApplicationStatus::Issued;
        assert_eq!(timer_label(&app, Locale::En), "");

        app.timer = 60;
        assert_eq!(timer_label(&app, Locale::En), "1m 0s");
    }
}
