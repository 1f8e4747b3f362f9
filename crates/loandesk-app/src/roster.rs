// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;
use time::macros::format_description;

use crate::{
    Application, ApplicationId, ApplicationStatus, Employee, MutationOutcome, RosterStats,
    StatusFilter,
};

/// Owned collection of loan applications plus the read-only team list.
///
/// All mutation goes through `&mut self`; there is exactly one owner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    applications: Vec<Application>,
    employees: Vec<Employee>,
}

impl Roster {
    pub fn new(applications: Vec<Application>, employees: Vec<Employee>) -> Self {
        Self {
            applications,
            employees,
        }
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn get(&self, id: &ApplicationId) -> Option<&Application> {
        self.applications.iter().find(|app| &app.id == id)
    }

    fn get_mut(&mut self, id: &ApplicationId) -> Option<&mut Application> {
        self.applications.iter_mut().find(|app| &app.id == id)
    }

    /// Advances every countdown by one second, clamping at zero.
    pub fn tick(&mut self) {
        for app in &mut self.applications {
            app.timer = app.timer.saturating_sub(1);
        }
    }

    pub fn set_status(&mut self, id: &ApplicationId, status: ApplicationStatus) -> MutationOutcome {
        let Some(app) = self.get_mut(id) else {
            tracing::debug!(application = %id, "status change for unknown application ignored");
            return MutationOutcome::UnknownApplication;
        };
        let previous = app.status;
        app.status = status;
        tracing::info!(
            application = %id,
            from = previous.as_str(),
            to = status.as_str(),
            "application status changed"
        );
        MutationOutcome::Applied
    }

    /// Appends `"<timestamp>: <text>"` to the application's comments.
    /// Blank text and unknown ids leave the roster untouched.
    pub fn add_comment(
        &mut self,
        id: &ApplicationId,
        text: &str,
        at: OffsetDateTime,
    ) -> MutationOutcome {
        if text.trim().is_empty() {
            return MutationOutcome::EmptyComment;
        }
        let Some(app) = self.get_mut(id) else {
            tracing::debug!(application = %id, "comment for unknown application ignored");
            return MutationOutcome::UnknownApplication;
        };
        app.comments
            .push(format!("{}: {text}", format_comment_timestamp(at)));
        tracing::info!(application = %id, comments = app.comments.len(), "comment added");
        MutationOutcome::Applied
    }

    pub fn filter(&self, search: &str, status_filter: StatusFilter) -> Vec<&Application> {
        filter_applications(&self.applications, search, status_filter)
    }

    pub fn stats(&self) -> RosterStats {
        compute_stats(&self.applications)
    }
}

/// Applications matching the status filter and, when `search` is non-empty,
/// whose client name or id contains it case-insensitively or whose phone
/// contains it verbatim. Source order is kept.
pub fn filter_applications<'a>(
    applications: &'a [Application],
    search: &str,
    status_filter: StatusFilter,
) -> Vec<&'a Application> {
    let needle = search.to_lowercase();
    applications
        .iter()
        .filter(|app| status_filter.matches(app.status))
        .filter(|app| {
            needle.is_empty()
                || app.client_name.to_lowercase().contains(&needle)
                || app.phone.contains(search)
                || app.id.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn compute_stats(applications: &[Application]) -> RosterStats {
    let count = |status: ApplicationStatus| {
        applications
            .iter()
            .filter(|app| app.status == status)
            .count()
    };

    RosterStats {
        total: applications.len(),
        new: count(ApplicationStatus::New),
        processing: count(ApplicationStatus::InProgress),
        approved: count(ApplicationStatus::Approved),
        overdue: applications.iter().filter(|app| app.is_overdue()).count(),
    }
}

pub fn format_comment_timestamp(at: OffsetDateTime) -> String {
    at.format(&format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_else(|_| at.unix_timestamp().to_string())
}
