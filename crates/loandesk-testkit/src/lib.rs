// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use loandesk_app::{
    Application, ApplicationId, ApplicationStatus, ClientId, Employee, EmployeeId, EmployeeRole,
    LOAN_AMOUNT_STEP, LoanRequest, LoanType, MAX_LOAN_AMOUNT, MIN_LOAN_AMOUNT, Priority, Roster,
};
use std::path::PathBuf;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

const FIRST_NAMES: [&str; 16] = [
    "Ivan", "Maria", "Alexander", "Olga", "Dmitry", "Elena", "Sergey", "Anna", "Pavel", "Irina",
    "Nikolai", "Tatiana", "Andrei", "Svetlana", "Mikhail", "Natalia",
];
const LAST_NAMES: [&str; 14] = [
    "Petrov", "Sidorov", "Kozlov", "Smirnov", "Volkov", "Morozov", "Lebedev", "Novikov", "Orlov",
    "Fedorov", "Sokolov", "Popov", "Vasiliev", "Zaitsev",
];
const MIDDLE_NAMES: [&str; 6] = [
    "Ivanovich",
    "Sergeevich",
    "Petrovich",
    "Andreevich",
    "Nikolaevich",
    "Mikhailovich",
];
const CITIES: [&str; 8] = [
    "Moscow",
    "Kazan",
    "Samara",
    "Perm",
    "Tver",
    "Omsk",
    "Tula",
    "Ufa",
];
const STREETS: [&str; 8] = [
    "Lenina",
    "Tverskaya",
    "Sadovaya",
    "Mira",
    "Gagarina",
    "Pushkina",
    "Sovetskaya",
    "Lesnaya",
];
const WORKPLACES: [&str; 6] = [
    "City Hospital",
    "Metro Depot",
    "School No. 12",
    "Bakery",
    "Logistics Hub",
    "",
];
const DOCUMENTS: [&str; 4] = ["Passport", "Income statement", "INN", "SNILS"];
const COMMENTS: [&str; 6] = [
    "Client confirmed phone number",
    "Waiting for employer reference",
    "Documents received",
    "Called client, no answer",
    "Asked for a larger amount",
    "Follow up tomorrow",
];
const STATUSES: [ApplicationStatus; 5] = ApplicationStatus::ALL;
const LOAN_TYPES: [LoanType; 3] = [LoanType::Loan, LoanType::Refinancing, LoanType::Mortgage];
const PRIORITIES: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
const ROLES: [EmployeeRole; 3] = [
    EmployeeRole::Manager,
    EmployeeRole::Senior,
    EmployeeRole::Admin,
];

/// Longest generated deadline: one working day.
const MAX_TIMER_SECS: u64 = 8 * 60 * 60;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn range_u64(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + self.next_u64() % (max - min + 1)
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of roster data. The same seed always yields the same
/// records.
#[derive(Debug, Clone)]
pub struct LoanFaker {
    rng: DeterministicRng,
}

impl LoanFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn employee(&mut self, index: usize) -> Employee {
        Employee {
            id: EmployeeId::new(format!("emp{}", index + 1)),
            name: self.person_name(),
            role: ROLES[self.rng.int_n(ROLES.len())],
            is_online: self.rng.bool(),
            workload: self.rng.range_u64(0, 9) as u32,
        }
    }

    /// An application numbered `APP{index+1:03}`, assigned to `assignee`.
    pub fn application(&mut self, index: usize, assignee: &str) -> Application {
        let status = STATUSES[self.rng.int_n(STATUSES.len())];
        // Roughly one in five has already run out of time.
        let timer = if self.rng.int_n(5) == 0 {
            0
        } else {
            self.rng.range_u64(1, MAX_TIMER_SECS)
        };
        let document_count = 1 + self.rng.int_n(DOCUMENTS.len());
        let comment_count = self.rng.int_n(3);

        Application {
            id: ApplicationId::new(format!("APP{:03}", index + 1)),
            client_id: ClientId::new(format!("CLI{:03}", index + 1)),
            client_name: self.person_name(),
            phone: self.phone(),
            loan_type: LOAN_TYPES[self.rng.int_n(LOAN_TYPES.len())],
            amount: self.rng.range_u64(5, 500) * 1_000,
            status,
            created_at: self.created_at(),
            assigned_to: assignee.to_owned(),
            priority: PRIORITIES[self.rng.int_n(PRIORITIES.len())],
            timer,
            documents: DOCUMENTS[..document_count]
                .iter()
                .map(|doc| (*doc).to_owned())
                .collect(),
            comments: (0..comment_count)
                .map(|_| self.pick(&COMMENTS).to_owned())
                .collect(),
        }
    }

    pub fn roster(&mut self, applications: usize, employees: usize) -> Roster {
        let team: Vec<Employee> = (0..employees.max(1))
            .map(|index| self.employee(index))
            .collect();
        let apps = (0..applications)
            .map(|index| {
                let assignee = team[self.rng.int_n(team.len())].name.clone();
                self.application(index, &assignee)
            })
            .collect();
        Roster::new(apps, team)
    }

    pub fn loan_request(&mut self) -> LoanRequest {
        let steps = (MAX_LOAN_AMOUNT - MIN_LOAN_AMOUNT) / LOAN_AMOUNT_STEP;
        LoanRequest {
            first_name: self.pick(&FIRST_NAMES).to_owned(),
            last_name: self.pick(&LAST_NAMES).to_owned(),
            middle_name: self.pick(&MIDDLE_NAMES).to_owned(),
            birth_date: format!(
                "{}-{:02}-{:02}",
                self.rng.range_u64(1955, 2005),
                self.rng.range_u64(1, 12),
                self.rng.range_u64(1, 28)
            ),
            passport_series: format!("{:04}", self.rng.range_u64(0, 9_999)),
            passport_number: format!("{:06}", self.rng.range_u64(0, 999_999)),
            address: format!(
                "{}, {} St {}",
                self.pick(&CITIES),
                self.pick(&STREETS),
                self.rng.range_u64(1, 120)
            ),
            workplace: self.pick(&WORKPLACES).to_owned(),
            loan_amount: MIN_LOAN_AMOUNT + self.rng.range_u64(0, steps) * LOAN_AMOUNT_STEP,
        }
    }

    fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    fn phone(&mut self) -> String {
        format!(
            "+7 (9{:02}) {:03}-{:02}-{:02}",
            self.rng.range_u64(0, 99),
            self.rng.range_u64(0, 999),
            self.rng.range_u64(0, 99),
            self.rng.range_u64(0, 99)
        )
    }

    fn created_at(&mut self) -> OffsetDateTime {
        let back = self.rng.range_u64(0, 14 * 24 * 60 * 60) as i64;
        fixture_datetime() - Duration::seconds(back)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn temp_submissions_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("submissions.json");
    Ok((dir, path))
}

pub fn fixture_datetime() -> OffsetDateTime {
    datetime!(2026-02-19 12:34:56 UTC)
}

#[cfg(test)]
mod tests {
    use super::{LoanFaker, MAX_TIMER_SECS};
    use loandesk_app::ApplicationStatus;
    use std::collections::BTreeSet;

    #[test]
    fn new_deterministic_seed() {
        let mut left = LoanFaker::new(42);
        let mut right = LoanFaker::new(42);
        assert_eq!(left.roster(20, 3), right.roster(20, 3));
    }

    #[test]
    fn different_seeds_diverge() {
        let mut left = LoanFaker::new(1);
        let mut right = LoanFaker::new(2);
        assert_ne!(left.roster(20, 3), right.roster(20, 3));
    }

    #[test]
    fn application_ids_are_sequential_and_unique() {
        let mut faker = LoanFaker::new(7);
        let roster = faker.roster(50, 4);
        let ids: BTreeSet<_> = roster
            .applications()
            .iter()
            .map(|app| app.id.to_string())
            .collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(roster.applications()[0].id.as_str(), "APP001");
        assert_eq!(roster.applications()[49].id.as_str(), "APP050");
    }

    #[test]
    fn applications_are_assigned_to_team_members() {
        let mut faker = LoanFaker::new(9);
        let roster = faker.roster(30, 4);
        for app in roster.applications() {
            assert!(
                roster
                    .employees()
                    .iter()
                    .any(|employee| employee.name == app.assigned_to)
            );
            assert!(app.timer <= MAX_TIMER_SECS);
            assert!(!app.documents.is_empty());
        }
    }

    #[test]
    fn large_rosters_cover_every_status() {
        let mut faker = LoanFaker::new(11);
        let roster = faker.roster(200, 5);
        for status in ApplicationStatus::ALL {
            assert!(
                roster.applications().iter().any(|app| app.status == status),
                "missing {status}"
            );
        }
        assert!(roster.applications().iter().any(|app| app.timer == 0));
    }

    #[test]
    fn loan_requests_validate() {
        let mut faker = LoanFaker::new(5);
        for _ in 0..50 {
            let request = faker.loan_request();
            assert_eq!(request.validate(), Ok(()), "{request:?}");
        }
    }
}
