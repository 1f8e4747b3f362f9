// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use loandesk_app::{
    Application, ApplicationId, ApplicationStatus, ClientId, Employee, EmployeeId, EmployeeRole,
    LoanType, Priority, Roster,
};
use time::macros::datetime;

/// The fixed roster the desk starts with.
pub fn sample_roster() -> Roster {
    Roster::new(sample_applications(), sample_employees())
}

fn sample_applications() -> Vec<Application> {
    vec![
        Application {
            id: ApplicationId::new("APP001"),
            client_id: ClientId::new("CLI001"),
            client_name: "Ivan Petrov".to_owned(),
            phone: "+7 (999) 123-45-67".to_owned(),
            loan_type: LoanType::Loan,
            amount: 150_000,
            status: ApplicationStatus::InProgress,
            created_at: datetime!(2024-07-20 10:30 +3),
            assigned_to: "Anna Ivanova".to_owned(),
            priority: Priority::High,
            timer: 2 * 60 * 60,
            documents: strings(&["Passport", "Income statement"]),
            comments: strings(&[
                "Client confirmed phone number",
                "Waiting for employer reference",
            ]),
        },
        Application {
            id: ApplicationId::new("APP002"),
            client_id: ClientId::new("CLI002"),
            client_name: "Maria Sidorova".to_owned(),
            phone: "+7 (999) 987-65-43".to_owned(),
            loan_type: LoanType::Refinancing,
            amount: 500_000,
            status: ApplicationStatus::New,
            created_at: datetime!(2024-07-20 14:15 +3),
            assigned_to: "Petr Vasiliev".to_owned(),
            priority: Priority::Medium,
            timer: 8 * 60 * 60,
            documents: strings(&["Passport"]),
            comments: strings(&["New application"]),
        },
        Application {
            id: ApplicationId::new("APP003"),
            client_id: ClientId::new("CLI003"),
            client_name: "Alexander Kozlov".to_owned(),
            phone: "+7 (999) 555-11-22".to_owned(),
            loan_type: LoanType::Loan,
            amount: 75_000,
            status: ApplicationStatus::Approved,
            created_at: datetime!(2024-07-19 16:45 +3),
            assigned_to: "Anna Ivanova".to_owned(),
            priority: Priority::Low,
            timer: 0,
            documents: strings(&["Passport", "Income statement", "INN"]),
            comments: strings(&["Application approved", "Ready for disbursement"]),
        },
    ]
}

pub fn sample_employees() -> Vec<Employee> {
    let employee = |id: &str, name: &str, role, is_online, workload| Employee {
        id: EmployeeId::new(id),
        name: name.to_owned(),
        role,
        is_online,
        workload,
    };

    vec![
        employee("emp1", "Anna Ivanova", EmployeeRole::Senior, true, 5),
        employee("emp2", "Petr Vasiliev", EmployeeRole::Manager, true, 3),
        employee("emp3", "Maria Petrova", EmployeeRole::Manager, false, 2),
        employee("emp4", "Sergey Ivanov", EmployeeRole::Admin, true, 1),
    ]
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::sample_roster;
    use loandesk_app::RosterStats;

    #[test]
    fn sample_roster_matches_the_reference_counts() {
        let roster = sample_roster();
        assert_eq!(
            roster.stats(),
            RosterStats {
                total: 3,
                new: 1,
                processing: 1,
                approved: 1,
                overdue: 0,
            }
        );
        assert_eq!(roster.employees().len(), 4);
    }

    #[test]
    fn every_assignee_is_on_the_team() {
        let roster = sample_roster();
        for app in roster.applications() {
            assert!(
                roster
                    .employees()
                    .iter()
                    .any(|employee| employee.name == app.assigned_to),
                "{} has no matching employee",
                app.assigned_to
            );
        }
    }
}
