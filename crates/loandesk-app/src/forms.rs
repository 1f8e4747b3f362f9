// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

pub const MIN_LOAN_AMOUNT: u64 = 1_000;
pub const MAX_LOAN_AMOUNT: u64 = 30_000;
pub const LOAN_AMOUNT_STEP: u64 = 1_000;
pub const LOAN_TERM_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("passport series must be 4 digits")]
    InvalidPassportSeries,
    #[error("passport number must be 6 digits")]
    InvalidPassportNumber,
    #[error("birth date must use YYYY-MM-DD, got {0:?}")]
    InvalidBirthDate(String),
    #[error("loan amount {0} must be 1000..=30000 in steps of 1000")]
    InvalidAmount(u64),
}

/// Applicant details captured by the public request form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub birth_date: String,
    pub passport_series: String,
    pub passport_number: String,
    pub address: String,
    #[serde(default)]
    pub workplace: String,
    pub loan_amount: u64,
}

impl LoanRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        require(&self.first_name, "first name")?;
        require(&self.last_name, "last name")?;
        require(&self.birth_date, "birth date")?;
        require(&self.passport_series, "passport series")?;
        require(&self.passport_number, "passport number")?;
        require(&self.address, "address")?;

        if !is_digits(self.passport_series.trim(), 4) {
            return Err(RequestError::InvalidPassportSeries);
        }
        if !is_digits(self.passport_number.trim(), 6) {
            return Err(RequestError::InvalidPassportNumber);
        }
        self.parsed_birth_date()?;
        validate_amount(self.loan_amount)?;
        Ok(())
    }

    pub fn parsed_birth_date(&self) -> Result<Date, RequestError> {
        let raw = self.birth_date.trim();
        Date::parse(raw, &format_description!("[year]-[month]-[day]"))
            .map_err(|_| RequestError::InvalidBirthDate(raw.to_owned()))
    }

    pub fn full_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.middle_name]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn repayment(&self) -> u64 {
        repayment_total(self.loan_amount)
    }
}

pub fn validate_amount(amount: u64) -> Result<(), RequestError> {
    if !(MIN_LOAN_AMOUNT..=MAX_LOAN_AMOUNT).contains(&amount) || amount % LOAN_AMOUNT_STEP != 0 {
        return Err(RequestError::InvalidAmount(amount));
    }
    Ok(())
}

/// Principal plus 30% for the whole term: `round(amount * 1.3)`, half rounding
/// up, saturating at `u64::MAX`.
pub fn repayment_total(amount: u64) -> u64 {
    let interest = (amount / 10) * 3 + ((amount % 10) * 3 + 5) / 10;
    amount.saturating_add(interest)
}

fn require(value: &str, field: &'static str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::MissingField(field));
    }
    Ok(())
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}
