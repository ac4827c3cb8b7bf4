use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{JobApplicationRequest, NewJobApplication};

pub const COMPANY_MAX_LEN: usize = 200;
pub const ROLE_MAX_LEN: usize = 200;
pub const PLATFORM_MAX_LEN: usize = 100;
pub const STATUS_MAX_LEN: usize = 50;
pub const CONTACT_MAX_LEN: usize = 500;
pub const OBSERVATION_MAX_LEN: usize = 1000;

/// Applied dates must fall within 0001-01-01 ..= 9999-12-31.
pub const APPLIED_DATE_MIN_YEAR: i32 = 1;
pub const APPLIED_DATE_MAX_YEAR: i32 = 9999;

/// Column is NUMERIC(18, 2).
pub const PAYMENT_SCALE: u32 = 2;
pub const PAYMENT_INTEGER_DIGITS: u32 = 16;

/// Every violated constraint of a request body, keyed by JSON field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.keys().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "one or more validation errors occurred")?;
        let fields: Vec<&str> = self.fields().collect();
        if !fields.is_empty() {
            write!(f, " ({})", fields.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl JobApplicationRequest {
    /// Check presence and length constraints, yielding storable content.
    pub fn validate(self) -> Result<NewJobApplication, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let applied_date = self.applied_date;
        match applied_date {
            None => errors.add("appliedDate", required_message("appliedDate")),
            Some(date) if !(APPLIED_DATE_MIN_YEAR..=APPLIED_DATE_MAX_YEAR).contains(&date.year()) => {
                errors.add(
                    "appliedDate",
                    "The field appliedDate must be between 0001-01-01 and 9999-12-31.",
                );
            }
            Some(_) => {}
        }

        let company = required_text(&mut errors, "company", self.company, COMPANY_MAX_LEN);
        let role = required_text(&mut errors, "role", self.role, ROLE_MAX_LEN);
        let applied_from_platform = required_text(
            &mut errors,
            "appliedFromPlatform",
            self.applied_from_platform,
            PLATFORM_MAX_LEN,
        );
        let status = required_text(&mut errors, "status", self.status, STATUS_MAX_LEN);
        check_text(&mut errors, "contact", self.contact.as_deref(), CONTACT_MAX_LEN);
        check_text(
            &mut errors,
            "observation",
            self.observation.as_deref(),
            OBSERVATION_MAX_LEN,
        );
        if let Some(payment) = self.payment {
            check_payment(&mut errors, payment);
        }

        match (applied_date, company, role, applied_from_platform, status) {
            (Some(applied_date), Some(company), Some(role), Some(applied_from_platform), Some(status))
                if errors.is_empty() =>
            {
                Ok(NewJobApplication {
                    applied_date,
                    company,
                    role,
                    applied_from_platform,
                    status,
                    payment: self.payment,
                    contact: self.contact,
                    observation: self.observation,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_message(field: &str) -> String {
    format!("The {field} field is required.")
}

fn max_len_message(field: &str, max: usize) -> String {
    format!("The field {field} must be a string with a maximum length of {max}.")
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Option<String> {
    match value {
        Some(value) if !value.trim().is_empty() => {
            check_text(errors, field, Some(&value), max);
            Some(value)
        }
        _ => {
            errors.add(field, required_message(field));
            None
        }
    }
}

fn check_text(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        if value.chars().count() > max {
            errors.add(field, max_len_message(field, max));
        }
        // Postgres text columns cannot store NUL.
        if value.contains('\0') {
            errors.add(field, format!("The field {field} must not contain NUL characters."));
        }
    }
}

fn check_payment(errors: &mut ValidationErrors, payment: Decimal) {
    let normalized = payment.normalize();
    if normalized.scale() > PAYMENT_SCALE {
        errors.add(
            "payment",
            format!("The field payment must have at most {PAYMENT_SCALE} decimal places."),
        );
    }

    let limit = Decimal::from(10_i64.pow(PAYMENT_INTEGER_DIGITS));
    if normalized.abs() >= limit {
        errors.add(
            "payment",
            format!("The field payment must have at most {PAYMENT_INTEGER_DIGITS} integer digits."),
        );
    }
}
