//! Form-level validation.
//!
//! Every rule checks one field and records a message; all failing fields are
//! returned together as [`EngineError::Validation`] so a form can show each
//! message next to its input.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Budget, Category, EngineError, ResultEngine, Transaction};

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").ok());

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// First message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> ResultEngine<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Validation(self))
        }
    }

    fn required(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{label} is required"));
        }
    }

    fn min_len(&mut self, field: &str, value: &str, min: usize, label: &str) {
        if value.trim().chars().count() < min {
            self.push(field, format!("{label} must be at least {min} characters"));
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

pub(crate) fn validate_transaction(tx: &Transaction) -> ResultEngine<()> {
    let mut errors = ValidationErrors::new();
    if !tx.amount.is_positive() {
        errors.push("amount", "Amount must be greater than 0");
    }
    errors.required("description", &tx.description, "Description");
    errors.required("category", &tx.category, "Category");
    errors.into_result()
}

pub(crate) fn validate_budget(budget: &Budget) -> ResultEngine<()> {
    let mut errors = ValidationErrors::new();
    errors.required("category", &budget.category, "Category");
    if budget.amount.is_negative() {
        errors.push("amount", "Amount must not be negative");
    }
    if budget.spent.is_negative() {
        errors.push("spent", "Spent must not be negative");
    }
    if budget.start_date > budget.end_date {
        errors.push("end_date", "End date must not be before start date");
    }
    errors.into_result()
}

pub(crate) fn validate_category(category: &Category) -> ResultEngine<()> {
    let mut errors = ValidationErrors::new();
    errors.required("name", &category.name, "Name");
    if !is_hex_color(&category.color) {
        errors.push("color", "Color must look like #rrggbb");
    }
    errors.into_result()
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL
        .as_ref()
        .is_some_and(|re| re.is_match(value.trim()))
}

/// At least one lowercase letter, one uppercase letter and one digit or
/// special character.
fn is_strong_password(value: &str) -> bool {
    let lower = value.chars().any(|c| c.is_lowercase());
    let upper = value.chars().any(|c| c.is_uppercase());
    let digit_or_special = value
        .chars()
        .any(|c| c.is_ascii_digit() || "!@#$%^&*(),.?\":{}|<>".contains(c));
    lower && upper && digit_or_special
}

/// Sign-up form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    pub fn validate(&self) -> ResultEngine<()> {
        let mut errors = ValidationErrors::new();

        errors.required("first_name", &self.first_name, "First name");
        if !self.first_name.trim().is_empty() {
            errors.min_len("first_name", &self.first_name, MIN_NAME_LEN, "First name");
        }
        errors.required("last_name", &self.last_name, "Last name");
        if !self.last_name.trim().is_empty() {
            errors.min_len("last_name", &self.last_name, MIN_NAME_LEN, "Last name");
        }

        errors.required("email", &self.email, "Email");
        if !self.email.trim().is_empty() && !is_valid_email(&self.email) {
            errors.push("email", "Invalid email address");
        }

        errors.required("password", &self.password, "Password");
        if !self.password.is_empty() {
            if self.password.chars().count() < MIN_PASSWORD_LEN {
                errors.push(
                    "password",
                    format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
                );
            } else if !is_strong_password(&self.password) {
                errors.push(
                    "password",
                    "Password must contain at least 1 uppercase letter, 1 lowercase letter, and 1 number or special character",
                );
            }
        }

        if self.confirm_password.is_empty() {
            errors.push("confirm_password", "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.push("confirm_password", "Passwords do not match");
        }

        errors.into_result()
    }
}
