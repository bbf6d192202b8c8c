//! Transaction primitives.
//!
//! A `Transaction` is a single expense or income record. Both kinds share the
//! same shape; the kind decides whether the amount is money going out or
//! coming in, so amounts are always stored as non-negative cents.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine,
    util::{normalize_optional_text, normalize_tags},
    validation,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(EngineError::InvalidField(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidField(format!("invalid status: {other}"))),
        }
    }
}

/// How a transaction was paid or received.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Credit,
    Debit,
    Online,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Online => "online",
            Self::BankTransfer => "bank-transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cash" => Ok(Self::Cash),
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            "online" => Ok(Self::Online),
            "bank-transfer" | "bank_transfer" => Ok(Self::BankTransfer),
            other => Err(EngineError::InvalidField(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub kind: TransactionKind,
    pub description: String,
    pub amount: MoneyCents,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial record coming from a create form.
///
/// Missing fields get the same defaults a freshly opened form shows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionNew {
    pub description: Option<String>,
    pub amount: Option<MoneyCents>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<TransactionStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub is_recurring: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// Partial record coming from an edit form. Only present fields change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<MoneyCents>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<TransactionStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub is_recurring: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl Transaction {
    /// Build a new record of `kind` from form input, assigning a fresh id.
    ///
    /// `today` is used when the form carries no date.
    pub fn new(kind: TransactionKind, input: TransactionNew, today: NaiveDate) -> ResultEngine<Self> {
        let tx = Self {
            id: Uuid::new_v4(),
            kind,
            description: input.description.unwrap_or_default().trim().to_string(),
            amount: input.amount.unwrap_or_default(),
            category: input.category.unwrap_or_default().trim().to_string(),
            date: input.date.unwrap_or(today),
            status: input.status.unwrap_or_default(),
            payment_method: input.payment_method.unwrap_or_default(),
            is_recurring: input.is_recurring.unwrap_or(false),
            tags: normalize_tags(input.tags.unwrap_or_default()),
            notes: normalize_optional_text(input.notes.as_deref()),
        };
        validation::validate_transaction(&tx)?;
        Ok(tx)
    }

    /// Merge `patch` into a copy of `self` and validate the result.
    ///
    /// The id and kind never change.
    pub fn patched(&self, patch: TransactionPatch) -> ResultEngine<Self> {
        let mut tx = self.clone();
        if let Some(description) = patch.description {
            tx.description = description.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            tx.amount = amount;
        }
        if let Some(category) = patch.category {
            tx.category = category.trim().to_string();
        }
        if let Some(date) = patch.date {
            tx.date = date;
        }
        if let Some(status) = patch.status {
            tx.status = status;
        }
        if let Some(payment_method) = patch.payment_method {
            tx.payment_method = payment_method;
        }
        if let Some(is_recurring) = patch.is_recurring {
            tx.is_recurring = is_recurring;
        }
        if let Some(tags) = patch.tags {
            tx.tags = normalize_tags(tags);
        }
        if let Some(notes) = patch.notes {
            tx.notes = normalize_optional_text(Some(&notes));
        }
        validation::validate_transaction(&tx)?;
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn coffee() -> TransactionNew {
        TransactionNew {
            description: Some("  Coffee shop ".to_string()),
            amount: Some(MoneyCents::new(450)),
            category: Some("Food".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn new_fills_form_defaults() {
        let tx = Transaction::new(TransactionKind::Expense, coffee(), today()).unwrap();
        assert_eq!(tx.description, "Coffee shop");
        assert_eq!(tx.date, today());
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.payment_method, PaymentMethod::Cash);
        assert!(!tx.is_recurring);
        assert!(tx.tags.is_empty());
        assert_eq!(tx.notes, None);
    }

    #[test]
    fn new_rejects_empty_form() {
        let err = Transaction::new(TransactionKind::Income, TransactionNew::default(), today())
            .unwrap_err();
        let EngineError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(errors.get("description").is_some());
        assert!(errors.get("category").is_some());
        assert!(errors.get("amount").is_some());
    }

    #[test]
    fn patched_keeps_identity_and_absent_fields() {
        let tx = Transaction::new(TransactionKind::Expense, coffee(), today()).unwrap();
        let updated = tx
            .patched(TransactionPatch {
                amount: Some(MoneyCents::new(500)),
                is_recurring: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.id, tx.id);
        assert_eq!(updated.kind, tx.kind);
        assert_eq!(updated.description, tx.description);
        assert_eq!(updated.amount, MoneyCents::new(500));
        assert!(updated.is_recurring);
    }

    #[test]
    fn patched_revalidates() {
        let tx = Transaction::new(TransactionKind::Expense, coffee(), today()).unwrap();
        assert!(
            tx.patched(TransactionPatch {
                description: Some("   ".to_string()),
                ..Default::default()
            })
            .is_err()
        );
    }

    #[test]
    fn payment_method_accepts_both_spellings() {
        assert_eq!(
            "bank-transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
