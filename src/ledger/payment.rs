use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded disbursement against a category. The `category_id` is a weak
/// reference; the category may have been deleted since.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub category_id: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Payment {
    pub fn from_draft(draft: PaymentDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id: draft.category_id,
            amount: draft.amount,
            date: draft.date,
            method: draft.method,
            notes: draft.notes,
        }
    }
}

/// User input for a new payment; validated by `Ledger::add_payment`.
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub category_id: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub method: Option<String>,
    pub notes: Option<String>,
}

impl PaymentDraft {
    pub fn new(category_id: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            category_id: category_id.into(),
            amount,
            date,
            method: None,
            notes: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
