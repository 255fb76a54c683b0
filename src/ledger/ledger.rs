use std::collections::HashSet;

use uuid::Uuid;

use crate::errors::{LedgerError, Result};

use super::{
    category::{Category, CategoryDraft, CategoryEdit},
    payment::{Payment, PaymentDraft},
};

/// Fallback income when no value has ever been stored.
pub const DEFAULT_MONTHLY_INCOME: f64 = 30_000.0;
/// Fallback savings rate when no value has ever been stored.
pub const DEFAULT_MONTHLY_SAVINGS: f64 = 25_000.0;

/// Aggregate root for the wedding budget: cash position, budget ceiling,
/// categories, and the payment history.
///
/// `balance` and each category's `paid`/`months_paid` stay consistent with the
/// payment list purely through matched forward and inverse updates; no
/// operation recomputes `paid` by summing payments.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub balance: f64,
    pub total_budget: f64,
    pub monthly_income: f64,
    pub monthly_savings: f64,
    /// Insertion order preserved for display.
    pub categories: Vec<Category>,
    /// Newest first by construction.
    pub payments: Vec<Payment>,
}

impl Ledger {
    /// A ledger with every figure zeroed and no categories.
    pub fn empty() -> Self {
        Self {
            balance: 0.0,
            total_budget: 0.0,
            monthly_income: 0.0,
            monthly_savings: 0.0,
            categories: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// The starting state for a fresh install: default income and savings
    /// plus the standard wedding category set.
    pub fn seeded() -> Self {
        Self {
            monthly_income: DEFAULT_MONTHLY_INCOME,
            monthly_savings: DEFAULT_MONTHLY_SAVINGS,
            categories: Self::seed_categories(),
            ..Self::empty()
        }
    }

    /// Standard wedding cost buckets, all amounts left for the user to fill.
    pub fn seed_categories() -> Vec<Category> {
        vec![
            Category::recurring("rent", "Apartment rent", 0.0, 0),
            Category::fixed("dress", "Wedding dress", 0.0),
            Category::fixed("furniture", "Furniture", 0.0),
            Category::fixed("shopping", "Online purchases", 0.0),
            Category::fixed("venue", "Venue hall", 0.0),
            Category::fixed("photos", "Photo session", 0.0),
            Category::fixed("media", "Media & filming", 0.0),
            Category::fixed("other", "Miscellaneous", 0.0),
        ]
    }

    /// Records a payment: prepends it to the history, lowers the balance, and
    /// credits the referenced category when it still exists. A payment
    /// against a missing category is still recorded (dangling reference).
    pub fn add_payment(&mut self, draft: PaymentDraft) -> Result<Uuid> {
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "payment amount must be a positive number, got {}",
                draft.amount
            )));
        }
        let payment = Payment::from_draft(draft);
        let id = payment.id;
        self.balance -= payment.amount;
        if let Some(category) = self.category_mut(&payment.category_id) {
            category.paid += payment.amount;
            category.refresh_months_paid();
        }
        self.payments.insert(0, payment);
        Ok(id)
    }

    /// Removes a payment, reversing every effect of `add_payment` exactly.
    /// The category's `paid` is clamped at zero. Unknown ids are a no-op.
    pub fn delete_payment(&mut self, id: Uuid) -> Option<Payment> {
        let index = self.payments.iter().position(|payment| payment.id == id)?;
        let payment = self.payments.remove(index);
        self.balance += payment.amount;
        if let Some(category) = self.category_mut(&payment.category_id) {
            category.paid = (category.paid - payment.amount).max(0.0);
            category.refresh_months_paid();
        }
        Some(payment)
    }

    /// Adds a category from user input and returns its generated id.
    pub fn add_category(&mut self, draft: CategoryDraft) -> String {
        let category = Category::from_draft(draft);
        let id = category.id.clone();
        self.categories.push(category);
        id
    }

    /// Removes a category. Payments referencing it are left in place and
    /// become dangling.
    pub fn delete_category(&mut self, id: &str) -> Option<Category> {
        let index = self.categories.iter().position(|category| category.id == id)?;
        Some(self.categories.remove(index))
    }

    /// Applies a field edit to the named category.
    pub fn edit_category(&mut self, id: &str, edit: CategoryEdit) -> Result<()> {
        let category = self
            .category_mut(id)
            .ok_or_else(|| LedgerError::CategoryNotFound(id.to_string()))?;
        category.apply(edit);
        Ok(())
    }

    pub fn set_balance(&mut self, balance: f64) {
        self.balance = balance;
    }

    pub fn set_total_budget(&mut self, total_budget: f64) {
        self.total_budget = total_budget;
    }

    pub fn set_monthly_income(&mut self, monthly_income: f64) {
        self.monthly_income = monthly_income;
    }

    pub fn set_monthly_savings(&mut self, monthly_savings: f64) {
        self.monthly_savings = monthly_savings;
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    pub fn payment(&self, id: Uuid) -> Option<&Payment> {
        self.payments.iter().find(|payment| payment.id == id)
    }
}

/// Reports payments whose category no longer exists. Dangling references are
/// tolerated everywhere; this is a diagnostic surface, not a validation gate.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let category_ids: HashSet<&str> = ledger
        .categories
        .iter()
        .map(|category| category.id.as_str())
        .collect();
    let mut warnings = Vec::new();
    for payment in &ledger.payments {
        if !category_ids.contains(payment.category_id.as_str()) {
            warnings.push(format!(
                "payment {} references missing category {}",
                payment.id, payment.category_id
            ));
        }
    }
    warnings
}
