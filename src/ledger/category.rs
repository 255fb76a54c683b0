use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cost bucket in the wedding budget, either a one-time fixed amount or a
/// recurring per-month charge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub is_recurring: bool,
    /// Target cost for fixed categories; zero for recurring ones.
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub monthly_rate: f64,
    #[serde(default)]
    pub months_total: u32,
    /// Derived: `floor(paid / monthly_rate)` while the rate is positive.
    #[serde(default)]
    pub months_paid: u32,
    /// Cumulative amount applied, maintained incrementally by payment
    /// operations rather than recomputed from the payment list.
    #[serde(default)]
    pub paid: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Category {
    /// One-time category with a fixed target cost and an explicit id.
    pub fn fixed(id: impl Into<String>, name: impl Into<String>, total: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_recurring: false,
            total,
            monthly_rate: 0.0,
            months_total: 0,
            months_paid: 0,
            paid: 0.0,
            due_date: None,
            notes: None,
        }
    }

    /// Recurring category charged at `monthly_rate` for `months_total` months.
    pub fn recurring(
        id: impl Into<String>,
        name: impl Into<String>,
        monthly_rate: f64,
        months_total: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_recurring: true,
            total: 0.0,
            monthly_rate,
            months_total,
            months_paid: 0,
            paid: 0.0,
            due_date: None,
            notes: None,
        }
    }

    /// Builds a category from user input, generating a fresh id and zeroing
    /// the fields the draft's cost model does not use.
    pub fn from_draft(draft: CategoryDraft) -> Self {
        let id = format!("cat-{}", Uuid::new_v4().simple());
        let mut category = if draft.is_recurring {
            Self::recurring(id, draft.name, draft.monthly_rate, draft.months_total)
        } else {
            Self::fixed(id, draft.name, draft.total)
        };
        category.due_date = draft.due_date;
        category.notes = draft.notes;
        category
    }

    /// Cost this category contributes to the overall budget.
    pub fn effective_cost(&self) -> f64 {
        if self.is_recurring {
            self.monthly_rate * self.months_total as f64
        } else {
            self.total
        }
    }

    /// Recomputes `months_paid` from the cumulative `paid` amount. Editing the
    /// rate retroactively changes how many months count as covered.
    pub fn refresh_months_paid(&mut self) {
        self.months_paid = if self.is_recurring && self.monthly_rate > 0.0 {
            (self.paid / self.monthly_rate).floor() as u32
        } else {
            0
        };
    }

    /// Applies a single field edit.
    pub fn apply(&mut self, edit: CategoryEdit) {
        match edit {
            CategoryEdit::Total(total) => self.total = total,
            CategoryEdit::DueDate(due_date) => self.due_date = due_date,
            CategoryEdit::Notes(notes) => self.notes = notes,
            CategoryEdit::MonthlyRate(rate) => {
                self.monthly_rate = rate;
                self.refresh_months_paid();
            }
            CategoryEdit::MonthsTotal(months) => {
                self.months_total = months;
                self.refresh_months_paid();
            }
        }
    }
}

/// User input for a new category. `from_draft` normalizes the fields the
/// chosen cost model leaves meaningless.
#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub name: String,
    pub is_recurring: bool,
    pub total: f64,
    pub monthly_rate: f64,
    pub months_total: u32,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl CategoryDraft {
    pub fn fixed(name: impl Into<String>, total: f64) -> Self {
        Self {
            name: name.into(),
            is_recurring: false,
            total,
            monthly_rate: 0.0,
            months_total: 0,
            due_date: None,
            notes: None,
        }
    }

    pub fn recurring(name: impl Into<String>, monthly_rate: f64, months_total: u32) -> Self {
        Self {
            name: name.into(),
            is_recurring: true,
            total: 0.0,
            monthly_rate,
            months_total,
            due_date: None,
            notes: None,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Editable category fields; rate and month-count edits refresh `months_paid`.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryEdit {
    Total(f64),
    DueDate(Option<NaiveDate>),
    Notes(Option<String>),
    MonthlyRate(f64),
    MonthsTotal(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_draft_zeroes_recurring_fields() {
        let mut draft = CategoryDraft::fixed("Venue hall", 80_000.0);
        draft.monthly_rate = 500.0;
        draft.months_total = 6;

        let category = Category::from_draft(draft);
        assert!(!category.is_recurring);
        assert_eq!(category.total, 80_000.0);
        assert_eq!(category.monthly_rate, 0.0);
        assert_eq!(category.months_total, 0);
        assert!(category.id.starts_with("cat-"));
    }

    #[test]
    fn recurring_draft_zeroes_fixed_total() {
        let mut draft = CategoryDraft::recurring("Apartment rent", 15_000.0, 12);
        draft.total = 99_000.0;

        let category = Category::from_draft(draft);
        assert!(category.is_recurring);
        assert_eq!(category.total, 0.0);
        assert_eq!(category.effective_cost(), 180_000.0);
    }

    #[test]
    fn months_paid_floors_against_rate() {
        let mut category = Category::recurring("rent", "Apartment rent", 1_000.0, 12);
        category.paid = 2_500.0;
        category.refresh_months_paid();
        assert_eq!(category.months_paid, 2);
    }

    #[test]
    fn rate_edit_reinterprets_existing_paid() {
        let mut category = Category::recurring("rent", "Apartment rent", 1_000.0, 12);
        category.paid = 2_500.0;
        category.refresh_months_paid();

        category.apply(CategoryEdit::MonthlyRate(500.0));
        assert_eq!(category.months_paid, 5);
    }

    #[test]
    fn zero_rate_means_no_months_covered() {
        let mut category = Category::recurring("rent", "Apartment rent", 0.0, 12);
        category.paid = 2_500.0;
        category.refresh_months_paid();
        assert_eq!(category.months_paid, 0);
    }

    #[test]
    fn serde_uses_camel_case_keys() {
        let category = Category::fixed("dress", "Wedding dress", 25_000.0);
        let json = serde_json::to_string(&category).unwrap();
        assert!(json.contains("\"isRecurring\""));
        assert!(json.contains("\"monthlyRate\""));
        assert!(json.contains("\"monthsPaid\""));
    }
}
