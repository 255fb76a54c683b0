//! Derived figures over the ledger, recomputed on demand. Nothing here
//! mutates state; every value is a pure function of the current ledger.

use std::collections::HashSet;

use super::{category::Category, ledger::Ledger};

/// How far along a category is against its effective cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStatus {
    Unpaid,
    PartiallyPaid,
    FullyPaid,
}

impl CategoryStatus {
    pub fn of(category: &Category) -> Self {
        let cost = category.effective_cost();
        if category.paid <= 0.0 {
            CategoryStatus::Unpaid
        } else if category.paid < cost {
            CategoryStatus::PartiallyPaid
        } else {
            CategoryStatus::FullyPaid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryStatus::Unpaid => "unpaid",
            CategoryStatus::PartiallyPaid => "partially paid",
            CategoryStatus::FullyPaid => "fully paid",
        }
    }
}

/// Projected payoff timeline. `months_to_goal` alone reads as "0 months" both
/// when the deficit is covered and when no savings rate is configured; this
/// keeps the two cases apart for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoffProjection {
    /// Nothing left to save for: no remaining cost, or the balance covers it.
    Covered,
    /// Months of saving at the current rate until the deficit is covered.
    Months(u32),
    /// A deficit exists but `monthly_savings` is not positive.
    NoSavingsPlan,
}

/// Snapshot of every derived figure the presentation layer displays.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerMetrics {
    pub total_cost: f64,
    /// Sum over the payment list, independent of category `paid` fields.
    pub total_paid: f64,
    /// `total_cost - total_paid`; negative when overpaid, not clamped.
    pub total_remaining: f64,
    pub is_insufficient: bool,
    /// `max(0, total_remaining - balance)`.
    pub deficit: f64,
    pub budget_exceeded: bool,
    /// 0 when `monthly_savings <= 0` or nothing remains; see `projection`.
    pub months_to_goal: u32,
    pub projection: PayoffProjection,
    /// `round(total_paid / max(total_cost, 1) * 100)`; may exceed 100 when
    /// overpaid. Clamp via `progress_percent` for bar widths.
    pub percent_paid: u32,
}

impl LedgerMetrics {
    pub fn for_ledger(ledger: &Ledger) -> Self {
        let total_cost: f64 = ledger
            .categories
            .iter()
            .map(Category::effective_cost)
            .sum();
        let total_paid: f64 = ledger.payments.iter().map(|payment| payment.amount).sum();
        let total_remaining = total_cost - total_paid;
        let deficit = (total_remaining - ledger.balance).max(0.0);
        let months_to_goal = if ledger.monthly_savings <= 0.0 || total_remaining <= 0.0 {
            0
        } else {
            (deficit / ledger.monthly_savings).ceil() as u32
        };
        let projection = if total_remaining <= 0.0 || deficit <= 0.0 {
            PayoffProjection::Covered
        } else if ledger.monthly_savings <= 0.0 {
            PayoffProjection::NoSavingsPlan
        } else {
            PayoffProjection::Months(months_to_goal)
        };
        Self {
            total_cost,
            total_paid,
            total_remaining,
            is_insufficient: ledger.balance < total_remaining,
            deficit,
            budget_exceeded: total_cost > ledger.total_budget,
            months_to_goal,
            projection,
            percent_paid: (total_paid / total_cost.max(1.0) * 100.0).round() as u32,
        }
    }

    /// Completion percentage clamped to [0, 100] for progress-bar widths.
    pub fn progress_percent(&self) -> u32 {
        self.percent_paid.min(100)
    }
}

/// Total paid against categories that no longer exist (the dangling share of
/// `total_paid`).
pub fn unattributed_paid(ledger: &Ledger) -> f64 {
    let category_ids: HashSet<&str> = ledger
        .categories
        .iter()
        .map(|category| category.id.as_str())
        .collect();
    ledger
        .payments
        .iter()
        .filter(|payment| !category_ids.contains(payment.category_id.as_str()))
        .map(|payment| payment.amount)
        .sum()
}
