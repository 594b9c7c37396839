//! Recurring-transaction templates and their schedule state machine.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, RenewalFrequency, TransactionKind};

/// Lifecycle state of a recurring template.
///
/// `Active` and `Paused` are interchangeable via pause/resume; `Cancelled`
/// is terminal, reached manually or when the schedule passes its end date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecurringStatus {
    Active,
    Paused,
    Cancelled,
}

impl RecurringStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecurringStatus::Cancelled)
    }
}

impl fmt::Display for RecurringStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecurringStatus::Active => "Active",
            RecurringStatus::Paused => "Paused",
            RecurringStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// A schedule template that materializes concrete transactions over time.
///
/// Invariant: `next_occurrence` always equals the start date advanced by
/// the frequency exactly `occurrence_count + 1` times, so the schedule can
/// be re-derived after pauses or missed sweeps without drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    pub category: Category,
    pub kind: TransactionKind,
    pub frequency: RenewalFrequency,
    /// Immutable after creation; anchor for every occurrence.
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub next_occurrence: NaiveDate,
    pub status: RecurringStatus,
    pub occurrence_count: u32,
    #[serde(default)]
    pub last_created: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl RecurringTemplate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        description: Option<String>,
        amount: f64,
        category: Category,
        kind: TransactionKind,
        frequency: RenewalFrequency,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description,
            amount,
            category,
            kind,
            frequency,
            start_date,
            end_date,
            next_occurrence: frequency.advance(start_date),
            status: RecurringStatus::Active,
            occurrence_count: 0,
            last_created: None,
            created_at,
            modified_at: created_at,
        }
    }

    /// Whether a processing sweep may materialize this template at `today`.
    pub fn can_be_processed(&self, today: NaiveDate) -> bool {
        self.status == RecurringStatus::Active
            && self.next_occurrence <= today
            && self.end_date.map_or(true, |end| end > today)
    }

    /// Re-derives the next occurrence from the immutable start date.
    pub fn derived_next_occurrence(&self) -> NaiveDate {
        self.frequency
            .advance_by(self.start_date, self.occurrence_count + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn template(start: NaiveDate, end: Option<NaiveDate>) -> RecurringTemplate {
        RecurringTemplate::new(
            Uuid::new_v4(),
            "Gym",
            None,
            40.0,
            Category::Health,
            TransactionKind::Expense,
            RenewalFrequency::Weekly,
            start,
            end,
            Utc::now(),
        )
    }

    #[test]
    fn new_template_points_one_period_ahead() {
        let tpl = template(date(2024, 1, 1), None);
        assert_eq!(tpl.next_occurrence, date(2024, 1, 8));
        assert_eq!(tpl.occurrence_count, 0);
        assert_eq!(tpl.status, RecurringStatus::Active);
    }

    #[test]
    fn can_be_processed_requires_active_and_due() {
        let mut tpl = template(date(2024, 1, 1), Some(date(2024, 3, 1)));
        assert!(!tpl.can_be_processed(date(2024, 1, 7)));
        assert!(tpl.can_be_processed(date(2024, 1, 8)));

        tpl.status = RecurringStatus::Paused;
        assert!(!tpl.can_be_processed(date(2024, 1, 8)));

        tpl.status = RecurringStatus::Active;
        assert!(!tpl.can_be_processed(date(2024, 3, 1)));
    }

    #[test]
    fn derived_next_occurrence_replays_the_start_date() {
        let mut tpl = template(date(2024, 1, 1), None);
        tpl.occurrence_count = 3;
        assert_eq!(tpl.derived_next_occurrence(), date(2024, 1, 29));
    }
}
