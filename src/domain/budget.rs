//! Budget periods and the calendar arithmetic behind their renewal.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

/// How often a budget period (or recurring template) repeats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RenewalFrequency {
    Weekly,
    Monthly,
    Yearly,
}

impl RenewalFrequency {
    /// Calendar-aware advance by one period: seven days, one calendar month
    /// (day clamped to the target month's length), or one calendar year.
    pub fn advance(&self, from: NaiveDate) -> NaiveDate {
        match self {
            RenewalFrequency::Weekly => from + Duration::days(7),
            RenewalFrequency::Monthly => shift_month(from, 1),
            RenewalFrequency::Yearly => shift_year(from, 1),
        }
    }

    /// Replays [`advance`](Self::advance) `steps` times from a fixed origin.
    ///
    /// Schedules derive every occurrence from the immutable start date, so
    /// missed or paused periods never accumulate drift.
    pub fn advance_by(&self, from: NaiveDate, steps: u32) -> NaiveDate {
        let mut date = from;
        for _ in 0..steps {
            date = self.advance(date);
        }
        date
    }
}

impl fmt::Display for RenewalFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RenewalFrequency::Weekly => "Weekly",
            RenewalFrequency::Monthly => "Monthly",
            RenewalFrequency::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap_or(date)
}

fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    (first_next - Duration::days(1)).day()
}

/// A bounded period tracking planned versus spent amount for one category.
///
/// Periods are half-open `[start_date, end_date)`; budgets of the same user
/// and category never overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: Category,
    pub planned_amount: f64,
    pub spent_amount: f64,
    pub reminder: bool,
    /// Immutable after creation.
    pub start_date: NaiveDate,
    /// Always `frequency.advance(start_date)`.
    pub end_date: NaiveDate,
    pub frequency: RenewalFrequency,
    pub auto_renew: bool,
    pub renewal_count: u32,
    #[serde(default)]
    pub last_renewal: Option<DateTime<Utc>>,
}

impl Budget {
    pub fn new(
        user_id: Uuid,
        category: Category,
        planned_amount: f64,
        start_date: NaiveDate,
        frequency: RenewalFrequency,
        auto_renew: bool,
        reminder: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            category,
            planned_amount,
            spent_amount: 0.0,
            reminder,
            start_date,
            end_date: frequency.advance(start_date),
            frequency,
            auto_renew,
            renewal_count: 0,
            last_renewal: None,
        }
    }

    /// Whether `date` falls inside this budget's half-open period.
    pub fn period_contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }

    /// Half-open interval intersection test against another period.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date < end && start < self.end_date
    }

    /// Whether the period has ended as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date <= today
    }
}
