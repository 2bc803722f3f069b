//! # Hawl (Lunar Year) Tracker
//!
//! Wealth must stay at or above the nisab for one full lunar year (Hawl)
//! before zakat becomes obligatory. The lunar year is approximated as 354 days.
//!
//! The status is recomputed from scratch on every call from the recorded
//! start date, the manual "broken" flag, and the calculation date.

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of the Hijri year in days.
pub const HIJRI_YEAR_DAYS: i64 = 354;

/// Hawl inputs as stored in the user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HawlConfiguration {
    /// The day wealth first reached or exceeded the nisab.
    #[serde(default, with = "crate::wire::optional_date")]
    pub nisab_met_date: Option<NaiveDate>,
    /// Set when wealth dropped below the nisab during the year.
    #[serde(default, rename = "hawlBroken", deserialize_with = "crate::wire::flag")]
    pub broken: bool,
}

impl HawlConfiguration {
    pub fn started_on(date: NaiveDate) -> Self {
        Self {
            nisab_met_date: Some(date),
            broken: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HawlState {
    /// No start date recorded.
    NotStarted,
    /// Nisab met, counting down.
    InProgress,
    /// 354 or more days elapsed; zakat is due.
    Complete,
    /// Wealth dropped below nisab mid-year.
    Broken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HawlStatus {
    pub state: HawlState,
    pub nisab_met_date: Option<NaiveDate>,
    pub hawl_due_date: Option<NaiveDate>,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    /// 0 to 100.
    pub progress_percent: u8,
}

impl HawlStatus {
    fn idle(state: HawlState, nisab_met_date: Option<NaiveDate>) -> Self {
        Self {
            state,
            nisab_met_date,
            hawl_due_date: None,
            days_elapsed: 0,
            days_remaining: HIJRI_YEAR_DAYS,
            progress_percent: 0,
        }
    }
}

/// Evaluates Hawl configuration against a calculation date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HawlTracker {
    /// The date the status is evaluated for (defaults to today).
    pub calculation_date: NaiveDate,
}

impl HawlTracker {
    pub fn new(calculation_date: NaiveDate) -> Self {
        Self { calculation_date }
    }

    /// Derives the current status. The broken flag takes priority over everything else.
    pub fn status(&self, config: &HawlConfiguration) -> HawlStatus {
        if config.broken {
            return HawlStatus::idle(HawlState::Broken, config.nisab_met_date);
        }

        let Some(start) = config.nisab_met_date else {
            return HawlStatus::idle(HawlState::NotStarted, None);
        };

        // A future-dated start counts as zero days, never negative.
        let days_elapsed = self.days_elapsed(start).max(0);
        let days_remaining = (HIJRI_YEAR_DAYS - days_elapsed).max(0);

        let state = if days_elapsed >= HIJRI_YEAR_DAYS {
            HawlState::Complete
        } else {
            HawlState::InProgress
        };

        HawlStatus {
            state,
            nisab_met_date: Some(start),
            hawl_due_date: start.checked_add_days(Days::new(HIJRI_YEAR_DAYS as u64)),
            days_elapsed,
            days_remaining,
            progress_percent: progress_percent(days_elapsed),
        }
    }

    /// Returns the number of days between `start_date` and the calculation date.
    pub fn days_elapsed(&self, start_date: NaiveDate) -> i64 {
        (self.calculation_date - start_date).num_days()
    }
}

impl Default for HawlTracker {
    fn default() -> Self {
        Self {
            calculation_date: Local::now().date_naive(),
        }
    }
}

/// `min(100, round(100 × days / 354))` with halves rounded up.
fn progress_percent(days_elapsed: i64) -> u8 {
    let rounded = (200 * days_elapsed + HIJRI_YEAR_DAYS) / (2 * HIJRI_YEAR_DAYS);
    rounded.clamp(0, 100) as u8
}
