use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of one roster period, in days.
pub const PERIOD_DAYS: i64 = 28;
/// Periods per roster year (13 × 28 = 364 days).
pub const PERIODS_PER_YEAR: i64 = 13;

/// Lifecycle of a roster period, re-evaluated lazily against a reference
/// date. No background scheduler is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodStatus {
    /// Just created by self-healing; submission window not yet open.
    Auto,
    /// Submission window open, closing deadline not yet passed.
    Open,
    /// Past the closing deadline, period not yet finished.
    Locked,
    /// Past the period's end date.
    Archived,
}

/// One 28-day roster period ("RPnn/yyyy").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPeriod {
    pub code: String,
    /// 1..=13 within `year`.
    pub number: u32,
    pub year: i32,
    pub start_date: NaiveDate,
    /// Inclusive; always `start_date + 27` days.
    pub end_date: NaiveDate,
    pub status: PeriodStatus,
}

impl RosterPeriod {
    pub fn code_for(number: u32, year: i32) -> String {
        format!("RP{number:02}/{year}")
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Calendar month (1..=12) in which the period starts. Drives the
    /// seasonal-exclusion rule of the renewal planner.
    pub fn start_month(&self) -> u32 {
        self.start_date.month()
    }
}

/// Known fixed point of the period sequence. Everything else is pure
/// day arithmetic from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAnchor {
    pub number: u32,
    pub year: i32,
    pub start: NaiveDate,
}

impl Default for PeriodAnchor {
    /// RP12/2025, starting 2025-10-11.
    fn default() -> Self {
        Self {
            number: 12,
            year: 2025,
            start: NaiveDate::from_ymd_opt(2025, 10, 11).expect("valid anchor date"),
        }
    }
}

/// Offsets (days before period start) driving the status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPolicy {
    /// AUTO → OPEN this many days before the period starts.
    pub open_days_before_start: i64,
    /// Submission deadline: OPEN → LOCKED once this is passed.
    pub deadline_days_before_start: i64,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            open_days_before_start: 90,
            deadline_days_before_start: 21,
        }
    }
}

/// Pure period arithmetic around an anchor. All functions take the
/// reference date explicitly; nothing here reads the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodCalendar {
    anchor: PeriodAnchor,
}

fn linear_index(year: i32, number: u32) -> i64 {
    i64::from(year) * PERIODS_PER_YEAR + i64::from(number) - 1
}

impl PeriodCalendar {
    pub fn new(anchor: PeriodAnchor) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> PeriodAnchor {
        self.anchor
    }

    /// Period containing `date`, arbitrarily far before or after the anchor.
    pub fn period_for_date(&self, date: NaiveDate) -> RosterPeriod {
        let days = (date - self.anchor.start).num_days();
        let offset = days.div_euclid(PERIOD_DAYS);
        self.period_at_offset(offset)
    }

    /// Period (year, number) materialized from the anchor.
    pub fn period_at(&self, year: i32, number: u32) -> RosterPeriod {
        debug_assert!((1..=13).contains(&number));
        let offset = linear_index(year, number) - linear_index(self.anchor.year, self.anchor.number);
        self.period_at_offset(offset)
    }

    fn period_at_offset(&self, offset: i64) -> RosterPeriod {
        let lin = linear_index(self.anchor.year, self.anchor.number) + offset;
        let year = lin.div_euclid(PERIODS_PER_YEAR) as i32;
        let number = (lin.rem_euclid(PERIODS_PER_YEAR) + 1) as u32;
        let start_date = self.anchor.start + Duration::days(offset * PERIOD_DAYS);
        let end_date = start_date + Duration::days(PERIOD_DAYS - 1);
        RosterPeriod {
            code: RosterPeriod::code_for(number, year),
            number,
            year,
            start_date,
            end_date,
            status: PeriodStatus::Auto,
        }
    }

    /// Idempotent self-healing: makes sure every period of
    /// `[current_year, current_year + years_ahead]` exists in `periods`.
    /// Existing codes are left untouched (insert-on-conflict-ignore), so
    /// two concurrent callers never create duplicates from a consistent
    /// view. Returns the number of periods created.
    pub fn ensure_periods_exist(
        &self,
        periods: &mut Vec<RosterPeriod>,
        current_year: i32,
        years_ahead: u32,
    ) -> usize {
        let mut created = 0usize;
        for year in current_year..=current_year + years_ahead as i32 {
            for number in 1..=PERIODS_PER_YEAR as u32 {
                let code = RosterPeriod::code_for(number, year);
                if periods.iter().any(|p| p.code == code) {
                    continue;
                }
                periods.push(self.period_at(year, number));
                created += 1;
            }
        }
        periods.sort_by_key(|p| p.start_date);
        created
    }

    /// Closing deadline for request submission against `period`.
    pub fn submission_deadline(&self, period: &RosterPeriod, policy: StatusPolicy) -> NaiveDate {
        period.start_date - Duration::days(policy.deadline_days_before_start)
    }

    /// Status the period should carry when read on `today`.
    pub fn status_at(
        &self,
        period: &RosterPeriod,
        today: NaiveDate,
        policy: StatusPolicy,
    ) -> PeriodStatus {
        if today > period.end_date {
            return PeriodStatus::Archived;
        }
        if today > self.submission_deadline(period, policy) {
            return PeriodStatus::Locked;
        }
        if today >= period.start_date - Duration::days(policy.open_days_before_start) {
            return PeriodStatus::Open;
        }
        PeriodStatus::Auto
    }

    /// Re-evaluates the lifecycle of every period in place.
    pub fn refresh_statuses(
        &self,
        periods: &mut [RosterPeriod],
        today: NaiveDate,
        policy: StatusPolicy,
    ) {
        for period in periods.iter_mut() {
            period.status = self.status_at(period, today, policy);
        }
    }

    /// Next submission deadline on or after `today`, with its period.
    pub fn next_deadline<'a>(
        &self,
        periods: &'a [RosterPeriod],
        today: NaiveDate,
        policy: StatusPolicy,
    ) -> Option<(&'a RosterPeriod, NaiveDate)> {
        periods
            .iter()
            .map(|p| (p, self.submission_deadline(p, policy)))
            .filter(|(_, deadline)| *deadline >= today)
            .min_by_key(|(_, deadline)| *deadline)
    }
}
