use crate::calendar::RosterPeriod;
use crate::config::EngineConfig;
use chrono::{Duration, NaiveDate};

/// Inclusive renewal window [expiry − grace, expiry].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub fn compute_window(expiry_date: NaiveDate, grace_days: u32) -> RenewalWindow {
    RenewalWindow {
        start: expiry_date - Duration::days(i64::from(grace_days)),
        end: expiry_date,
    }
}

/// Periods usable for a renewal, ascending by start date.
///
/// A period is eligible when it starts inside the window (a renewal can
/// only be rostered into a period that begins after the grace window
/// opens and before expiry) and its start month is not seasonally
/// excluded. An empty result is a normal outcome; the planner records a
/// warning and moves on.
pub fn eligible_periods<'a>(
    periods: &'a [RosterPeriod],
    window: &RenewalWindow,
    config: &EngineConfig,
) -> Vec<&'a RosterPeriod> {
    let mut out: Vec<&RosterPeriod> = periods
        .iter()
        .filter(|p| window.start <= p.start_date && p.start_date <= window.end)
        .filter(|p| !config.month_excluded(p.start_month()))
        .collect();
    out.sort_by_key(|p| p.start_date);
    out
}
