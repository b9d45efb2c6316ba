use super::types::{PlanWarning, RunSummary};
use super::window;
use crate::calendar::RosterPeriod;
use crate::config::EngineConfig;
use crate::model::{Certification, RenewalPlan};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Per-run assignment counts, keyed by (period code, category). Scoped to
/// one generation invocation; never shared or persisted.
pub(super) type LoadMap = HashMap<(String, String), u32>;

/// Urgency score from days until expiry. Expired certifications score 10
/// and are assigned first.
pub fn priority_score(expiry_date: NaiveDate, today: NaiveDate) -> u8 {
    let days = (expiry_date - today).num_days();
    if days < 0 {
        10
    } else if days <= 14 {
        9
    } else if days <= 30 {
        7
    } else if days <= 60 {
        5
    } else if days <= 90 {
        3
    } else {
        1
    }
}

/// Greedy min-load assignment over pre-validated certifications.
///
/// `certs` must already be restricted to grace-eligible categories in
/// scope; `load` carries counts from plans that survive this run (empty
/// for a full regeneration). Most urgent first, so capacity pressure
/// never starves an urgent renewal; ties pick the least-loaded eligible
/// period, then the earliest start.
pub(super) fn assign(
    certs: &[&Certification],
    periods: &[RosterPeriod],
    config: &EngineConfig,
    today: NaiveDate,
    load: &mut LoadMap,
) -> (Vec<RenewalPlan>, Vec<PlanWarning>, RunSummary) {
    let mut ordered: Vec<(u8, &Certification)> = certs
        .iter()
        .map(|c| (priority_score(c.expiry_date, today), *c))
        .collect();
    ordered.sort_by(|(pa, a), (pb, b)| {
        pb.cmp(pa)
            .then_with(|| a.expiry_date.cmp(&b.expiry_date))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut plans = Vec::new();
    let mut warnings = Vec::new();
    let mut summary = RunSummary::default();

    for (score, cert) in ordered {
        let rule = match config.category(&cert.category) {
            Some(rule) => rule,
            // Scope validation happens before assignment; this arm only
            // protects against a caller bypassing the facade.
            None => continue,
        };
        let win = window::compute_window(cert.expiry_date, rule.grace_days);
        let eligible = window::eligible_periods(periods, &win, config);
        let Some(chosen) = eligible.iter().min_by_key(|p| {
            let count = load
                .get(&(p.code.clone(), cert.category.clone()))
                .copied()
                .unwrap_or(0);
            (count, p.start_date)
        }) else {
            #[cfg(feature = "logging")]
            tracing::warn!(
                certification = cert.id.as_str(),
                category = %cert.category,
                "no eligible period, skipping"
            );
            warnings.push(PlanWarning::NoEligiblePeriod {
                certification: cert.id.clone(),
                category: cert.category.clone(),
            });
            summary.skipped += 1;
            continue;
        };

        let key = (chosen.code.clone(), cert.category.clone());
        let count = load.entry(key).or_insert(0);
        *count += 1;
        let over_capacity = *count > rule.capacity_per_period;
        if over_capacity {
            #[cfg(feature = "logging")]
            tracing::warn!(
                certification = cert.id.as_str(),
                period = %chosen.code,
                load = *count,
                capacity = rule.capacity_per_period,
                "soft capacity exceeded"
            );
            warnings.push(PlanWarning::CapacityExceeded {
                certification: cert.id.clone(),
                category: cert.category.clone(),
                period: chosen.code.clone(),
                load: *count,
                capacity: rule.capacity_per_period,
            });
            summary.warned += 1;
        }

        plans.push(RenewalPlan {
            certification: cert.id.clone(),
            pilot: cert.pilot.clone(),
            category: cert.category.clone(),
            assigned_period: chosen.code.clone(),
            priority_score: score,
            capacity_warning: over_capacity,
        });
        summary.created += 1;
    }

    (plans, warnings, summary)
}
