mod balancer;
mod types;
mod window;

pub use balancer::priority_score;
pub use types::{PlanError, PlanOptions, PlanRun, PlanWarning, RunSummary};
pub use window::{compute_window, eligible_periods, RenewalWindow};

use crate::config::EngineConfig;
use crate::model::{Certification, CertificationId, Fleet};
use balancer::LoadMap;
use chrono::{Months, NaiveDate};
use std::collections::HashSet;

/// One renewal-planning run over the fleet.
///
/// Best effort, fully reported: every certification in scope ends up in
/// the summary as created or skipped; soft-capacity overruns warn and
/// proceed. Fatal input problems (unknown category, zero horizon) reject
/// the run before any plan is touched. The per-run load accumulator lives
/// on this call's stack; callers running concurrent generations must
/// serialize them externally.
pub fn generate_renewal_plan(
    fleet: &mut Fleet,
    config: &EngineConfig,
    today: NaiveDate,
    opts: &PlanOptions,
) -> Result<PlanRun, PlanError> {
    if opts.months_ahead == 0 {
        return Err(PlanError::InvalidHorizon);
    }
    if let Some(filter) = &opts.categories {
        for name in filter {
            if config.category(name).is_none() {
                return Err(PlanError::UnknownCategory(name.clone()));
            }
        }
    }

    let horizon_end = today
        .checked_add_months(Months::new(opts.months_ahead))
        .unwrap_or(NaiveDate::MAX);

    let in_scope = |category: &str| match &opts.categories {
        Some(filter) => filter.iter().any(|c| c == category),
        None => true,
    };

    // Validate before computing: a certification with an unconfigured
    // category is a data error, not a skippable item.
    let mut certs: Vec<&Certification> = Vec::new();
    for cert in fleet.certifications.iter().filter(|c| in_scope(&c.category)) {
        let rule = config
            .category(&cert.category)
            .ok_or_else(|| PlanError::UnknownCategory(cert.category.clone()))?;
        // Zero-grace categories are renewed on/after expiry through a
        // separate, unplanned path.
        if rule.grace_days == 0 {
            continue;
        }
        if cert.expiry_date <= horizon_end {
            certs.push(cert);
        }
    }

    let replanned: HashSet<CertificationId> = certs.iter().map(|c| c.id.clone()).collect();
    if opts.clear_existing {
        fleet.plans.retain(|p| !in_scope(&p.category));
    } else {
        // Incremental: one plan per certification, so a replanned
        // certification drops its previous assignment.
        fleet.plans.retain(|p| !replanned.contains(&p.certification));
    }

    // Seed the accumulator with the load of every surviving plan.
    let mut load: LoadMap = LoadMap::new();
    for plan in &fleet.plans {
        *load
            .entry((plan.assigned_period.clone(), plan.category.clone()))
            .or_insert(0) += 1;
    }

    let (plans, warnings, summary) =
        balancer::assign(&certs, &fleet.periods, config, today, &mut load);

    #[cfg(feature = "logging")]
    tracing::info!(
        created = summary.created,
        skipped = summary.skipped,
        warned = summary.warned,
        "renewal planning run finished"
    );

    fleet.plans.extend(plans.iter().cloned());

    Ok(PlanRun {
        summary,
        plans,
        warnings,
    })
}
