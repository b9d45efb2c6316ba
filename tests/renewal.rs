#![forbid(unsafe_code)]
use chrono::NaiveDate;
use crewroster::{
    compute_window, eligible_periods, generate_renewal_plan, priority_score, CategoryRule,
    Certification, EngineConfig, Fleet, PeriodCalendar, Pilot, PlanError, PlanOptions, PlanWarning,
    Rank,
};
use std::collections::HashMap;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn config_with(categories: &[(&str, u32, u32)], excluded: &[u32]) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.excluded_start_months = excluded.to_vec();
    for (name, grace, capacity) in categories {
        config.categories.insert(
            name.to_string(),
            CategoryRule {
                grace_days: *grace,
                capacity_per_period: *capacity,
            },
        );
    }
    config
}

fn fleet_with_periods(from_year: i32, years_ahead: u32) -> (Fleet, Pilot) {
    let mut fleet = Fleet::default();
    let cal = PeriodCalendar::default();
    cal.ensure_periods_exist(&mut fleet.periods, from_year, years_ahead);
    let pilot = Pilot::new("PX001", "Maurice Rondeau", Rank::Captain, 1);
    fleet.pilots.push(pilot.clone());
    (fleet, pilot)
}

#[test]
fn window_arithmetic() {
    let w = compute_window(d(2026, 1, 15), 90);
    assert_eq!(w.start, d(2025, 10, 17));
    assert_eq!(w.end, d(2026, 1, 15));
}

#[test]
fn priority_score_bands() {
    let today = d(2025, 6, 1);
    assert_eq!(priority_score(d(2025, 5, 31), today), 10); // expired
    assert_eq!(priority_score(today, today), 9);
    assert_eq!(priority_score(d(2025, 6, 15), today), 9);
    assert_eq!(priority_score(d(2025, 6, 16), today), 7);
    assert_eq!(priority_score(d(2025, 7, 1), today), 7);
    assert_eq!(priority_score(d(2025, 7, 31), today), 5);
    assert_eq!(priority_score(d(2025, 8, 30), today), 3);
    assert_eq!(priority_score(d(2025, 8, 31), today), 1);
}

#[test]
fn seasonal_exclusion_end_to_end() {
    // "Flight Checks", 90-day grace, expiring 2026-01-15:
    // window [2025-10-17, 2026-01-15]. Candidate periods RP13/2025,
    // RP01/2026 and RP02/2026 start inside the window; only RP13/2025
    // survives the December/January exclusion.
    let (mut fleet, pilot) = fleet_with_periods(2025, 1);

    let no_exclusion = config_with(&[("Flight Checks", 90, 10)], &[]);
    let window = compute_window(d(2026, 1, 15), 90);
    let raw: Vec<&str> = eligible_periods(&fleet.periods, &window, &no_exclusion)
        .iter()
        .map(|p| p.code.as_str())
        .collect();
    assert_eq!(raw, vec!["RP13/2025", "RP01/2026", "RP02/2026"]);

    let config = config_with(&[("Flight Checks", 90, 10)], &[12, 1]);
    let filtered: Vec<&str> = eligible_periods(&fleet.periods, &window, &config)
        .iter()
        .map(|p| p.code.as_str())
        .collect();
    assert_eq!(filtered, vec!["RP13/2025"]);

    fleet.certifications.push(Certification::new(
        pilot.id.clone(),
        "Flight Checks",
        d(2026, 1, 15),
    ));
    let run = generate_renewal_plan(
        &mut fleet,
        &config,
        d(2025, 10, 15),
        &PlanOptions::default(),
    )
    .unwrap();
    assert_eq!(run.summary.created, 1);
    assert_eq!(run.plans[0].assigned_period, "RP13/2025");
    assert!(!run.plans[0].capacity_warning);
}

#[test]
fn no_plan_starts_in_excluded_month() {
    let (mut fleet, pilot) = fleet_with_periods(2025, 2);
    let config = config_with(&[("Instrument Rating", 120, 3)], &[12, 1]);
    for month in [1, 2, 3, 6, 9, 11, 12] {
        fleet.certifications.push(Certification::new(
            pilot.id.clone(),
            "Instrument Rating",
            d(2026, month, 20),
        ));
    }

    let opts = PlanOptions {
        months_ahead: 18,
        ..PlanOptions::default()
    };
    let run = generate_renewal_plan(&mut fleet, &config, d(2025, 10, 1), &opts).unwrap();
    for plan in &run.plans {
        let period = fleet.find_period(&plan.assigned_period).unwrap();
        let month = period.start_month();
        assert!(month != 12 && month != 1, "plan assigned into {month}");
    }
}

#[test]
fn near_even_distribution() {
    // 12 same-category certifications, 3 eligible periods, no initial
    // load: counts must even out to 4/4/4.
    let (mut fleet, pilot) = fleet_with_periods(2025, 0);
    let config = config_with(&[("SIM", 84, 10)], &[]);
    for _ in 0..12 {
        fleet
            .certifications
            .push(Certification::new(pilot.id.clone(), "SIM", d(2025, 9, 1)));
    }

    let run = generate_renewal_plan(
        &mut fleet,
        &config,
        d(2025, 5, 1),
        &PlanOptions::default(),
    )
    .unwrap();
    assert_eq!(run.summary.created, 12);

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for plan in &run.plans {
        *counts.entry(plan.assigned_period.as_str()).or_insert(0) += 1;
    }
    // Window [2025-06-09, 2025-09-01] covers the starts of RP08, RP09
    // and RP10 of 2025.
    assert_eq!(counts.len(), 3);
    let max = counts.values().max().unwrap();
    let min = counts.values().min().unwrap();
    assert!(max - min <= 1);
}

#[test]
fn urgent_certifications_assigned_first() {
    let (mut fleet, pilot) = fleet_with_periods(2025, 0);
    fleet.periods.retain(|p| p.code == "RP08/2025" || p.code == "RP09/2025");
    let config = config_with(&[("SIM", 60, 1)], &[]);

    // Urgent: window [2025-04-26, 2025-06-25] reaches RP08 only.
    let urgent = Certification::new(pilot.id.clone(), "SIM", d(2025, 6, 25));
    // Relaxed: window [2025-06-11, 2025-08-10] reaches RP08 and RP09.
    let relaxed = Certification::new(pilot.id.clone(), "SIM", d(2025, 8, 10));
    fleet.certifications.push(relaxed.clone());
    fleet.certifications.push(urgent.clone());

    let run = generate_renewal_plan(
        &mut fleet,
        &config,
        d(2025, 6, 10),
        &PlanOptions::default(),
    )
    .unwrap();
    assert_eq!(run.summary.created, 2);
    assert!(run.warnings.is_empty());

    let assigned: HashMap<&str, &str> = run
        .plans
        .iter()
        .map(|p| (p.certification.as_str(), p.assigned_period.as_str()))
        .collect();
    // The urgent one takes the only period it can; the relaxed one is
    // steered to the empty period instead of stacking on RP08.
    assert_eq!(assigned[urgent.id.as_str()], "RP08/2025");
    assert_eq!(assigned[relaxed.id.as_str()], "RP09/2025");
}

#[test]
fn capacity_is_advisory() {
    let (mut fleet, pilot) = fleet_with_periods(2025, 0);
    let config = config_with(&[("MED", 30, 1)], &[]);
    for _ in 0..3 {
        fleet
            .certifications
            .push(Certification::new(pilot.id.clone(), "MED", d(2025, 9, 1)));
    }

    // Window [2025-08-02, 2025-09-01] only reaches RP10/2025.
    let run = generate_renewal_plan(
        &mut fleet,
        &config,
        d(2025, 7, 1),
        &PlanOptions::default(),
    )
    .unwrap();
    assert_eq!(run.summary.created, 3);
    assert_eq!(run.summary.skipped, 0);
    assert_eq!(run.summary.warned, 2);
    assert_eq!(
        run.plans.iter().filter(|p| p.capacity_warning).count(),
        2
    );
    assert!(run
        .warnings
        .iter()
        .all(|w| matches!(w, PlanWarning::CapacityExceeded { .. })));
}

#[test]
fn no_eligible_period_is_non_fatal() {
    let (mut fleet, pilot) = fleet_with_periods(2025, 0);
    let config = config_with(&[("MED", 5, 2)], &[]);
    // Window [2025-08-31, 2025-09-05] contains no period start.
    fleet
        .certifications
        .push(Certification::new(pilot.id.clone(), "MED", d(2025, 9, 5)));

    let run = generate_renewal_plan(
        &mut fleet,
        &config,
        d(2025, 8, 1),
        &PlanOptions::default(),
    )
    .unwrap();
    assert_eq!(run.summary.created, 0);
    assert_eq!(run.summary.skipped, 1);
    assert!(matches!(
        run.warnings[0],
        PlanWarning::NoEligiblePeriod { .. }
    ));
    assert!(fleet.plans.is_empty());
}

#[test]
fn unknown_category_rejected_before_computation() {
    let (mut fleet, pilot) = fleet_with_periods(2025, 0);
    let config = config_with(&[("SIM", 60, 2)], &[]);
    fleet
        .certifications
        .push(Certification::new(pilot.id.clone(), "Route Check", d(2025, 9, 1)));

    let err = generate_renewal_plan(
        &mut fleet,
        &config,
        d(2025, 7, 1),
        &PlanOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PlanError::UnknownCategory(name) if name == "Route Check"));
}

#[test]
fn zero_grace_categories_are_out_of_scope() {
    let (mut fleet, pilot) = fleet_with_periods(2025, 0);
    let config = config_with(&[("LINE", 0, 2)], &[]);
    fleet
        .certifications
        .push(Certification::new(pilot.id.clone(), "LINE", d(2025, 9, 1)));

    let run = generate_renewal_plan(
        &mut fleet,
        &config,
        d(2025, 7, 1),
        &PlanOptions::default(),
    )
    .unwrap();
    assert_eq!(run.summary.created, 0);
    assert_eq!(run.summary.skipped, 0);
    assert!(run.plans.is_empty());
}

#[test]
fn horizon_filters_far_expiries() {
    let (mut fleet, pilot) = fleet_with_periods(2025, 1);
    let config = config_with(&[("SIM", 60, 2)], &[]);
    fleet
        .certifications
        .push(Certification::new(pilot.id.clone(), "SIM", d(2026, 6, 1)));

    let run = generate_renewal_plan(
        &mut fleet,
        &config,
        d(2025, 5, 1),
        &PlanOptions::default(), // 6 months: horizon ends 2025-11-01
    )
    .unwrap();
    assert_eq!(run.summary.created, 0);
    assert!(run.plans.is_empty());
}

#[test]
fn zero_month_horizon_is_rejected() {
    let (mut fleet, _) = fleet_with_periods(2025, 0);
    let config = config_with(&[("SIM", 60, 2)], &[]);
    let opts = PlanOptions {
        months_ahead: 0,
        ..PlanOptions::default()
    };
    let err = generate_renewal_plan(&mut fleet, &config, d(2025, 5, 1), &opts).unwrap_err();
    assert!(matches!(err, PlanError::InvalidHorizon));
}

#[test]
fn rerun_keeps_one_plan_per_certification() {
    let (mut fleet, pilot) = fleet_with_periods(2025, 0);
    let config = config_with(&[("SIM", 84, 10)], &[]);
    for _ in 0..6 {
        fleet
            .certifications
            .push(Certification::new(pilot.id.clone(), "SIM", d(2025, 9, 1)));
    }

    let first = generate_renewal_plan(
        &mut fleet,
        &config,
        d(2025, 5, 1),
        &PlanOptions::default(),
    )
    .unwrap();
    assert_eq!(first.summary.created, 6);
    assert_eq!(fleet.plans.len(), 6);

    // Incremental rerun replaces, never duplicates.
    let second = generate_renewal_plan(
        &mut fleet,
        &config,
        d(2025, 5, 1),
        &PlanOptions::default(),
    )
    .unwrap();
    assert_eq!(second.summary.created, 6);
    assert_eq!(fleet.plans.len(), 6);

    // Full regeneration from scratch lands at the same shape.
    let opts = PlanOptions {
        clear_existing: true,
        ..PlanOptions::default()
    };
    let third = generate_renewal_plan(&mut fleet, &config, d(2025, 5, 1), &opts).unwrap();
    assert_eq!(third.summary.created, 6);
    assert_eq!(fleet.plans.len(), 6);

    let mut certs: Vec<&str> = fleet.plans.iter().map(|p| p.certification.as_str()).collect();
    certs.sort_unstable();
    certs.dedup();
    assert_eq!(certs.len(), 6);
}

#[test]
fn category_filter_limits_scope() {
    let (mut fleet, pilot) = fleet_with_periods(2025, 0);
    let config = config_with(&[("SIM", 84, 10), ("MED", 84, 10)], &[]);
    fleet
        .certifications
        .push(Certification::new(pilot.id.clone(), "SIM", d(2025, 9, 1)));
    fleet
        .certifications
        .push(Certification::new(pilot.id.clone(), "MED", d(2025, 9, 1)));

    let opts = PlanOptions {
        categories: Some(vec!["SIM".to_string()]),
        ..PlanOptions::default()
    };
    let run = generate_renewal_plan(&mut fleet, &config, d(2025, 5, 1), &opts).unwrap();
    assert_eq!(run.summary.created, 1);
    assert!(run.plans.iter().all(|p| p.category == "SIM"));

    let opts = PlanOptions {
        categories: Some(vec!["Dangerous Goods".to_string()]),
        ..PlanOptions::default()
    };
    let err = generate_renewal_plan(&mut fleet, &config, d(2025, 5, 1), &opts).unwrap_err();
    assert!(matches!(err, PlanError::UnknownCategory(_)));
}
