#![forbid(unsafe_code)]
use chrono::{NaiveDate, TimeZone, Utc};
use crewroster::{
    evaluate_batch, evaluate_request, leave, notification::TextReminder, prepare_final_review,
    CrewSnapshot, DateRange, EngineConfig, Fleet, Outcome, PeriodCalendar, Pilot, PilotId, Rank,
    ReasonCode, Request, RequestKind,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).unwrap()
}

fn request(pilot: &str, rank: Rank, seniority: u32, submitted_hour: u32) -> Request {
    Request::new(
        PilotId::new(pilot),
        rank,
        RequestKind::Leave,
        range(d(2025, 12, 10), d(2025, 12, 20)),
        seniority,
        Utc.with_ymd_and_hms(2025, 11, 1, submitted_hour, 0, 0).unwrap(),
    )
}

fn config_with_thresholds(captain: u32, first_officer: u32) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.min_crew.insert("captain".to_string(), captain);
    config.min_crew.insert("first_officer".to_string(), first_officer);
    config
}

#[test]
fn solo_request_approved_iff_threshold_holds() {
    let config = config_with_thresholds(10, 10);
    let req = request("P1", Rank::Captain, 5, 8);

    let snapshot = CrewSnapshot::from_counts([(Rank::Captain, 11)]);
    let decision = evaluate_request(&req, &snapshot, &config);
    assert_eq!(decision.outcome, Outcome::Approved);
    assert_eq!(decision.reason, ReasonCode::SufficientCrew);

    // 10 − 1 < 10: held for manual review, never silently denied.
    let snapshot = CrewSnapshot::from_counts([(Rank::Captain, 10)]);
    let decision = evaluate_request(&req, &snapshot, &config);
    assert_eq!(decision.outcome, Outcome::Held);
    assert_eq!(decision.reason, ReasonCode::CrewShortfall);
}

#[test]
fn eleven_captains_one_seat() {
    // 11 active captains, threshold 10: only the most senior of two
    // simultaneous requests is approved.
    let config = config_with_thresholds(10, 10);
    let snapshot = CrewSnapshot::from_counts([(Rank::Captain, 11)]);
    let senior = request("P1", Rank::Captain, 3, 8);
    let junior = request("P2", Rank::Captain, 7, 8);

    let decisions = evaluate_batch(&[senior.clone(), junior.clone()], &snapshot, &config);
    assert_eq!(decisions[0].outcome, Outcome::Approved);
    assert_eq!(decisions[1].outcome, Outcome::Held);
    assert_eq!(decisions[1].reason, ReasonCode::OutrankedBySeniority);
}

#[test]
fn batch_all_approved_when_crew_allows() {
    let config = config_with_thresholds(10, 10);
    let snapshot = CrewSnapshot::from_counts([(Rank::Captain, 14)]);
    let requests = vec![
        request("P1", Rank::Captain, 4, 8),
        request("P2", Rank::Captain, 9, 8),
        request("P3", Rank::Captain, 2, 8),
    ];
    let decisions = evaluate_batch(&requests, &snapshot, &config);
    assert!(decisions.iter().all(|d| d.outcome == Outcome::Approved));
}

#[test]
fn batch_seniority_cut() {
    // 12 available, threshold 10: exactly two approvals, by seniority.
    let config = config_with_thresholds(10, 10);
    let snapshot = CrewSnapshot::from_counts([(Rank::Captain, 12)]);
    let requests = vec![
        request("P1", Rank::Captain, 5, 8),
        request("P2", Rank::Captain, 3, 8),
        request("P3", Rank::Captain, 8, 8),
        request("P4", Rank::Captain, 1, 8),
    ];
    let decisions = evaluate_batch(&requests, &snapshot, &config);
    assert_eq!(decisions[0].outcome, Outcome::Held);
    assert_eq!(decisions[1].outcome, Outcome::Approved);
    assert_eq!(decisions[2].outcome, Outcome::Held);
    assert_eq!(decisions[3].outcome, Outcome::Approved);
}

#[test]
fn submitted_at_breaks_seniority_ties() {
    let config = config_with_thresholds(10, 10);
    let snapshot = CrewSnapshot::from_counts([(Rank::Captain, 11)]);
    let early = request("P1", Rank::Captain, 6, 8);
    let late = request("P2", Rank::Captain, 6, 9);

    let decisions = evaluate_batch(&[late.clone(), early.clone()], &snapshot, &config);
    assert_eq!(decisions[0].outcome, Outcome::Held);
    assert_eq!(decisions[1].outcome, Outcome::Approved);
}

#[test]
fn ranks_evaluated_independently() {
    let config = config_with_thresholds(10, 10);
    let snapshot =
        CrewSnapshot::from_counts([(Rank::Captain, 11), (Rank::FirstOfficer, 20)]);
    let requests = vec![
        request("C1", Rank::Captain, 2, 8),
        request("C2", Rank::Captain, 4, 8),
        request("F1", Rank::FirstOfficer, 30, 8),
        request("F2", Rank::FirstOfficer, 31, 8),
    ];
    let decisions = evaluate_batch(&requests, &snapshot, &config);
    // Captain pressure never spills into the first-officer pool.
    assert_eq!(decisions[0].outcome, Outcome::Approved);
    assert_eq!(decisions[1].outcome, Outcome::Held);
    assert_eq!(decisions[2].outcome, Outcome::Approved);
    assert_eq!(decisions[3].outcome, Outcome::Approved);
}

#[test]
fn overlap_alert_for_competing_pending_requests() {
    let a = request("P1", Rank::Captain, 3, 8);
    let b = request("P2", Rank::Captain, 5, 8);
    let mut c = request("P3", Rank::FirstOfficer, 9, 8);
    c.range = range(d(2026, 2, 1), d(2026, 2, 5)); // no captain overlap

    let alerts = leave::pending_overlap_alerts(&[a.clone(), b.clone(), c]);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].rank, Rank::Captain);
    assert_eq!(alerts[0].requests.len(), 2);
}

#[test]
fn no_alert_without_overlap() {
    let a = request("P1", Rank::Captain, 3, 8);
    let mut b = request("P2", Rank::Captain, 5, 8);
    b.range = range(d(2026, 2, 1), d(2026, 2, 5));
    assert!(leave::pending_overlap_alerts(&[a, b]).is_empty());
}

#[test]
fn final_review_fires_exactly_on_offset() {
    let config = EngineConfig::default(); // 22 days
    let deadline = d(2025, 9, 20);
    assert!(leave::final_review_due(3, d(2025, 8, 29), deadline, &config));
    assert!(!leave::final_review_due(0, d(2025, 8, 29), deadline, &config));
    assert!(!leave::final_review_due(3, d(2025, 8, 30), deadline, &config));
    assert!(!leave::final_review_due(3, d(2025, 8, 28), deadline, &config));
}

#[test]
fn final_review_reminder_prepared_from_fleet() {
    let config = EngineConfig::default();
    let cal = PeriodCalendar::default();
    let mut fleet = Fleet::default();
    cal.ensure_periods_exist(&mut fleet.periods, 2025, 0);
    fleet.pilots.push(Pilot::new("P1", "Alice", Rank::Captain, 1));
    fleet.requests.push(request("P1", Rank::Captain, 1, 8));

    // RP12/2025 deadline is 2025-09-20; 22 days before is 2025-08-29.
    let reminder =
        prepare_final_review(&fleet, &cal, &config, d(2025, 8, 29), &TextReminder).unwrap();
    assert_eq!(reminder.period_code, "RP12/2025");
    assert_eq!(reminder.deadline, d(2025, 9, 20));
    assert_eq!(reminder.pending, 1);
    assert!(reminder.content.contains("RP12/2025"));

    // Any other day: nothing to send.
    assert!(prepare_final_review(&fleet, &cal, &config, d(2025, 8, 30), &TextReminder).is_none());
}
