use crate::config::EngineConfig;
use crate::model::{CrewSnapshot, Rank, Request, RequestId, RequestStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Eligibility outcome. A shortfall holds the request for manual review;
/// the engine never auto-denies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Approved,
    Held,
}

/// Structured reason, suitable for audit display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReasonCode {
    /// Minimum crew remains available after approval.
    SufficientCrew,
    /// Approval would breach the rank's minimum-crew threshold.
    CrewShortfall,
    /// Lost the seniority cut among simultaneous requests.
    OutrankedBySeniority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub request: RequestId,
    pub outcome: Outcome,
    pub reason: ReasonCode,
}

/// Informational alert: several pending requests of one rank compete for
/// overlapping dates. Independent of any approve/hold decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityAlert {
    pub rank: Rank,
    pub requests: Vec<RequestId>,
}

/// Single total order used for every seniority decision: lower seniority
/// number first, earlier submission breaking ties.
pub fn seniority_order(a: &Request, b: &Request) -> Ordering {
    a.seniority_number
        .cmp(&b.seniority_number)
        .then_with(|| a.submitted_at.cmp(&b.submitted_at))
}

/// Evaluates one pending request in isolation: approve iff the rank still
/// meets its minimum-crew threshold with this pilot away.
pub fn evaluate_request(
    request: &Request,
    snapshot: &CrewSnapshot,
    config: &EngineConfig,
) -> Decision {
    let available = snapshot.available(&request.rank);
    let threshold = config.min_crew(&request.rank);
    if available >= threshold + 1 {
        Decision {
            request: request.id.clone(),
            outcome: Outcome::Approved,
            reason: ReasonCode::SufficientCrew,
        }
    } else {
        Decision {
            request: request.id.clone(),
            outcome: Outcome::Held,
            reason: ReasonCode::CrewShortfall,
        }
    }
}

/// Evaluates a set of simultaneous competing requests.
///
/// Ranks never interact: each rank's group is decided against its own
/// snapshot count and threshold. Within a group of K, everyone is
/// approved when `available − K ≥ threshold`; otherwise exactly
/// `available − threshold` requests (at most) are approved in seniority
/// order and the remainder are held, not denied. Decisions come back in
/// input order.
pub fn evaluate_batch(
    requests: &[Request],
    snapshot: &CrewSnapshot,
    config: &EngineConfig,
) -> Vec<Decision> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, req) in requests.iter().enumerate() {
        groups
            .entry(req.rank.label().to_string())
            .or_default()
            .push(idx);
    }

    let mut decisions: Vec<Option<Decision>> = vec![None; requests.len()];
    for indexes in groups.values() {
        let rank = &requests[indexes[0]].rank;
        let available = snapshot.available(rank);
        let threshold = config.min_crew(rank);
        let slots = available.saturating_sub(threshold) as usize;

        if indexes.len() <= slots {
            for &idx in indexes {
                decisions[idx] = Some(Decision {
                    request: requests[idx].id.clone(),
                    outcome: Outcome::Approved,
                    reason: ReasonCode::SufficientCrew,
                });
            }
            continue;
        }

        let mut by_seniority = indexes.clone();
        by_seniority.sort_by(|&a, &b| seniority_order(&requests[a], &requests[b]));
        for (pos, &idx) in by_seniority.iter().enumerate() {
            decisions[idx] = Some(if pos < slots {
                Decision {
                    request: requests[idx].id.clone(),
                    outcome: Outcome::Approved,
                    reason: ReasonCode::SufficientCrew,
                }
            } else {
                Decision {
                    request: requests[idx].id.clone(),
                    outcome: Outcome::Held,
                    reason: if slots == 0 {
                        ReasonCode::CrewShortfall
                    } else {
                        ReasonCode::OutrankedBySeniority
                    },
                }
            });
        }
    }

    decisions.into_iter().flatten().collect()
}

/// One alert per rank whenever ≥2 pending requests of that rank target
/// overlapping dates.
pub fn pending_overlap_alerts(requests: &[Request]) -> Vec<EligibilityAlert> {
    let mut by_rank: BTreeMap<String, Vec<&Request>> = BTreeMap::new();
    for req in requests.iter().filter(|r| r.status == RequestStatus::Pending) {
        by_rank.entry(req.rank.label().to_string()).or_default().push(req);
    }

    let mut alerts = Vec::new();
    for group in by_rank.values() {
        let mut involved: Vec<RequestId> = Vec::new();
        for (i, a) in group.iter().enumerate() {
            let clashes = group
                .iter()
                .enumerate()
                .any(|(j, b)| i != j && a.range.overlaps(&b.range));
            if clashes {
                involved.push(a.id.clone());
            }
        }
        if involved.len() >= 2 {
            alerts.push(EligibilityAlert {
                rank: group[0].rank.clone(),
                requests: involved,
            });
        }
    }
    alerts
}

/// Advisory final-review trigger: unresolved pending requests exist and
/// the next submission deadline is exactly the configured number of days
/// away. Does not alter any decision.
pub fn final_review_due(
    pending_count: usize,
    today: NaiveDate,
    next_deadline: NaiveDate,
    config: &EngineConfig,
) -> bool {
    pending_count > 0 && (next_deadline - today).num_days() == config.final_review_days
}
