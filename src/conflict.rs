use crate::config::EngineConfig;
use crate::model::{CrewSnapshot, Request, RequestId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Same pilot already has a live request overlapping the proposed
    /// dates.
    OverlappingRequest,
    /// An existing request matches pilot, exact dates and type.
    DuplicateRequest,
    /// Other pilots of the same rank have pending requests over the same
    /// dates.
    MultiplePending,
    /// Approving the proposed request would breach the rank's
    /// minimum-crew threshold.
    CrewBelowMinimum,
}

/// One detected conflict; `related` points at the requests involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub severity: Severity,
    pub related: Vec<RequestId>,
    pub detail: String,
}

/// Read-only check of a proposed request against the current snapshot.
///
/// Every applicable conflict is returned, never short-circuited; an empty
/// list means no conflicts. The caller decides which severities block
/// submission.
pub fn check_conflicts(
    proposed: &Request,
    existing: &[Request],
    snapshot: &CrewSnapshot,
    config: &EngineConfig,
) -> Vec<Conflict> {
    let mut out = Vec::new();

    for req in existing.iter().filter(|e| e.id != proposed.id) {
        if req.pilot != proposed.pilot || !req.status.is_live() {
            continue;
        }
        if req.range == proposed.range && req.kind == proposed.kind {
            out.push(Conflict {
                kind: ConflictKind::DuplicateRequest,
                severity: Severity::High,
                related: vec![req.id.clone()],
                detail: format!(
                    "identical request already on file for {} .. {}",
                    req.range.start, req.range.end
                ),
            });
        }
        if req.range.overlaps(&proposed.range) {
            out.push(Conflict {
                kind: ConflictKind::OverlappingRequest,
                severity: Severity::Medium,
                related: vec![req.id.clone()],
                detail: format!(
                    "pilot already has a request covering {} .. {}",
                    req.range.start, req.range.end
                ),
            });
        }
    }

    let available = snapshot.available(&proposed.rank);
    let threshold = config.min_crew(&proposed.rank);

    let mut competing: Vec<RequestId> = Vec::new();
    let mut pilots: BTreeSet<&str> = BTreeSet::new();
    for req in existing.iter().filter(|e| e.id != proposed.id) {
        if req.pilot == proposed.pilot
            || req.rank != proposed.rank
            || req.status != crate::model::RequestStatus::Pending
            || !req.range.overlaps(&proposed.range)
        {
            continue;
        }
        pilots.insert(req.pilot.as_str());
        competing.push(req.id.clone());
    }
    if !pilots.is_empty() {
        // Including the proposer, at least two pilots of this rank now
        // target overlapping dates.
        let near_threshold = available.saturating_sub(threshold) <= 1;
        out.push(Conflict {
            kind: ConflictKind::MultiplePending,
            severity: if near_threshold {
                Severity::Medium
            } else {
                Severity::Low
            },
            related: competing,
            detail: format!(
                "{} other {} pilot(s) have pending requests over these dates",
                pilots.len(),
                proposed.rank.label()
            ),
        });
    }

    if available < threshold + 1 {
        out.push(Conflict {
            kind: ConflictKind::CrewBelowMinimum,
            severity: Severity::Critical,
            related: Vec::new(),
            detail: format!(
                "approval would leave {} {} available, below minimum {}",
                available.saturating_sub(1),
                proposed.rank.label(),
                threshold
            ),
        });
    }

    out
}
