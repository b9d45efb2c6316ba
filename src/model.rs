use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::calendar::RosterPeriod;

/// Strong identifier for a pilot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PilotId(String);

impl PilotId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Strong identifier for a certification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CertificationId(String);

impl CertificationId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Strong identifier for a leave/flight request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Crew rank. Ranks are evaluated independently of each other everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Captain,
    FirstOfficer,
    Custom(String),
}

impl Rank {
    /// Stable label, used as configuration key and in CSV/CLI output.
    pub fn label(&self) -> &str {
        match self {
            Rank::Captain => "captain",
            Rank::FirstOfficer => "first_officer",
            Rank::Custom(s) => s.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "captain" | "cpt" => Rank::Captain,
            "first_officer" | "fo" => Rank::FirstOfficer,
            other => Rank::Custom(other.to_string()),
        }
    }
}

/// Pilot record (roster member).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    pub id: PilotId,
    /// Short employee code, unique within the fleet (e.g. "PX042").
    pub code: String,
    pub display_name: String,
    pub rank: Rank,
    /// Unique per pilot; lower value = more senior.
    pub seniority_number: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Pilot {
    pub fn new<C: Into<String>, D: Into<String>>(
        code: C,
        display_name: D,
        rank: Rank,
        seniority_number: u32,
    ) -> Self {
        Self {
            id: PilotId::random(),
            code: code.into(),
            display_name: display_name.into(),
            rank,
            seniority_number,
            active: true,
        }
    }
}

/// Pilot certification. The category string keys into the per-category
/// configuration (grace period, soft capacity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    pub id: CertificationId,
    pub pilot: PilotId,
    pub category: String,
    pub expiry_date: NaiveDate,
}

impl Certification {
    pub fn new<C: Into<String>>(pilot: PilotId, category: C, expiry_date: NaiveDate) -> Self {
        Self {
            id: CertificationId::random(),
            pilot,
            category: category.into(),
            expiry_date,
        }
    }
}

/// Inclusive day range [start, end].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err("range end must not be before start".to_string());
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Leave,
    Flight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Denied,
    Withdrawn,
}

impl RequestStatus {
    /// Denied and withdrawn requests no longer count against anything.
    pub fn is_live(self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Approved)
    }
}

/// Leave or flight request. Requests are never deleted (audit trail);
/// only their status changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub pilot: PilotId,
    pub rank: Rank,
    pub kind: RequestKind,
    pub range: DateRange,
    pub status: RequestStatus,
    /// Inherited from the pilot at submission time.
    pub seniority_number: u32,
    pub submitted_at: DateTime<Utc>,
}

impl Request {
    pub fn new(
        pilot: PilotId,
        rank: Rank,
        kind: RequestKind,
        range: DateRange,
        seniority_number: u32,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RequestId::random(),
            pilot,
            rank,
            kind,
            range,
            status: RequestStatus::Pending,
            seniority_number,
            submitted_at,
        }
    }
}

/// One planned certification renewal, produced by a planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalPlan {
    pub certification: CertificationId,
    pub pilot: PilotId,
    pub category: String,
    pub assigned_period: String,
    /// 0..=10, from days-until-expiry.
    pub priority_score: u8,
    /// Set when the assignment pushed the period past its soft capacity.
    pub capacity_warning: bool,
}

/// Per-rank availability for a date range: active pilots minus pilots with
/// an approved absence overlapping the range. Computed on demand, never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrewSnapshot {
    counts: BTreeMap<String, u32>,
}

impl CrewSnapshot {
    /// Builds the snapshot from the fleet's pilots and approved requests.
    /// A pilot with several approved absences in the range is subtracted once.
    pub fn for_range(fleet: &Fleet, range: &DateRange) -> Self {
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for pilot in fleet.pilots.iter().filter(|p| p.active) {
            let absent = fleet.requests.iter().any(|r| {
                r.pilot == pilot.id
                    && r.status == RequestStatus::Approved
                    && r.range.overlaps(range)
            });
            if !absent {
                *counts.entry(pilot.rank.label().to_string()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// Snapshot from explicit per-rank counts, for callers that already
    /// hold aggregated numbers.
    pub fn from_counts<I: IntoIterator<Item = (Rank, u32)>>(counts: I) -> Self {
        Self {
            counts: counts
                .into_iter()
                .map(|(rank, n)| (rank.label().to_string(), n))
                .collect(),
        }
    }

    pub fn available(&self, rank: &Rank) -> u32 {
        self.counts.get(rank.label()).copied().unwrap_or(0)
    }
}

/// Complete dataset: pilots, certifications, requests, roster periods and
/// the current renewal plans.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Fleet {
    pub pilots: Vec<Pilot>,
    pub certifications: Vec<Certification>,
    pub requests: Vec<Request>,
    #[serde(default)]
    pub periods: Vec<RosterPeriod>,
    #[serde(default)]
    pub plans: Vec<RenewalPlan>,
}

impl Fleet {
    pub fn find_pilot_by_code<'a>(&'a self, code: &str) -> Option<&'a Pilot> {
        self.pilots.iter().find(|p| p.code == code)
    }
    pub fn find_pilot_by_id<'a>(&'a self, id: &PilotId) -> Option<&'a Pilot> {
        self.pilots.iter().find(|p| &p.id == id)
    }
    pub fn find_request<'a>(&'a self, id: &RequestId) -> Option<&'a Request> {
        self.requests.iter().find(|r| &r.id == id)
    }
    pub fn find_request_mut(&mut self, id: &RequestId) -> Option<&mut Request> {
        self.requests.iter_mut().find(|r| &r.id == id)
    }
    pub fn find_period<'a>(&'a self, code: &str) -> Option<&'a RosterPeriod> {
        self.periods.iter().find(|p| p.code == code)
    }
    pub fn pending_requests(&self) -> impl Iterator<Item = &Request> {
        self.requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
    }
}
