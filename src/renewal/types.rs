use crate::model::{CertificationId, RenewalPlan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options for one planning run.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Look-ahead horizon in calendar months.
    pub months_ahead: u32,
    /// Restrict the run to these categories; `None` means all configured.
    pub categories: Option<Vec<String>>,
    /// `true`: discard existing plans in scope and reassign from scratch.
    /// `false`: incremental — existing plans keep their period load.
    pub clear_existing: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            months_ahead: 6,
            categories: None,
            clear_existing: false,
        }
    }
}

/// Non-fatal per-certification outcome, collected and reported, never
/// thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanWarning {
    /// Every candidate period fell outside the window or was seasonally
    /// excluded; the certification was skipped.
    NoEligiblePeriod {
        certification: CertificationId,
        category: String,
    },
    /// Assignment proceeded past the category's soft capacity.
    CapacityExceeded {
        certification: CertificationId,
        category: String,
        period: String,
        load: u32,
        capacity: u32,
    },
}

/// Run-level tally: every certification in scope lands in exactly one of
/// created or skipped; warned counts plans carrying a capacity warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub created: usize,
    pub skipped: usize,
    pub warned: usize,
}

/// Full result of one planning run.
#[derive(Debug, Clone, Default)]
pub struct PlanRun {
    pub summary: RunSummary,
    pub plans: Vec<RenewalPlan>,
    pub warnings: Vec<PlanWarning>,
}

/// Fatal planning errors, rejected before any assignment happens.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("unknown certification category: {0}")]
    UnknownCategory(String),
    #[error("planning horizon must be at least one month")]
    InvalidHorizon,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
