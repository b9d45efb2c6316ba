#![forbid(unsafe_code)]
//! Crewroster — aircrew scheduling and eligibility engine (no database).
//!
//! - 28-day roster-period calendar with year rollover and a lazily
//!   evaluated status lifecycle.
//! - Certification-renewal planner: grace windows, seasonal exclusion,
//!   priority scoring, greedy load balancing under soft capacity.
//! - Rank-separated leave eligibility with minimum-crew guarantees and
//!   seniority tie-breaking; stateless conflict detection.
//! - File storage (JSON/CSV). All calendar functions take the reference
//!   date explicitly; nothing reads the wall clock inside the engine.

pub mod calendar;
pub mod config;
pub mod conflict;
pub mod io;
pub mod leave;
pub mod model;
pub mod notification;
pub mod renewal;
pub mod storage;

pub use calendar::{PeriodAnchor, PeriodCalendar, PeriodStatus, RosterPeriod, StatusPolicy};
pub use config::{load_config_from_file, CategoryRule, EngineConfig};
pub use conflict::{check_conflicts, Conflict, ConflictKind, Severity};
pub use leave::{
    evaluate_batch, evaluate_request, pending_overlap_alerts, seniority_order, Decision,
    EligibilityAlert, Outcome, ReasonCode,
};
pub use model::{
    Certification, CertificationId, CrewSnapshot, DateRange, Fleet, Pilot, PilotId, Rank,
    RenewalPlan, Request, RequestId, RequestKind, RequestStatus,
};
pub use notification::{prepare_final_review, Reminder, ReminderRenderer, TextReminder};
pub use renewal::{
    compute_window, eligible_periods, generate_renewal_plan, priority_score, PlanError,
    PlanOptions, PlanRun, PlanWarning, RenewalWindow, RunSummary,
};
pub use storage::{JsonStorage, Storage};
