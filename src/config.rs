use crate::calendar::StatusPolicy;
use crate::model::Rank;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Per-category planning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Days before expiry during which renewal may be advance-scheduled.
    /// Zero means the category is renewed on/after expiry, outside the
    /// planner.
    pub grace_days: u32,
    /// Advisory maximum renewals of this category per roster period.
    /// Exceeding it warns, never blocks.
    pub capacity_per_period: u32,
}

/// Engine configuration, loaded from a JSON file or built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Certification categories, keyed by name.
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryRule>,
    /// Minimum crew per rank label that must remain available after any
    /// leave approval.
    #[serde(default)]
    pub min_crew: BTreeMap<String, u32>,
    /// Calendar months (1..=12) in which no renewal period may start.
    #[serde(default = "default_excluded_months")]
    pub excluded_start_months: Vec<u32>,
    #[serde(default)]
    pub status: StatusPolicy,
    /// The final-review reminder fires when the next submission deadline
    /// is exactly this many days away and pending requests remain.
    #[serde(default = "default_final_review_days")]
    pub final_review_days: i64,
}

fn default_excluded_months() -> Vec<u32> {
    // Holiday season: periods starting in December or January are off
    // limits for advance renewals.
    vec![12, 1]
}

fn default_final_review_days() -> i64 {
    22
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            categories: BTreeMap::new(),
            min_crew: BTreeMap::new(),
            excluded_start_months: default_excluded_months(),
            status: StatusPolicy::default(),
            final_review_days: default_final_review_days(),
        }
    }
}

impl EngineConfig {
    pub fn category(&self, name: &str) -> Option<&CategoryRule> {
        self.categories.get(name)
    }

    pub fn min_crew(&self, rank: &Rank) -> u32 {
        self.min_crew.get(rank.label()).copied().unwrap_or(0)
    }

    pub fn month_excluded(&self, month: u32) -> bool {
        self.excluded_start_months.contains(&month)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, rule) in &self.categories {
            if name.trim().is_empty() {
                bail!("category name cannot be empty");
            }
            // u32 already rules out negative grace; an absurd value is
            // still worth rejecting early.
            if rule.grace_days > 3660 {
                bail!("category {name}: grace_days {} out of range", rule.grace_days);
            }
        }
        for month in &self.excluded_start_months {
            if !(1..=12).contains(month) {
                bail!("excluded start month {month} out of range 1..=12");
            }
        }
        if self.status.deadline_days_before_start < 0 {
            bail!("deadline_days_before_start must not be negative");
        }
        if self.status.open_days_before_start < self.status.deadline_days_before_start {
            bail!("submission window must open before its closing deadline");
        }
        if self.final_review_days < 0 {
            bail!("final_review_days must not be negative");
        }
        Ok(())
    }
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: EngineConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn export_config_json<P: AsRef<Path>>(path: P, config: &EngineConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}
