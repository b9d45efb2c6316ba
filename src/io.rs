use crate::model::{
    Certification, DateRange, Fleet, Pilot, Rank, RenewalPlan, Request, RequestKind,
};
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Pilot import: header `code,display_name,rank,seniority[,active]`
pub fn import_pilots_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Pilot>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let code = rec.get(0).context("missing code")?.trim();
        let name = rec.get(1).context("missing display_name")?.trim();
        let rank = rec.get(2).context("missing rank")?.trim();
        let seniority = rec.get(3).context("missing seniority")?.trim();
        if code.is_empty() || name.is_empty() {
            bail!("invalid pilot row (empty code or name)");
        }
        let seniority: u32 = seniority
            .parse()
            .with_context(|| format!("invalid seniority for pilot {code}"))?;
        let mut pilot = Pilot::new(code, name, Rank::parse(rank), seniority);
        if let Some(flag) = rec.get(4) {
            let flag = flag.trim();
            if !flag.is_empty() {
                pilot.active = parse_bool(flag)
                    .with_context(|| format!("invalid active value for pilot {code}"))?;
            }
        }
        out.push(pilot);
    }
    Ok(out)
}

/// Certification import: header `pilot_code,category,expiry` (YYYY-MM-DD).
/// Pilot codes are resolved against the fleet; an unknown code aborts.
pub fn import_certifications_csv<P: AsRef<Path>>(
    path: P,
    fleet: &Fleet,
) -> anyhow::Result<Vec<Certification>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let code = rec.get(0).context("missing pilot_code")?.trim();
        let category = rec.get(1).context("missing category")?.trim();
        let expiry = rec.get(2).context("missing expiry")?.trim();
        if category.is_empty() {
            bail!("invalid certification row (empty category)");
        }
        let pilot = fleet
            .find_pilot_by_code(code)
            .with_context(|| format!("unknown pilot code: {code}"))?;
        let expiry = parse_date(expiry)?;
        out.push(Certification::new(pilot.id.clone(), category, expiry));
    }
    Ok(out)
}

/// Request import: header `pilot_code,kind,start,end[,submitted_at]`.
/// Rank and seniority are inherited from the pilot; `submitted_at`
/// defaults to now when the column is empty.
pub fn import_requests_csv<P: AsRef<Path>>(path: P, fleet: &Fleet) -> anyhow::Result<Vec<Request>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let code = rec.get(0).context("missing pilot_code")?.trim();
        let kind = rec.get(1).context("missing kind")?.trim();
        let start = rec.get(2).context("missing start")?.trim();
        let end = rec.get(3).context("missing end")?.trim();

        let pilot = fleet
            .find_pilot_by_code(code)
            .with_context(|| format!("unknown pilot code: {code}"))?;
        let kind = parse_kind(kind)?;
        let range = DateRange::new(parse_date(start)?, parse_date(end)?)
            .map_err(anyhow::Error::msg)?;
        let submitted_at = match rec.get(4).map(str::trim) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<DateTime<Utc>>()
                .with_context(|| format!("invalid submitted_at for pilot {code}"))?,
            _ => Utc::now(),
        };
        out.push(Request::new(
            pilot.id.clone(),
            pilot.rank.clone(),
            kind,
            range,
            pilot.seniority_number,
            submitted_at,
        ));
    }
    Ok(out)
}

fn parse_kind(s: &str) -> anyhow::Result<RequestKind> {
    match s.to_ascii_lowercase().as_str() {
        "leave" => Ok(RequestKind::Leave),
        "flight" => Ok(RequestKind::Flight),
        other => bail!("unknown request kind: {other}"),
    }
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// JSON export of the whole fleet dataset (pretty-printed).
pub fn export_fleet_json<P: AsRef<Path>>(path: P, fleet: &Fleet) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(fleet)?;
    fs::write(path, s)?;
    Ok(())
}

/// Plan export: header `certification,pilot_code,category,period,priority,capacity_warning`
pub fn export_plans_csv<P: AsRef<Path>>(
    path: P,
    plans: &[RenewalPlan],
    fleet: &Fleet,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "certification",
        "pilot_code",
        "category",
        "period",
        "priority",
        "capacity_warning",
    ])?;
    for plan in plans {
        let pilot_code = fleet
            .find_pilot_by_id(&plan.pilot)
            .map(|p| p.code.as_str())
            .unwrap_or("");
        w.write_record([
            plan.certification.as_str(),
            pilot_code,
            plan.category.as_str(),
            plan.assigned_period.as_str(),
            &plan.priority_score.to_string(),
            if plan.capacity_warning { "true" } else { "false" },
        ])?;
    }
    w.flush()?;
    Ok(())
}
