#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use crewroster::{
    check_conflicts, evaluate_request, io, leave,
    model::{CrewSnapshot, DateRange, Request, RequestId, RequestKind, RequestStatus},
    notification::{prepare_final_review, TextReminder},
    storage::{JsonStorage, Storage},
    EngineConfig, Fleet, Outcome, PeriodCalendar, PlanOptions,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Aircrew roster-period, renewal-planning and leave-eligibility CLI
/// (no database).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Enable logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fleet dataset JSON file
    #[arg(long, global = true, default_value = "fleet.json")]
    fleet: String,

    /// Engine configuration JSON file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Reference date (YYYY-MM-DD), defaults to today UTC
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Self-heal the roster-period sequence for the coming years
    EnsurePeriods {
        #[arg(long, default_value_t = 2)]
        years_ahead: u32,
    },

    /// Show the roster period containing a date
    PeriodFor {
        /// YYYY-MM-DD
        date: String,
    },

    /// List known periods with their current lifecycle status
    ListPeriods {
        #[arg(long)]
        year: Option<i32>,
    },

    /// Run the certification-renewal planner
    PlanRenewals {
        #[arg(long, default_value_t = 6)]
        months_ahead: u32,
        /// Comma-separated category filter
        #[arg(long)]
        categories: Option<String>,
        /// Discard existing plans in scope before reassigning
        #[arg(long)]
        clear: bool,
    },

    /// Evaluate pending leave/flight requests against minimum crew
    CheckLeave {
        /// Evaluate a single request; all pending when omitted
        #[arg(long)]
        request_id: Option<String>,
    },

    /// Check a proposed request for conflicts without submitting it
    CheckConflicts {
        #[arg(long)]
        pilot: String,
        /// leave | flight
        #[arg(long, default_value = "leave")]
        kind: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// YYYY-MM-DD
        #[arg(long)]
        end: String,
    },

    /// Import pilots from CSV
    ImportPilots {
        #[arg(long)]
        csv: String,
    },

    /// Import certifications from CSV
    ImportCerts {
        #[arg(long)]
        csv: String,
    },

    /// Import requests from CSV
    ImportRequests {
        #[arg(long)]
        csv: String,
    },

    /// Export plans and/or the full dataset
    Export {
        #[arg(long)]
        plans_csv: Option<String>,
        #[arg(long)]
        fleet_json: Option<String>,
    },
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| anyhow::anyhow!("invalid date: {raw}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let today = match &cli.today {
        Some(raw) => parse_day(raw)?,
        None => Utc::now().date_naive(),
    };
    let config = match &cli.config {
        Some(path) => crewroster::load_config_from_file(path)?,
        None => EngineConfig::default(),
    };
    let calendar = PeriodCalendar::default();

    let storage = JsonStorage::open(&cli.fleet)?;
    let mut fleet = storage.load().unwrap_or_else(|_| Fleet::default());

    let code = match cli.cmd {
        Commands::EnsurePeriods { years_ahead } => {
            let created =
                calendar.ensure_periods_exist(&mut fleet.periods, today.year(), years_ahead);
            calendar.refresh_statuses(&mut fleet.periods, today, config.status);
            storage.save(&fleet)?;
            println!("{created} period(s) created");
            0
        }
        Commands::PeriodFor { date } => {
            let period = calendar.period_for_date(parse_day(&date)?);
            println!(
                "{} | {} → {}",
                period.code, period.start_date, period.end_date
            );
            0
        }
        Commands::ListPeriods { year } => {
            calendar.refresh_statuses(&mut fleet.periods, today, config.status);
            for p in fleet
                .periods
                .iter()
                .filter(|p| year.map_or(true, |y| p.year == y))
            {
                println!(
                    "{} | {} → {} | {:?}",
                    p.code, p.start_date, p.end_date, p.status
                );
            }
            0
        }
        Commands::PlanRenewals {
            months_ahead,
            categories,
            clear,
        } => {
            let opts = PlanOptions {
                months_ahead,
                categories: categories.map(|list| {
                    list.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                }),
                clear_existing: clear,
            };
            let run = crewroster::generate_renewal_plan(&mut fleet, &config, today, &opts)?;
            storage.save(&fleet)?;
            println!(
                "created {} / skipped {} / warned {}",
                run.summary.created, run.summary.skipped, run.summary.warned
            );
            for warning in &run.warnings {
                eprintln!("warning: {warning:?}");
            }
            if run.warnings.is_empty() {
                0
            } else {
                // Code 2 = completed with warnings
                2
            }
        }
        Commands::CheckLeave { request_id } => {
            let targets: Vec<Request> = match request_id {
                Some(raw) => {
                    let id = RequestId::new(&raw);
                    let req = fleet
                        .find_request(&id)
                        .ok_or_else(|| anyhow::anyhow!("unknown request: {raw}"))?;
                    vec![req.clone()]
                }
                None => fleet.pending_requests().cloned().collect(),
            };
            if targets.is_empty() {
                println!("no pending requests");
            }
            for req in &targets {
                if req.status != RequestStatus::Pending {
                    bail!("request {} is not pending", req.id.as_str());
                }
                let snapshot = CrewSnapshot::for_range(&fleet, &req.range);
                let decision = evaluate_request(req, &snapshot, &config);
                let verdict = match decision.outcome {
                    Outcome::Approved => "approve",
                    Outcome::Held => "hold",
                };
                println!(
                    "{} | {} | {} .. {} | {} ({:?})",
                    req.id.as_str(),
                    req.rank.label(),
                    req.range.start,
                    req.range.end,
                    verdict,
                    decision.reason
                );
            }
            for alert in leave::pending_overlap_alerts(&fleet.requests) {
                eprintln!(
                    "alert: {} pending {} request(s) overlap",
                    alert.requests.len(),
                    alert.rank.label()
                );
            }
            if let Some(reminder) =
                prepare_final_review(&fleet, &calendar, &config, today, &TextReminder)
            {
                eprintln!(
                    "final review due: {} pending before {} (deadline {})",
                    reminder.pending, reminder.period_code, reminder.deadline
                );
            }
            0
        }
        Commands::CheckConflicts {
            pilot,
            kind,
            start,
            end,
        } => {
            let pilot = fleet
                .find_pilot_by_code(&pilot)
                .ok_or_else(|| anyhow::anyhow!("unknown pilot: {pilot}"))?
                .clone();
            let kind = match kind.to_ascii_lowercase().as_str() {
                "leave" => RequestKind::Leave,
                "flight" => RequestKind::Flight,
                other => bail!("unknown request kind: {other}"),
            };
            let range = DateRange::new(parse_day(&start)?, parse_day(&end)?)
                .map_err(anyhow::Error::msg)?;
            let proposed = Request::new(
                pilot.id.clone(),
                pilot.rank.clone(),
                kind,
                range,
                pilot.seniority_number,
                Utc::now(),
            );
            let snapshot = CrewSnapshot::for_range(&fleet, &range);
            let conflicts = check_conflicts(&proposed, &fleet.requests, &snapshot, &config);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                for c in &conflicts {
                    println!("{:?} | {:?} | {}", c.severity, c.kind, c.detail);
                }
                2
            }
        }
        Commands::ImportPilots { csv } => {
            let pilots = io::import_pilots_csv(csv)?;
            fleet.pilots.extend(pilots);
            storage.save(&fleet)?;
            0
        }
        Commands::ImportCerts { csv } => {
            let certs = io::import_certifications_csv(csv, &fleet)?;
            fleet.certifications.extend(certs);
            storage.save(&fleet)?;
            0
        }
        Commands::ImportRequests { csv } => {
            let requests = io::import_requests_csv(csv, &fleet)?;
            fleet.requests.extend(requests);
            storage.save(&fleet)?;
            0
        }
        Commands::Export {
            plans_csv,
            fleet_json,
        } => {
            if let Some(path) = plans_csv {
                io::export_plans_csv(path, &fleet.plans, &fleet)?;
            }
            if let Some(path) = fleet_json {
                io::export_fleet_json(path, &fleet)?;
            }
            0
        }
    };

    std::process::exit(code);
}
