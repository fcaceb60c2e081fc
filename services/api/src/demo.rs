use crate::infra::BackofficeServices;
use crate::routes::{build_performance_report, PerformanceReportRequest};
use backoffice::dashboard::{DashboardPeriod, DashboardService, DashboardSummary};
use backoffice::error::AppError;
use backoffice::performance::{
    CallRecord, ClockSource, DepositRecord, PerformanceMetricsView, PerformanceReport, ReportClock,
};
use backoffice::staff::{PerformanceQuery, StaffRole, StaffSubmission};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PerformanceArgs {
    /// JSON file holding `calls` and `deposits` arrays
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Agent whose calls are reported on
    #[arg(long)]
    pub(crate) agent: String,
    /// Daily window: today or yesterday
    #[arg(long)]
    pub(crate) day: Option<String>,
    /// Year of the monthly window (requires --month)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Month of the monthly window (1-12)
    #[arg(long)]
    pub(crate) month: Option<u32>,
    /// Any date inside the monthly window (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Reference instant instead of the local clock
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) now: Option<NaiveDateTime>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Dashboard period: all, today, yesterday, month or year
    #[arg(long, default_value = "all")]
    pub(crate) period: DashboardPeriod,
    /// Reference instant instead of the local clock
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) now: Option<NaiveDateTime>,
    /// Print the dashboard as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RecordsFile {
    #[serde(default)]
    calls: Vec<CallRecord>,
    #[serde(default)]
    deposits: Vec<DepositRecord>,
}

pub(crate) fn run_performance_report(args: PerformanceArgs) -> Result<(), AppError> {
    let PerformanceArgs {
        records,
        agent,
        day,
        year,
        month,
        date,
        now,
        json,
    } = args;

    let contents = fs::read_to_string(&records)?;
    let RecordsFile { calls, deposits } = serde_json::from_str(&contents)?;

    let request = PerformanceReportRequest {
        agent_name: agent.into(),
        calls,
        deposits,
        now,
        period: PerformanceQuery {
            day,
            year,
            month,
            date: date.map(|date| date.format("%Y-%m-%d").to_string()),
        },
    };
    let report = build_performance_report(request, ClockSource::Local)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_performance_report(&report);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { period, now, json } = args;

    let clock = now.map(ReportClock::new).unwrap_or_else(ReportClock::local);
    let services = BackofficeServices::in_memory(ClockSource::Fixed(clock.now()));
    seed_demo_data(&services, &clock)?;

    let dashboard = DashboardService::new(
        services.staff.clone(),
        services.records.clone(),
        services.clock,
    );
    let summary = dashboard.summary(period)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_dashboard(&summary);
    }
    Ok(())
}

/// Registers a small team and a week of activity ending at `clock`.
///
/// Returns the number of staff members created.
pub(crate) fn seed_demo_data(
    services: &BackofficeServices,
    clock: &ReportClock,
) -> Result<usize, AppError> {
    let team = [
        ("Ava Stone", "ava.stone@example.com", StaffRole::TeamLead),
        ("Ben Ortiz", "ben.ortiz@example.com", StaffRole::Agent),
        ("Cara Diaz", "cara.diaz@example.com", StaffRole::Agent),
        ("Dev Patel", "dev.patel@example.com", StaffRole::Agent),
    ];
    let joined_on = clock.today() - Duration::days(180);
    for (name, email, role) in team {
        services.staff.create(StaffSubmission {
            full_name: name.to_string(),
            email: email.to_string(),
            phone: None,
            role,
            joined_on: Some(joined_on),
            active: true,
        })?;
    }

    let midnight = clock.today().and_time(NaiveTime::MIN);
    let at = |days_ago: i64, hour: i64| midnight - Duration::days(days_ago) + Duration::hours(hour);

    let calls = [
        ("Ava Stone", "Lena Fox", "Completed", 0, 1),
        ("Ava Stone", "Omar Haddad", "Completed", 1, 10),
        ("Ava Stone", "Priya Nair", "Missed", 2, 11),
        ("Ava Stone", "Lena Fox", "Completed", 5, 9),
        ("Ben Ortiz", "Tom Becker", "Completed", 0, 2),
        ("Ben Ortiz", "Uma Rossi", "No Answer", 1, 14),
        ("Ben Ortiz", "Uma Rossi", "Missed", 3, 15),
        ("Cara Diaz", "Yuki Sato", "Completed", 1, 9),
        ("Cara Diaz", "Zoe Grant", "Completed", 4, 16),
        ("Dev Patel", "Hugo Lind", "Missed", 2, 12),
    ];
    for (agent, counterparty, status, days_ago, hour) in calls {
        services.records.log_call(CallRecord {
            agent_name: agent.into(),
            counterparty_name: counterparty.into(),
            timestamp: at(days_ago, hour),
            status: status.to_string(),
        })?;
    }

    let deposits = [
        ("lena fox", 0, 1, true, 1, 1, 2, 2),
        ("Omar Haddad", 1, 12, false, 0, 1, 1, 1),
        ("Tom Becker", 0, 3, true, 1, 0, 1, 0),
        ("Yuki Sato", 1, 10, true, 1, 2, 0, 0),
    ];
    for (depositor, days_ago, hour, ftd, ftd_units, deposit_units, total, successful) in deposits {
        services.records.log_deposit(DepositRecord {
            depositor_name: depositor.into(),
            timestamp: at(days_ago, hour),
            is_first_time_deposit: ftd,
            is_deposit: true,
            ftd_bonus_units: Some(ftd_units),
            deposit_bonus_units: Some(deposit_units),
            total_calls_logged: Some(total),
            successful_calls_logged: Some(successful),
        })?;
    }

    Ok(team.len())
}

fn render_performance_report(report: &PerformanceReport) {
    println!("Performance report for {}", report.agent_name);
    println!("Generated at {}", report.generated_at.format("%Y-%m-%d %H:%M"));
    for view in [&report.daily, &report.monthly, &report.yearly, &report.all_time] {
        render_metrics_view(view);
    }
}

fn render_metrics_view(view: &PerformanceMetricsView) {
    let metrics = &view.metrics;
    println!("\n{}", view.period_label);
    println!(
        "- {} calls | {} successful | conversion {} ({})",
        metrics.total_calls,
        metrics.successful_calls,
        view.conversion_ratio_display,
        view.rating_label
    );
    println!(
        "- {} first-time deposits | {} deposits | bonus {}",
        metrics.total_first_time_deposits, metrics.total_deposits, view.bonus_amount_display
    );
}

fn render_dashboard(summary: &DashboardSummary) {
    println!("Team dashboard ({})", summary.period_label);
    println!(
        "Headcount: {} ({} active, {} inactive)",
        summary.headcount.total, summary.headcount.active, summary.headcount.inactive
    );
    println!(
        "Team: {} calls | {} successful | conversion {} ({}) | bonus {}",
        summary.team.total_calls,
        summary.team.successful_calls,
        summary.team.conversion_ratio_display,
        summary.team.rating_label,
        summary.team.bonus_amount_display
    );

    println!("\nRating distribution");
    for entry in &summary.rating_distribution {
        println!("- {}: {}", entry.rating_label, entry.staff_count);
    }

    println!("\nLeaderboard");
    for entry in &summary.leaderboard {
        println!(
            "  {}. {} ({}) | conversion {} | bonus {} | {}",
            entry.rank,
            entry.full_name,
            entry.role_label,
            entry.conversion_ratio_display,
            entry.bonus_amount_display,
            entry.rating_label
        );
    }
}
