use super::period::DashboardPeriod;
use super::views::{
    DashboardSummary, HeadcountView, LeaderboardEntry, RatingCountEntry, TeamTotalsView,
};
use crate::performance::{
    compute_metrics, compute_metrics_within, conversion_ratio, PerformanceMetrics,
    PerformanceRating, ReportClock, WindowError,
};
use crate::records::AgentActivity;
use crate::staff::StaffMember;
use std::cmp::Ordering;

/// A staff member paired with the activity attributed to them.
#[derive(Debug, Clone)]
pub struct MemberActivity {
    pub member: StaffMember,
    pub activity: AgentActivity,
}

impl DashboardSummary {
    pub fn build(
        members: &[MemberActivity],
        period: DashboardPeriod,
        clock: &ReportClock,
    ) -> Result<Self, WindowError> {
        let window = period.window(clock)?;

        let scored: Vec<(&StaffMember, PerformanceMetrics)> = members
            .iter()
            .map(|entry| {
                let calls = &entry.activity.calls;
                let deposits = &entry.activity.deposits;
                let metrics = match window {
                    Some(window) => compute_metrics_within(calls, deposits, window.predicate()),
                    None => compute_metrics(calls, deposits),
                };
                (&entry.member, metrics)
            })
            .collect();

        let active = members.iter().filter(|entry| entry.member.active).count();
        let headcount = HeadcountView {
            total: members.len(),
            active,
            inactive: members.len() - active,
        };

        Ok(Self {
            period,
            period_label: period.label(clock),
            window,
            generated_at: clock.now(),
            headcount,
            team: team_totals(&scored),
            rating_distribution: rating_distribution(&scored),
            leaderboard: leaderboard(scored),
        })
    }
}

fn team_totals(scored: &[(&StaffMember, PerformanceMetrics)]) -> TeamTotalsView {
    let mut total_calls = 0_i64;
    let mut successful_calls = 0_i64;
    let mut total_first_time_deposits = 0_usize;
    let mut total_deposits = 0_usize;
    let mut bonus_amount = 0.0_f64;
    for (_, metrics) in scored {
        total_calls = total_calls.saturating_add(metrics.total_calls);
        successful_calls = successful_calls.saturating_add(metrics.successful_calls);
        total_first_time_deposits += metrics.total_first_time_deposits;
        total_deposits += metrics.total_deposits;
        bonus_amount += metrics.bonus_amount;
    }

    let conversion_ratio_percent = conversion_ratio(successful_calls, total_calls);
    let performance_rating = PerformanceRating::from_conversion_ratio(conversion_ratio_percent);
    TeamTotalsView {
        total_calls,
        successful_calls,
        total_first_time_deposits,
        total_deposits,
        bonus_amount,
        conversion_ratio_percent,
        performance_rating,
        rating_label: performance_rating.label(),
        conversion_ratio_display: format!("{:.2}%", conversion_ratio_percent),
        bonus_amount_display: format!("{:.2}", bonus_amount),
    }
}

fn rating_distribution(scored: &[(&StaffMember, PerformanceMetrics)]) -> Vec<RatingCountEntry> {
    PerformanceRating::ordered()
        .into_iter()
        .map(|rating| RatingCountEntry {
            rating,
            rating_label: rating.label(),
            staff_count: scored
                .iter()
                .filter(|(_, metrics)| metrics.performance_rating == rating)
                .count(),
        })
        .collect()
}

/// Highest conversion first; ties go to the larger bonus, then to the name.
fn leaderboard(mut scored: Vec<(&StaffMember, PerformanceMetrics)>) -> Vec<LeaderboardEntry> {
    scored.sort_by(|(a_member, a), (b_member, b)| {
        b.conversion_ratio_percent
            .total_cmp(&a.conversion_ratio_percent)
            .then_with(|| b.bonus_amount.total_cmp(&a.bonus_amount))
            .then_with(|| compare_names(a_member, b_member))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (member, metrics))| LeaderboardEntry {
            rank: index + 1,
            staff_id: member.id.clone(),
            full_name: member.full_name.clone(),
            role: member.role,
            role_label: member.role_label(),
            active: member.active,
            conversion_ratio_display: format!("{:.2}%", metrics.conversion_ratio_percent),
            bonus_amount_display: format!("{:.2}", metrics.bonus_amount),
            rating_label: metrics.performance_rating.label(),
            metrics,
        })
        .collect()
}

fn compare_names(a: &StaffMember, b: &StaffMember) -> Ordering {
    a.full_name
        .to_lowercase()
        .cmp(&b.full_name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}
