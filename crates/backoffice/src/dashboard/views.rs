use crate::performance::{PerformanceMetrics, PerformanceRating, TimeWindow};
use crate::staff::{StaffId, StaffRole};
use chrono::NaiveDateTime;
use serde::Serialize;

use super::DashboardPeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeadcountView {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

/// Directory-wide sums with the ratio and rating recomputed from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamTotalsView {
    pub total_calls: i64,
    pub successful_calls: i64,
    pub total_first_time_deposits: usize,
    pub total_deposits: usize,
    pub bonus_amount: f64,
    pub conversion_ratio_percent: f64,
    pub performance_rating: PerformanceRating,
    pub rating_label: &'static str,
    pub conversion_ratio_display: String,
    pub bonus_amount_display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingCountEntry {
    pub rating: PerformanceRating,
    pub rating_label: &'static str,
    pub staff_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub staff_id: StaffId,
    pub full_name: String,
    pub role: StaffRole,
    pub role_label: &'static str,
    pub active: bool,
    pub metrics: PerformanceMetrics,
    pub conversion_ratio_display: String,
    pub bonus_amount_display: String,
    pub rating_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub period: DashboardPeriod,
    pub period_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
    pub generated_at: NaiveDateTime,
    pub headcount: HeadcountView,
    pub team: TeamTotalsView,
    pub rating_distribution: Vec<RatingCountEntry>,
    pub leaderboard: Vec<LeaderboardEntry>,
}
