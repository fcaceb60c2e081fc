use super::domain::{CallRecord, DepositRecord};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Payout per counted first-time-deposit bonus unit.
pub const FTD_BONUS_RATE: f64 = 1.0;
/// Payout per counted deposit bonus unit.
pub const DEPOSIT_BONUS_RATE: f64 = 1.5;

pub const GOOD_RATING_THRESHOLD: f64 = 70.0;
pub const AVERAGE_RATING_THRESHOLD: f64 = 40.0;

/// Serialises as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceRating {
    Good,
    Average,
    Bad,
}

impl PerformanceRating {
    pub const fn ordered() -> [Self; 3] {
        [Self::Good, Self::Average, Self::Bad]
    }

    /// Bands are inclusive at their lower bound.
    pub fn from_conversion_ratio(percent: f64) -> Self {
        if percent >= GOOD_RATING_THRESHOLD {
            Self::Good
        } else if percent >= AVERAGE_RATING_THRESHOLD {
            Self::Average
        } else {
            Self::Bad
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Bad => "Bad",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub total_calls: i64,
    pub successful_calls: i64,
    pub total_first_time_deposits: usize,
    pub total_deposits: usize,
    pub conversion_ratio_percent: f64,
    pub bonus_amount: f64,
    pub performance_rating: PerformanceRating,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::from_totals(0, 0, 0, 0, 0, 0)
    }
}

impl PerformanceMetrics {
    /// Derives the ratio, bonus and rating from already summed totals.
    pub fn from_totals(
        total_calls: i64,
        successful_calls: i64,
        total_first_time_deposits: usize,
        total_deposits: usize,
        ftd_bonus_units: i64,
        deposit_bonus_units: i64,
    ) -> Self {
        let conversion_ratio_percent = conversion_ratio(successful_calls, total_calls);
        let bonus_amount =
            ftd_bonus_units as f64 * FTD_BONUS_RATE + deposit_bonus_units as f64 * DEPOSIT_BONUS_RATE;

        Self {
            total_calls,
            successful_calls,
            total_first_time_deposits,
            total_deposits,
            conversion_ratio_percent,
            bonus_amount,
            performance_rating: PerformanceRating::from_conversion_ratio(conversion_ratio_percent),
        }
    }
}

/// Successful calls as a percentage of total calls; zero when there were no calls.
///
/// Not clamped: deposit-embedded counters can push successes above the total.
pub fn conversion_ratio(successful_calls: i64, total_calls: i64) -> f64 {
    if total_calls > 0 {
        (successful_calls as f64 / total_calls as f64) * 100.0
    } else {
        0.0
    }
}

/// Metrics over every supplied record.
pub fn compute_metrics(calls: &[CallRecord], deposits: &[DepositRecord]) -> PerformanceMetrics {
    compute_metrics_within(calls, deposits, |_| true)
}

/// Metrics over the records whose timestamp satisfies `predicate`.
///
/// Both slices must already be narrowed to one staff member. Counters are summed
/// as supplied, including negative values, saturating at the `i64` bounds.
pub fn compute_metrics_within<P>(
    calls: &[CallRecord],
    deposits: &[DepositRecord],
    predicate: P,
) -> PerformanceMetrics
where
    P: Fn(NaiveDateTime) -> bool,
{
    let windowed_calls: Vec<&CallRecord> = calls
        .iter()
        .filter(|call| predicate(call.timestamp))
        .collect();
    let windowed_deposits: Vec<&DepositRecord> = deposits
        .iter()
        .filter(|deposit| predicate(deposit.timestamp))
        .collect();

    let call_report_count = windowed_calls.len() as i64;
    let call_report_successful = windowed_calls
        .iter()
        .filter(|call| call.is_successful())
        .count() as i64;

    let deposit_total_calls = sum_units(&windowed_deposits, |d| d.total_calls_logged);
    let deposit_successful_calls = sum_units(&windowed_deposits, |d| d.successful_calls_logged);

    let total_first_time_deposits = windowed_deposits
        .iter()
        .filter(|deposit| deposit.is_first_time_deposit)
        .count();
    let total_deposits = windowed_deposits
        .iter()
        .filter(|deposit| deposit.is_deposit)
        .count();

    PerformanceMetrics::from_totals(
        call_report_count.saturating_add(deposit_total_calls),
        call_report_successful.saturating_add(deposit_successful_calls),
        total_first_time_deposits,
        total_deposits,
        sum_units(&windowed_deposits, |d| d.ftd_bonus_units),
        sum_units(&windowed_deposits, |d| d.deposit_bonus_units),
    )
}

fn sum_units<F>(deposits: &[&DepositRecord], field: F) -> i64
where
    F: Fn(&DepositRecord) -> Option<i64>,
{
    deposits
        .iter()
        .map(|deposit| field(deposit).unwrap_or(0))
        .fold(0_i64, i64::saturating_add)
}
