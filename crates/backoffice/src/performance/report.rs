use super::domain::{CallRecord, DepositRecord, PartyName};
use super::metrics::{compute_metrics, compute_metrics_within, PerformanceMetrics};
use super::window::{DaySelector, MonthSelector, ReportClock, TimeWindow, WindowError};
use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodLabel {
    Daily,
    Monthly,
    Yearly,
    AllTime,
}

/// Metrics for one period together with their display strings.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetricsView {
    pub period: PeriodLabel,
    pub period_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
    pub metrics: PerformanceMetrics,
    pub conversion_ratio_display: String,
    pub bonus_amount_display: String,
    pub rating_label: &'static str,
}

impl PerformanceMetricsView {
    pub fn new(
        period: PeriodLabel,
        period_label: impl Into<String>,
        window: Option<TimeWindow>,
        metrics: PerformanceMetrics,
    ) -> Self {
        Self {
            period,
            period_label: period_label.into(),
            window,
            conversion_ratio_display: format!("{:.2}%", metrics.conversion_ratio_percent),
            bonus_amount_display: format!("{:.2}", metrics.bonus_amount),
            rating_label: metrics.performance_rating.label(),
            metrics,
        }
    }
}

/// Daily, monthly and year-to-date metrics for one staff member, plus all-time totals.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub agent_name: String,
    pub generated_at: NaiveDateTime,
    pub daily: PerformanceMetricsView,
    pub monthly: PerformanceMetricsView,
    pub yearly: PerformanceMetricsView,
    pub all_time: PerformanceMetricsView,
}

impl PerformanceReport {
    pub fn build(
        agent_name: &PartyName,
        calls: &[CallRecord],
        deposits: &[DepositRecord],
        clock: &ReportClock,
        day: DaySelector,
        month: MonthSelector,
    ) -> Result<Self, WindowError> {
        let day_window = TimeWindow::daily(day, clock);
        let month_window = TimeWindow::monthly(month)?;
        let year_window = TimeWindow::year_to_date(clock);

        let daily = PerformanceMetricsView::new(
            PeriodLabel::Daily,
            day.label(),
            Some(day_window),
            compute_metrics_within(calls, deposits, day_window.predicate()),
        );
        let monthly = PerformanceMetricsView::new(
            PeriodLabel::Monthly,
            month_window.start.format("%B %Y").to_string(),
            Some(month_window),
            compute_metrics_within(calls, deposits, month_window.predicate()),
        );
        let yearly = PerformanceMetricsView::new(
            PeriodLabel::Yearly,
            format!("{} to date", year_window.start.year()),
            Some(year_window),
            compute_metrics_within(calls, deposits, year_window.predicate()),
        );
        let all_time = PerformanceMetricsView::new(
            PeriodLabel::AllTime,
            "All time",
            None,
            compute_metrics(calls, deposits),
        );

        Ok(Self {
            agent_name: agent_name.to_string(),
            generated_at: clock.now(),
            daily,
            monthly,
            yearly,
            all_time,
        })
    }
}
