//! Performance analytics for call-centre staff.
//!
//! The engine in [`metrics`] is a pure reduction over call and deposit records that
//! the caller has already narrowed to one staff member. [`window`] builds the
//! day/month/year predicates the engine is run against, and [`report`] renders the
//! three periods side by side.

pub mod domain;
pub mod metrics;
pub mod report;
pub mod window;

pub use domain::{CallRecord, DepositRecord, PartyName};
pub use metrics::{
    compute_metrics, compute_metrics_within, conversion_ratio, PerformanceMetrics,
    PerformanceRating, AVERAGE_RATING_THRESHOLD, DEPOSIT_BONUS_RATE, FTD_BONUS_RATE,
    GOOD_RATING_THRESHOLD,
};
pub use report::{PerformanceMetricsView, PerformanceReport, PeriodLabel};
pub use window::{ClockSource, DaySelector, MonthSelector, ReportClock, TimeWindow, WindowError};
