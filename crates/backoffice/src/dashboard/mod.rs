//! Team-wide analytics over the staff directory and logged activity.
//!
//! Every member's metrics are computed with the same engine as the individual
//! performance report, then rolled up into headcount, team totals, a rating
//! distribution and a leaderboard.

mod period;
mod router;
mod service;
mod summary;
pub mod views;

pub use period::{DashboardPeriod, UnknownPeriod};
pub use router::dashboard_router;
pub use service::{DashboardError, DashboardService};
pub use summary::MemberActivity;
pub use views::DashboardSummary;
