use std::sync::Arc;

use tracing::debug;

use super::period::DashboardPeriod;
use super::summary::MemberActivity;
use super::views::DashboardSummary;
use crate::performance::{ClockSource, WindowError};
use crate::records::{RecordRepository, RecordService, RecordServiceError};
use crate::staff::{StaffDirectoryService, StaffListFilter, StaffRepository, StaffServiceError};

/// Joins the staff directory with logged activity to build dashboards.
pub struct DashboardService<S, R> {
    staff: Arc<StaffDirectoryService<S>>,
    records: Arc<RecordService<R>>,
    clock: ClockSource,
}

impl<S, R> DashboardService<S, R>
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    pub fn new(
        staff: Arc<StaffDirectoryService<S>>,
        records: Arc<RecordService<R>>,
        clock: ClockSource,
    ) -> Self {
        Self {
            staff,
            records,
            clock,
        }
    }

    pub fn summary(&self, period: DashboardPeriod) -> Result<DashboardSummary, DashboardError> {
        let clock = self.clock.read();
        let members = self
            .staff
            .list(StaffListFilter::default())?
            .into_iter()
            .map(|member| {
                self.records
                    .activity_for_agent(&member.agent_name())
                    .map(|activity| MemberActivity { member, activity })
            })
            .collect::<Result<Vec<_>, RecordServiceError>>()?;

        let summary = DashboardSummary::build(&members, period, &clock)?;
        debug!(
            ?period,
            staff = summary.headcount.total,
            calls = summary.team.total_calls,
            "dashboard built"
        );
        Ok(summary)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Staff(#[from] StaffServiceError),
    #[error(transparent)]
    Records(#[from] RecordServiceError),
}
