use crate::performance::{DaySelector, MonthSelector, ReportClock, TimeWindow, WindowError};
use chrono::Datelike;
use serde::Serialize;
use std::str::FromStr;

/// Reporting period selectable on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardPeriod {
    #[default]
    AllTime,
    Today,
    Yesterday,
    Month,
    Year,
}

impl DashboardPeriod {
    /// Resolves the period against `clock`; `None` means no time filter.
    pub fn window(self, clock: &ReportClock) -> Result<Option<TimeWindow>, WindowError> {
        let window = match self {
            Self::AllTime => return Ok(None),
            Self::Today => TimeWindow::daily(DaySelector::Today, clock),
            Self::Yesterday => TimeWindow::daily(DaySelector::Yesterday, clock),
            Self::Month => TimeWindow::monthly(MonthSelector::current(clock))?,
            Self::Year => TimeWindow::year_to_date(clock),
        };
        Ok(Some(window))
    }

    pub fn label(self, clock: &ReportClock) -> String {
        match self {
            Self::AllTime => "All time".to_string(),
            Self::Today => DaySelector::Today.label().to_string(),
            Self::Yesterday => DaySelector::Yesterday.label().to_string(),
            Self::Month => clock.now().format("%B %Y").to_string(),
            Self::Year => format!("{} to date", clock.today().year()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a dashboard period; expected all, today, yesterday, month or year")]
pub struct UnknownPeriod(pub String);

impl FromStr for DashboardPeriod {
    type Err = UnknownPeriod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" | "all_time" | "" => Ok(Self::AllTime),
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(UnknownPeriod(value.to_string())),
        }
    }
}
