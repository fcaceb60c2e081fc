use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The reference instant used to resolve "today", "yesterday" and "this year".
///
/// Handlers capture it once per request and pass it down so every period in a
/// report is resolved against the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportClock {
    now: NaiveDateTime,
}

impl ReportClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Wall-clock time in the server's local time zone.
    pub fn local() -> Self {
        Self::new(chrono::Local::now().naive_local())
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

/// Where request handlers obtain their [`ReportClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockSource {
    #[default]
    Local,
    Fixed(NaiveDateTime),
}

impl ClockSource {
    pub fn read(&self) -> ReportClock {
        match self {
            Self::Local => ReportClock::local(),
            Self::Fixed(now) => ReportClock::new(*now),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaySelector {
    #[default]
    Today,
    Yesterday,
}

impl DaySelector {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
        }
    }
}

impl FromStr for DaySelector {
    type Err = WindowError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            _ => Err(WindowError::UnknownDay(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthSelector {
    YearMonth { year: i32, month: u32 },
    /// The calendar month enclosing the given date.
    Containing(NaiveDate),
}

impl MonthSelector {
    pub fn current(clock: &ReportClock) -> Self {
        Self::Containing(clock.today())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("{year}-{month:02} is not a valid calendar month")]
    InvalidMonth { year: i32, month: u32 },
    #[error("'{0}' is not a recognised day; expected 'today' or 'yesterday'")]
    UnknownDay(String),
    #[error("window start {start} is after its end {end}")]
    Inverted {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Closed interval `[start, end]` over record timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start of day through the last nanosecond of the same day.
    pub fn for_day(date: NaiveDate) -> Self {
        let start = start_of_day(date);
        Self {
            start,
            end: last_instant_before(date.succ_opt().map(start_of_day), start),
        }
    }

    pub fn daily(selector: DaySelector, clock: &ReportClock) -> Self {
        let today = clock.today();
        let day = match selector {
            DaySelector::Today => today,
            DaySelector::Yesterday => today.pred_opt().unwrap_or(today),
        };
        Self::for_day(day)
    }

    pub fn monthly(selector: MonthSelector) -> Result<Self, WindowError> {
        let (year, month) = match selector {
            MonthSelector::YearMonth { year, month } => (year, month),
            MonthSelector::Containing(date) => (date.year(), date.month()),
        };

        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(WindowError::InvalidMonth { year, month })?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1).map(start_of_day);

        let start = start_of_day(first);
        Ok(Self {
            start,
            end: last_instant_before(next_first, start),
        })
    }

    /// January 1st of the clock's year through the clock's current instant.
    pub fn year_to_date(clock: &ReportClock) -> Self {
        let now = clock.now();
        let start = NaiveDate::from_ymd_opt(now.year(), 1, 1)
            .map(start_of_day)
            .unwrap_or(now);
        Self { start, end: now }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }

    pub fn predicate(&self) -> impl Fn(NaiveDateTime) -> bool + Copy {
        let window = *self;
        move |at| window.contains(at)
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn last_instant_before(
    next_start: Option<NaiveDateTime>,
    fallback: NaiveDateTime,
) -> NaiveDateTime {
    next_start
        .and_then(|next| next.checked_sub_signed(Duration::nanoseconds(1)))
        .unwrap_or(NaiveDateTime::MAX)
        .max(fallback)
}
