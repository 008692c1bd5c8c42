use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Zone the bank itself keeps its books in.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Australia::Sydney;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Year {0} is out of range")]
    InvalidYear(i32),
}

/// Civil calendar used to decide which year a timestamp belongs to.
///
/// All year boundaries are local midnight on 1 January in the configured zone,
/// so a transaction at 23:30 UTC on 31 December can belong to the following
/// year once converted to Australian Eastern time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportCalendar {
    timezone: Tz,
}

impl Default for ReportCalendar {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl ReportCalendar {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Build a calendar from an IANA zone name such as "Australia/Sydney".
    pub fn from_name(name: &str) -> Result<Self, CalendarError> {
        let timezone = name
            .parse::<Tz>()
            .map_err(|_| CalendarError::UnknownTimezone(name.to_string()))?;
        Ok(Self::new(timezone))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// First instant of `year` in the calendar's zone.
    pub fn year_start(&self, year: i32) -> Result<DateTime<Utc>, CalendarError> {
        self.timezone
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or(CalendarError::InvalidYear(year))
    }

    /// Exclusive upper bound of `year`: the first instant of the next year.
    pub fn year_end(&self, year: i32) -> Result<DateTime<Utc>, CalendarError> {
        let next = year.checked_add(1).ok_or(CalendarError::InvalidYear(year))?;
        self.year_start(next)
    }

    /// Calendar year `timestamp` falls in, in the calendar's zone.
    pub fn year_of(&self, timestamp: DateTime<Utc>) -> i32 {
        timestamp.with_timezone(&self.timezone).year()
    }
}
