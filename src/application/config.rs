use crate::domain::ReportCalendar;

use super::AppError;

/// Resolved settings for one report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    pub year: i32,
    pub calendar: ReportCalendar,
}

impl ReportConfig {
    /// Validate `year` against the calendar named by `timezone`.
    pub fn new(year: i32, timezone: &str) -> Result<Self, AppError> {
        let calendar = ReportCalendar::from_name(timezone)?;
        calendar.year_end(year)?;
        Ok(Self { year, calendar })
    }
}
