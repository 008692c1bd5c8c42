pub mod application;
pub mod cli;
pub mod domain;
pub mod io;
pub mod upapi;

pub use application::{GeneratedReport, Report, ReportEntry, ReportService};
pub use domain::*;
