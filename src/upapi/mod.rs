//! Client for the Up banking REST API.

mod accounts;
mod client;
mod params;
mod source;
mod transactions;
mod types;

pub use accounts::*;
pub use client::{DEFAULT_HOST, DEFAULT_PAGE_SIZE, SourceError, UpClient};
pub use params::*;
pub use transactions::*;
pub use types::*;
