// Application layer - report orchestration over the bank source and ledger sink.

pub mod config;
pub mod error;
pub mod reporting;
pub mod service;
pub mod source;

pub use config::*;
pub use error::*;
pub use reporting::*;
pub use service::*;
pub use source::*;
