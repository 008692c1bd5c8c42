mod account;
mod calendar;
mod ledger;
mod money;
mod transaction;

pub use account::*;
pub use calendar::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
