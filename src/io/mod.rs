pub mod export;

pub use export::{CsvLedgerSink, LedgerSink, SinkError, write_ledger_csv};
