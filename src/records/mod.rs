//! Personal records across workout history.

pub mod ledger;

pub use ledger::{mark_record_sets, PrLedger, StagedRecord};
