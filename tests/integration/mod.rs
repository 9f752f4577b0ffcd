//! Integration test modules.

mod failing_store;
mod persistence_test;
