//! Unit test modules.

mod estimation_test;
mod history_test;
mod session_numbering_test;
mod statistics_test;
