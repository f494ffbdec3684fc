//! janitor-test-utils - Shared test utilities
//!
//! In-memory SQLite database setup for testing.
//!
//! Schema setup is done by the consuming crate since the schema definition
//! lives in `janitor-core`.

pub mod db;

pub use db::{open_test_db, TestDbPool};
