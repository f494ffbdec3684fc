//! janitor-core - Cleanup run-cycle orchestrator
//!
//! This crate drives resource-type-specific cleanup units through a
//! mark -> notify -> clean lifecycle with per-unit failure isolation,
//! tracks per-resource opt-in/opt-out state durably, and produces an
//! operational summary after each cycle.

pub mod calendar;
pub mod config;
pub mod notify;
pub mod orchestrator;
pub mod report;
pub mod store;
pub mod unit;
