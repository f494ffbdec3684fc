//! janitor-common - Shared types and utilities
//!
//! This crate provides the domain types shared by the orchestrator core and
//! any cleanup-unit implementations, without SQL or CLI dependencies to keep
//! it lightweight.
//!
//! ## Modules
//!
//! - [`defaults`]: Configuration key names and default values
//! - [`events`]: Opt-in/opt-out audit events
//! - [`resource`]: The tracked cloud resource model
//! - [`resource_kind`]: Managed resource types
//! - [`tags`]: Resource tag constants used by reporting

pub mod defaults;
pub mod events;
pub mod resource;
pub mod resource_kind;
pub mod tags;

// Re-export commonly used types
pub use events::{OptEvent, OptEventType};
pub use resource::Resource;
pub use resource_kind::ResourceKind;
