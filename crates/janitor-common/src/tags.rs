//! Resource tag constants
//!
//! Well-known tag keys consulted when rendering per-resource report lines.
//! Cleanup units may use additional tags internally; the orchestrator core
//! only reads these.
//!
//! ## Tag Schema
//!
//! | Tag Key | Description |
//! |---------|-------------|
//! | `Name` | Human-readable resource name |
//! | `janitor:owner` | Owner account or team handle |
//! | `janitor:environment` | Deployment environment (prod/staging/...) |
//! | `janitor:zone` | Availability zone or placement hint |

/// Human-readable resource name
pub const TAG_NAME: &str = "Name";

/// Owner account or team handle
pub const TAG_OWNER: &str = "janitor:owner";

/// Deployment environment
pub const TAG_ENVIRONMENT: &str = "janitor:environment";

/// Availability zone or placement hint
pub const TAG_ZONE: &str = "janitor:zone";
