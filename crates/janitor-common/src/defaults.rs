//! Default configuration values and key names
//!
//! These constants keep the orchestrator, the CLI, and tests agreeing on
//! configuration keys and their safety defaults.

/// Config key: master enablement switch for the run cycle
pub const KEY_ENABLED: &str = "janitor.enabled";

/// Config key: when true, suppress individual opt-out notifications
pub const KEY_LEASHED: &str = "janitor.leashed";

/// Config key: whether to send the per-cycle summary email
pub const KEY_SUMMARY_EMAIL_ENABLED: &str = "janitor.summary_email.enabled";

/// Config key: summary email recipient; empty disables the summary
pub const KEY_SUMMARY_EMAIL_TO: &str = "janitor.summary_email.to";

/// Config key: home region used when an opt call omits the region
pub const KEY_REGION: &str = "janitor.region";

/// Config key: account name shown in the summary subject
pub const KEY_ACCOUNT_NAME: &str = "janitor.account_name";

/// The janitor runs unless explicitly disabled
pub const DEFAULT_ENABLED: bool = true;

/// Leashed by default: marking and cleaning run, notifications do not
pub const DEFAULT_LEASHED: bool = true;

/// Summary email is on by default (an empty recipient still disables it)
pub const DEFAULT_SUMMARY_EMAIL_ENABLED: bool = true;

/// Default home region
pub const DEFAULT_REGION: &str = "us-east-1";
