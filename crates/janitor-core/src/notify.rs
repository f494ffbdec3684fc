//! Notification gateway contract
//!
//! Delivery transport (SES, SMTP, chat webhook) lives behind this trait.
//! The core only decides *when* to notify; `LogNotifier` is the default
//! backend-free implementation that writes to the log instead.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Delivers notifications to humans
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Whether an address is acceptable as an email target
    fn is_valid_email(&self, address: &str) -> bool;

    /// Send a single email
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<()>;

    /// Dispatch all pending per-resource notices accumulated by cleanup units
    async fn send_notifications(&self) -> Result<()>;
}

/// Gateway that logs instead of sending
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationGateway for LogNotifier {
    fn is_valid_email(&self, address: &str) -> bool {
        // Minimal shape check: local part, one '@', dotted domain
        match address.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && matches!(domain.split_once('.'), Some((label, rest)) if !label.is_empty() && !rest.is_empty())
            }
            None => false,
        }
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        info!(to = %to, subject = %subject, bytes = body.len(), "Email suppressed (log-only notifier)");
        Ok(())
    }

    async fn send_notifications(&self) -> Result<()> {
        info!("Pending notifications suppressed (log-only notifier)");
        Ok(())
    }
}
