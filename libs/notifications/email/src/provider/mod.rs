//! Delivery backends

pub mod mock;
pub mod smtp;

pub use mock::MockSmtpProvider;
pub use smtp::{SmtpConfig, SmtpProvider};

use crate::models::Email;
use async_trait::async_trait;
use eyre::Result;

/// Receipt for a message the transport accepted
#[derive(Debug, Clone)]
pub struct Delivery {
    pub message_id: String,
}

/// A transport the storefront hands outgoing mail to.
///
/// `send` is a single attempt. Retrying, or ignoring the failure, is up to
/// the caller.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &Email) -> Result<Delivery>;

    /// Probe the transport without sending anything
    async fn verify(&self) -> Result<()>;

    /// Short label used in logs
    fn name(&self) -> &'static str;
}
