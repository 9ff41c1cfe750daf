//! In-process outbox used by tests and by `EMAIL_BACKEND=mock`

use super::{Delivery, EmailProvider};
use crate::models::Email;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Keeps every message instead of delivering it. Clones share one outbox.
#[derive(Clone, Default)]
pub struct MockSmtpProvider {
    outbox: Arc<Mutex<Vec<Email>>>,
    rejection: Option<String>,
}

impl MockSmtpProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose transport refuses every message with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            rejection: Some(reason.into()),
            ..Self::default()
        }
    }

    pub async fn sent_emails(&self) -> Vec<Email> {
        self.outbox.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.outbox.lock().await.len()
    }

    /// Newest message addressed to `address`
    pub async fn last_sent_to(&self, address: &str) -> Option<Email> {
        let outbox = self.outbox.lock().await;
        outbox.iter().rev().find(|e| e.to == address).cloned()
    }
}

#[async_trait]
impl EmailProvider for MockSmtpProvider {
    async fn send(&self, email: &Email) -> Result<Delivery> {
        if let Some(reason) = &self.rejection {
            eyre::bail!("{reason}");
        }

        tracing::debug!(email_id = %email.id, to = %email.to, "Email kept in mock outbox");
        self.outbox.lock().await.push(email.clone());

        Ok(Delivery {
            message_id: format!("outbox-{}", email.id),
        })
    }

    async fn verify(&self) -> Result<()> {
        match &self.rejection {
            Some(reason) => eyre::bail!("mock transport rejects mail: {reason}"),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
