//! Password reset by emailed verification code
//!
//! ```text
//! request(email) ──► code stored (10 min) + emailed
//! verify(email, code) ──► entry marked verified   (3 wrong codes drop the entry)
//! confirm(email, code, password) ──► password replaced, entry dropped
//! ```
//!
//! Unknown emails get the same answer as known ones on `request`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use email::{EmailProvider, TemplateEngine, templates};
use rand::Rng;
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::normalize_email;
use crate::password::validate_password;
use crate::repository::UserRepository;
use crate::service::UserService;

pub const CODE_TTL_MINUTES: i64 = 10;
pub const MAX_ATTEMPTS: u32 = 3;

/// A pending reset code, keyed by lowercased email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
    pub verified: bool,
}

impl VerificationCode {
    /// Random six-digit code
    pub fn generate(ttl: Duration) -> Self {
        let code: u32 = rand::rng().random_range(100_000..1_000_000);
        Self {
            code: code.to_string(),
            expires_at: Utc::now() + ttl,
            attempts: 0,
            verified: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Seconds until expiry, at least one
    pub fn ttl_secs(&self) -> u64 {
        (self.expires_at - Utc::now()).num_seconds().max(1) as u64
    }
}

/// Storage for pending reset codes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    async fn get(&self, key: &str) -> UserResult<Option<VerificationCode>>;

    /// Insert or overwrite; expiry follows `code.expires_at`
    async fn put(&self, key: &str, code: VerificationCode) -> UserResult<()>;

    async fn remove(&self, key: &str) -> UserResult<()>;
}

/// Process-local store. Entries are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCodeStore {
    codes: Arc<RwLock<HashMap<String, VerificationCode>>>,
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VerificationCodeStore for InMemoryCodeStore {
    async fn get(&self, key: &str) -> UserResult<Option<VerificationCode>> {
        Ok(self.codes.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, code: VerificationCode) -> UserResult<()> {
        self.codes.write().await.insert(key.to_string(), code);
        Ok(())
    }

    async fn remove(&self, key: &str) -> UserResult<()> {
        self.codes.write().await.remove(key);
        Ok(())
    }
}

/// Redis-backed store; entries carry a TTL so Redis drops them on expiry
#[derive(Clone)]
pub struct RedisCodeStore {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisCodeStore {
    pub fn new(connection: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            connection,
            key_prefix: key_prefix.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}password_reset:{}", self.key_prefix, key)
    }
}

#[async_trait]
impl VerificationCodeStore for RedisCodeStore {
    async fn get(&self, key: &str) -> UserResult<Option<VerificationCode>> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn.get(self.key(key)).await?;

        raw.map(|value| {
            serde_json::from_str(&value).map_err(|e| UserError::CodeStore(e.to_string()))
        })
        .transpose()
    }

    async fn put(&self, key: &str, code: VerificationCode) -> UserResult<()> {
        let payload =
            serde_json::to_string(&code).map_err(|e| UserError::CodeStore(e.to_string()))?;

        let mut conn = self.connection.clone();
        let _: () = conn.set_ex(self.key(key), payload, code.ttl_secs()).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> UserResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(self.key(key)).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RequestPasswordReset {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerifyResetCode {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ConfirmPasswordReset {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
    pub new_password: String,
}

/// Drives the request / verify / confirm flow
pub struct PasswordResetService<R: UserRepository> {
    users: UserService<R>,
    store: Arc<dyn VerificationCodeStore>,
    mailer: Arc<dyn EmailProvider>,
    templates: Arc<TemplateEngine>,
    code_ttl: Duration,
}

impl<R: UserRepository> Clone for PasswordResetService<R> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            store: Arc::clone(&self.store),
            mailer: Arc::clone(&self.mailer),
            templates: Arc::clone(&self.templates),
            code_ttl: self.code_ttl,
        }
    }
}

impl<R: UserRepository> PasswordResetService<R> {
    pub fn new(
        users: UserService<R>,
        store: Arc<dyn VerificationCodeStore>,
        mailer: Arc<dyn EmailProvider>,
        templates: TemplateEngine,
    ) -> Self {
        Self {
            users,
            store,
            mailer,
            templates: Arc::new(templates),
            code_ttl: Duration::minutes(CODE_TTL_MINUTES),
        }
    }

    /// Issue and email a code. Succeeds silently for unknown emails.
    #[instrument(skip(self))]
    pub async fn request_reset(&self, email: &str) -> UserResult<()> {
        let key = normalize_email(email);

        let Some(user) = self.users.find_by_email(&key).await? else {
            tracing::info!("Password reset requested for unknown email");
            return Ok(());
        };

        let code = VerificationCode::generate(self.code_ttl);
        self.store.put(&key, code.clone()).await?;

        let rendered = self
            .templates
            .render(
                templates::PASSWORD_RESET,
                &json!({
                    "name": user.name,
                    "code": code.code,
                    "expiry_minutes": self.code_ttl.num_minutes(),
                }),
            )
            .map_err(|e| UserError::Email(e.to_string()))?;

        if let Err(e) = self.mailer.send(&rendered.into_email(&user.email)).await {
            tracing::error!(user_id = %user.id, error = %e, "Failed to send password reset email");
            if let Err(remove_err) = self.store.remove(&key).await {
                tracing::warn!(error = %remove_err, "Failed to discard unsent reset code");
            }
            return Err(UserError::Email(e.to_string()));
        }

        tracing::info!(user_id = %user.id, "Password reset code sent");
        Ok(())
    }

    /// Check a code and mark the entry verified
    #[instrument(skip(self, code))]
    pub async fn verify_code(&self, email: &str, code: &str) -> UserResult<()> {
        let key = normalize_email(email);
        let mut entry = self.live_entry(&key).await?;

        if entry.code != code {
            return Err(self.record_failure(&key, entry).await);
        }

        entry.verified = true;
        self.store.put(&key, entry).await?;
        Ok(())
    }

    /// Set a new password using a verified code
    #[instrument(skip(self, code, new_password))]
    pub async fn confirm_reset(&self, email: &str, code: &str, new_password: &str) -> UserResult<()> {
        validate_password(new_password)?;

        let key = normalize_email(email);
        let entry = self.live_entry(&key).await?;

        if !entry.verified || entry.code != code {
            return Err(UserError::InvalidResetCode);
        }

        let Some(user) = self.users.find_by_email(&key).await? else {
            self.store.remove(&key).await?;
            return Err(UserError::InvalidResetCode);
        };

        self.users.set_password(user.id, new_password).await?;
        self.store.remove(&key).await?;
        tracing::info!(user_id = %user.id, "Password reset completed");

        self.notify_password_changed(&user.name, &user.email).await;
        Ok(())
    }

    async fn live_entry(&self, key: &str) -> UserResult<VerificationCode> {
        let entry = self
            .store
            .get(key)
            .await?
            .ok_or(UserError::InvalidResetCode)?;

        if entry.is_expired() {
            self.store.remove(key).await?;
            return Err(UserError::InvalidResetCode);
        }
        Ok(entry)
    }

    async fn record_failure(&self, key: &str, mut entry: VerificationCode) -> UserError {
        entry.attempts += 1;

        let stored = if entry.attempts >= MAX_ATTEMPTS {
            tracing::warn!("Too many wrong reset codes; discarding entry");
            self.store.remove(key).await
        } else {
            self.store.put(key, entry).await
        };

        match stored {
            Ok(()) => UserError::InvalidResetCode,
            Err(e) => e,
        }
    }

    async fn notify_password_changed(&self, name: &str, to: &str) {
        let rendered = match self
            .templates
            .render(templates::PASSWORD_CHANGED, &json!({ "name": name }))
        {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to render password changed email");
                return;
            }
        };

        if let Err(e) = self.mailer.send(&rendered.into_email(to)).await {
            tracing::warn!(error = %e, "Failed to send password changed email");
        }
    }
}
