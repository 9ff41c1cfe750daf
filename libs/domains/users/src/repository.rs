use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::addresses::ShippingAddress;
use crate::error::{UserError, UserResult};
use crate::models::{User, UserFilter, normalize_email};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; fails with `DuplicateEmail` if the email is taken
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Case-insensitive lookup
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// List users with optional filters, newest first
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>>;

    /// Count users matching the filter (ignores pagination)
    async fn count(&self, filter: UserFilter) -> UserResult<usize>;

    /// Replace an existing user
    async fn update(&self, user: User) -> UserResult<User>;

    /// Overwrite the address list in a single write
    async fn replace_addresses(
        &self,
        id: Uuid,
        addresses: Vec<ShippingAddress>,
    ) -> UserResult<()>;

    async fn update_password(&self, id: Uuid, password_hash: String) -> UserResult<()>;

    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    async fn email_exists(&self, email: &str) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn matches_filter(user: &User, filter: &UserFilter) -> bool {
    if let Some(ref email) = filter.email {
        if !user.email.contains(&normalize_email(email)) {
            return false;
        }
    }
    if let Some(role) = filter.role {
        if user.role != role {
            return false;
        }
    }
    true
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| matches_filter(u, &filter))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    async fn count(&self, filter: UserFilter) -> UserResult<usize> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| matches_filter(u, &filter)).count())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }

        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn replace_addresses(
        &self,
        id: Uuid,
        addresses: Vec<ShippingAddress>,
    ) -> UserResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;

        user.addresses = addresses;
        user.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> UserResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;

        user.password_hash = password_hash;
        user.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }
}
