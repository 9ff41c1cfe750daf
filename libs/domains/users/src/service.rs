use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::addresses::{AddressBook, CreateAddress, ShippingAddress, UpdateAddress};
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, RegisterRequest, UpdateUser, User, UserFilter, UserResponse};
use crate::password::{hash_password, validate_password, verify_password};
use crate::repository::UserRepository;

/// Service layer for users, credentials and address books
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn validated<T: Validate>(input: &T) -> UserResult<()> {
    input
        .validate()
        .map_err(|e| UserError::Validation(e.to_string()))
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a user with the requested role (defaults to customer)
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        validated(&input)?;
        validate_password(&input.password)?;

        if self.repository.email_exists(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(
            input.name,
            &input.email,
            password_hash,
            input.role.unwrap_or_default(),
        )
        .with_profile(input.phone, input.address, input.img_url);

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    /// Self-registration; always creates a customer
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserResponse> {
        self.create_user(input.into()).await
    }

    /// Check an email/password pair. Unknown email and wrong password are
    /// indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(&self, email: &str, password: &str) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Failed login attempt");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user.into())
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        Ok(self.load(id).await?.into())
    }

    pub async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.repository.get_by_email(email).await
    }

    /// List users with filters, returning the page and the total match count
    pub async fn list_users(&self, filter: UserFilter) -> UserResult<(Vec<UserResponse>, usize)> {
        let total = self.repository.count(filter.clone()).await?;
        let users = self.repository.list(filter).await?;
        Ok((users.into_iter().map(UserResponse::from).collect(), total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        validated(&input)?;

        let mut user = self.load(id).await?;

        let new_password_hash = match input.password {
            Some(ref password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        if let Some(ref new_email) = input.email {
            if !new_email.trim().eq_ignore_ascii_case(&user.email)
                && self.repository.email_exists(new_email).await?
            {
                return Err(UserError::DuplicateEmail(new_email.clone()));
            }
        }

        user.apply_update(input, new_password_hash);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Replace the password without checking the old one
    #[instrument(skip(self, new_password))]
    pub async fn set_password(&self, id: Uuid, new_password: &str) -> UserResult<()> {
        validate_password(new_password)?;
        let hash = hash_password(new_password)?;
        self.repository.update_password(id, hash).await
    }

    // Address book

    pub async fn list_addresses(&self, user_id: Uuid) -> UserResult<Vec<ShippingAddress>> {
        let user = self.load(user_id).await?;
        Ok(AddressBook::new(user.addresses).into_entries())
    }

    #[instrument(skip(self, input))]
    pub async fn add_address(
        &self,
        user_id: Uuid,
        input: CreateAddress,
    ) -> UserResult<ShippingAddress> {
        validated(&input)?;
        self.edit_book(user_id, |book| book.add(input)).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_address(
        &self,
        user_id: Uuid,
        address_id: Uuid,
        input: UpdateAddress,
    ) -> UserResult<ShippingAddress> {
        validated(&input)?;
        self.edit_book(user_id, |book| book.update(address_id, input))
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove_address(
        &self,
        user_id: Uuid,
        address_id: Uuid,
    ) -> UserResult<ShippingAddress> {
        self.edit_book(user_id, |book| book.remove(address_id)).await
    }

    #[instrument(skip(self))]
    pub async fn set_default_address(
        &self,
        user_id: Uuid,
        address_id: Uuid,
    ) -> UserResult<ShippingAddress> {
        self.edit_book(user_id, |book| book.set_default(address_id))
            .await
    }

    /// Load the book, apply one rule and write the whole list back
    async fn edit_book<F>(&self, user_id: Uuid, edit: F) -> UserResult<ShippingAddress>
    where
        F: FnOnce(&mut AddressBook) -> UserResult<ShippingAddress>,
    {
        let user = self.load(user_id).await?;
        let mut book = AddressBook::new(user.addresses);

        let touched = edit(&mut book)?;

        self.repository
            .replace_addresses(user_id, book.into_entries())
            .await?;
        tracing::info!(user_id = %user_id, address_id = %touched.id, "Address book updated");
        Ok(touched)
    }

    async fn load(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }
}
