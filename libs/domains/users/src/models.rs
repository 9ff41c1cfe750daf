use axum_helpers::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::addresses::ShippingAddress;

/// Stored user document. Never returned directly; see [`UserResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// Lowercased, unique
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
    /// Free-form primary address
    pub address: Option<String>,
    #[serde(default)]
    pub addresses: Vec<ShippingAddress>,
    pub img_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user (password must already be hashed)
    pub fn new(name: String, email: &str, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email: normalize_email(email),
            password_hash,
            phone: None,
            role,
            address: None,
            addresses: Vec::new(),
            img_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_profile(
        mut self,
        phone: Option<String>,
        address: Option<String>,
        img_url: Option<String>,
    ) -> Self {
        self.phone = phone;
        self.address = address;
        self.img_url = img_url;
        self
    }

    /// Apply updates (password must already be hashed if provided)
    pub fn apply_update(&mut self, update: UpdateUser, new_password_hash: Option<String>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = normalize_email(&email);
        }
        if let Some(hash) = new_password_hash {
            self.password_hash = hash;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(img_url) = update.img_url {
            self.img_url = Some(img_url);
        }
        self.updated_at = Utc::now();
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub address: Option<String>,
    pub addresses: Vec<ShippingAddress>,
    pub img_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            address: user.address,
            addresses: user.addresses,
            img_url: user.img_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a user (administrators)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub role: Option<Role>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
    #[serde(alias = "imgUrl")]
    pub img_url: Option<String>,
}

/// DTO for self-registration. The role is always [`Role::Customer`].
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
}

impl From<RegisterRequest> for CreateUser {
    fn from(input: RegisterRequest) -> Self {
        Self {
            name: input.name,
            email: input.email,
            password: input.password,
            phone: input.phone,
            role: Some(Role::Customer),
            address: input.address,
            img_url: None,
        }
    }
}

/// DTO for updating an existing user
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    pub password: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub role: Option<Role>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
    #[serde(alias = "imgUrl")]
    pub img_url: Option<String>,
}

/// Query filters for listing users
#[derive(Debug, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct UserFilter {
    /// Substring match on the email
    pub email: Option<String>,
    pub role: Option<Role>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            email: None,
            role: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

/// Response after register or login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub message: String,
    pub user: UserResponse,
}

impl UserEnvelope {
    pub fn new(message: impl Into<String>, user: UserResponse) -> Self {
        Self {
            message: message.into(),
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsersEnvelope {
    pub message: String,
    pub users: Vec<UserResponse>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressEnvelope {
    pub message: String,
    pub address: ShippingAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressesEnvelope {
    pub message: String,
    pub addresses: Vec<ShippingAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new(
            "Ana".to_string(),
            "  Ana@Example.COM ",
            "hash".to_string(),
            Role::Customer,
        );

        assert_eq!(user.email, "ana@example.com");
        assert!(user.addresses.is_empty());
    }

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = User::new(
            "Ana".to_string(),
            "ana@example.com",
            "secret-hash".to_string(),
            Role::Customer,
        );

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "Cliente");
    }

    #[test]
    fn test_apply_update() {
        let mut user = User::new(
            "Ana".to_string(),
            "ana@example.com",
            "hash".to_string(),
            Role::Customer,
        );

        user.apply_update(
            UpdateUser {
                email: Some("ANA.B@example.com".to_string()),
                role: Some(Role::Employee),
                ..Default::default()
            },
            Some("new-hash".to_string()),
        );

        assert_eq!(user.email, "ana.b@example.com");
        assert_eq!(user.role, Role::Employee);
        assert_eq!(user.password_hash, "new-hash");
        assert_eq!(user.name, "Ana");
    }

    #[test]
    fn test_register_request_forces_customer_role() {
        let input: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Ana",
            "email": "ana@example.com",
            "password": "Secret123!",
            "role": "Administrador"
        }))
        .unwrap();

        let create: CreateUser = input.into();
        assert_eq!(create.role, Some(Role::Customer));
    }
}
