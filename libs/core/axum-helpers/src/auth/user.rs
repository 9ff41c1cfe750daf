use super::{jwt::JwtClaims, role::Role};
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Identity of the caller, as asserted by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner of the resource or an administrator
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.id == owner_id || self.is_admin()
    }

    pub fn ensure_can_access(&self, owner_id: Uuid) -> Result<(), AppError> {
        if self.can_access(owner_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Not allowed to access this resource".to_string(),
            ))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require_any(&[Role::Admin])
    }

    pub fn require_any(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Role {} is not allowed to perform this action",
                self.role
            )))
        }
    }
}

impl From<JwtClaims> for AuthUser {
    fn from(claims: JwtClaims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

impl<S> axum::extract::OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_can_access() {
        let id = Uuid::now_v7();
        let user = AuthUser::new(id, Role::Customer);
        assert!(user.can_access(id));
        assert!(!user.can_access(Uuid::now_v7()));
        assert!(matches!(
            user.ensure_can_access(Uuid::now_v7()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_can_access_anything() {
        let admin = AuthUser::new(Uuid::now_v7(), Role::Admin);
        assert!(admin.can_access(Uuid::now_v7()));
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn test_require_any() {
        let employee = AuthUser::new(Uuid::now_v7(), Role::Employee);
        assert!(employee.require_any(&[Role::Admin, Role::Employee]).is_ok());
        assert!(employee.require_admin().is_err());
    }
}
