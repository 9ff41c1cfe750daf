//! Registration, login, logout and password reset endpoints (public)

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{AppendHeaders, IntoResponse, Response},
    routing::post,
};
use axum_helpers::{
    AUTH_COOKIE, AppError, JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        UnauthorizedResponse,
    },
};
use utoipa::OpenApi;

use crate::error::UserError;
use crate::models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse};
use crate::password_reset::{
    ConfirmPasswordReset, PasswordResetService, RequestPasswordReset, VerifyResetCode,
};
use crate::repository::UserRepository;
use crate::service::UserService;

const RESET_REQUESTED: &str = "If the email is registered, a verification code has been sent";

/// OpenAPI documentation for the Auth API
#[derive(OpenApi)]
#[openapi(
    paths(
        register,
        login,
        logout,
        request_password_reset,
        verify_reset_code,
        confirm_password_reset,
    ),
    components(
        schemas(
            RegisterRequest, LoginRequest, AuthResponse, UserResponse, MessageResponse,
            RequestPasswordReset, VerifyResetCode, ConfirmPasswordReset
        ),
        responses(
            BadRequestValidationResponse,
            ConflictResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and password reset")
    )
)]
pub struct AuthApiDoc;

/// State for the auth handlers
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub reset: PasswordResetService<R>,
    pub jwt_auth: JwtAuth,
    /// Add `Secure` to the auth cookie
    pub secure_cookies: bool,
}

impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            reset: self.reset.clone(),
            jwt_auth: self.jwt_auth.clone(),
            secure_cookies: self.secure_cookies,
        }
    }
}

impl<R: UserRepository> AuthState<R> {
    fn auth_cookie(&self, token: &str) -> Result<HeaderValue, UserError> {
        let secure_flag = if self.secure_cookies { " Secure;" } else { "" };
        let cookie = format!(
            "{}={}; HttpOnly;{} SameSite=Lax; Path=/; Max-Age={}",
            AUTH_COOKIE,
            token,
            secure_flag,
            self.jwt_auth.expires_in_secs()
        );
        HeaderValue::from_str(&cookie).map_err(|e| UserError::Token(e.to_string()))
    }

    fn cleared_cookie(&self) -> Result<HeaderValue, UserError> {
        let secure_flag = if self.secure_cookies { " Secure;" } else { "" };
        let cookie = format!(
            "{}=; HttpOnly;{} SameSite=Lax; Path=/; Max-Age=0",
            AUTH_COOKIE, secure_flag
        );
        HeaderValue::from_str(&cookie).map_err(|e| UserError::Token(e.to_string()))
    }

    /// Issue a token for `user` and build the response with the cookie set
    fn authenticated(
        &self,
        status: StatusCode,
        message: &str,
        user: UserResponse,
    ) -> Result<Response, UserError> {
        let token = self
            .jwt_auth
            .create_token(user.id, user.role)
            .map_err(|e| UserError::Token(e.to_string()))?;
        let cookie = self.auth_cookie(&token)?;

        let body = AuthResponse {
            message: message.to_string(),
            token,
            user,
        };

        Ok((
            status,
            AppendHeaders([(header::SET_COOKIE, cookie)]),
            Json(body),
        )
            .into_response())
    }
}

/// Create the auth router. Mount it outside the JWT middleware.
pub fn router<R: UserRepository + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/password-reset/request", post(request_password_reset))
        .route("/password-reset/verify", post(verify_reset_code))
        .route("/password-reset/confirm", post(confirm_password_reset))
        .with_state(state)
}

/// Register a customer account
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered; auth cookie set", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> Result<Response, AppError> {
    let user = state.service.register(input).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(state.authenticated(StatusCode::CREATED, "User registered successfully", user)?)
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; auth cookie set", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<Response, AppError> {
    let user = state
        .service
        .verify_credentials(&input.email, &input.password)
        .await?;

    Ok(state.authenticated(StatusCode::OK, "Login successful", user)?)
}

/// Clear the auth cookie
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
async fn logout<R: UserRepository>(
    State(state): State<AuthState<R>>,
) -> Result<Response, AppError> {
    let cookie = state.cleared_cookie()?;
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(MessageResponse::new("Logout successful")),
    )
        .into_response())
}

/// Email a password reset code
#[utoipa::path(
    post,
    path = "/password-reset/request",
    tag = "Auth",
    request_body = RequestPasswordReset,
    responses(
        (status = 200, description = "Same answer for known and unknown emails", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn request_password_reset<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RequestPasswordReset>,
) -> Result<Json<MessageResponse>, AppError> {
    state.reset.request_reset(&input.email).await?;
    Ok(Json(MessageResponse::new(RESET_REQUESTED)))
}

/// Check a password reset code
#[utoipa::path(
    post,
    path = "/password-reset/verify",
    tag = "Auth",
    request_body = VerifyResetCode,
    responses(
        (status = 200, description = "Code verified", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn verify_reset_code<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<VerifyResetCode>,
) -> Result<Json<MessageResponse>, AppError> {
    state.reset.verify_code(&input.email, &input.code).await?;
    Ok(Json(MessageResponse::new("Code verified successfully")))
}

/// Set a new password with a verified code
#[utoipa::path(
    post,
    path = "/password-reset/confirm",
    tag = "Auth",
    request_body = ConfirmPasswordReset,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn confirm_password_reset<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<ConfirmPasswordReset>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .reset
        .confirm_reset(&input.email, &input.code, &input.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}
