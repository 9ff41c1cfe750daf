use super::{jwt::JwtAuth, user::AuthUser};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

/// Cookie set on register/login
pub const AUTH_COOKIE: &str = "authToken";

/// Alternative header carrying the raw token
pub const AUTH_HEADER: &str = "x-auth-token";

/// Token from `Authorization: Bearer`, then `x-auth-token`, then the `authToken` cookie
pub fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .or_else(|| headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok()))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| {
            CookieJar::from_headers(headers)
                .get(AUTH_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .filter(|token| !token.is_empty())
        })
}

/// Rejects the request with 401 unless it carries a valid token.
///
/// On success an [`AuthUser`] is available to handlers.
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token_from_request(request.headers()).ok_or_else(|| {
        tracing::debug!("No token in Authorization header, x-auth-token or cookie");
        AppError::Unauthorized("No token provided".to_string())
    })?;

    let claims = auth.verify_token(&token).map_err(|e| {
        tracing::debug!(error = %e, "JWT verification failed");
        AppError::Unauthorized("Invalid token".to_string())
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Attaches an [`AuthUser`] when a valid token is present, never rejects.
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(claims) = extract_token_from_request(request.headers())
        .and_then(|token| auth.verify_token(&token).ok())
    {
        request.extensions_mut().insert(AuthUser::from(claims));
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(AUTH_HEADER, HeaderValue::from_static("def"));
        assert_eq!(extract_token_from_request(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_x_auth_token_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, HeaderValue::from_static("def"));
        assert_eq!(extract_token_from_request(&headers).as_deref(), Some("def"));
    }

    #[test]
    fn test_auth_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; authToken=ghi"),
        );
        assert_eq!(extract_token_from_request(&headers).as_deref(), Some("ghi"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert!(extract_token_from_request(&headers).is_none());
    }
}
