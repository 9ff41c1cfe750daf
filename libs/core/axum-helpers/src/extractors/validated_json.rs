//! JSON extractor with validation through the `validator` crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserializes the body and runs [`Validate`], answering 400 with the
/// field errors in `details` when validation fails.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct LineItemInput {
///     #[validate(range(min = 1))]
///     quantity: u32,
/// }
///
/// async fn handler(ValidatedJson(input): ValidatedJson<LineItemInput>) {}
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
