use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A customer's rating of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Author, taken from the caller's token
    pub user_id: Uuid,
    pub product_id: Uuid,
    /// 0 to 5
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    #[serde(alias = "productId")]
    pub product_id: Uuid,
    #[serde(alias = "qualification")]
    #[validate(range(max = 5))]
    pub rating: u8,
    #[serde(alias = "comments")]
    #[validate(length(min = 1, max = 300))]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    #[serde(alias = "qualification")]
    #[validate(range(max = 5))]
    pub rating: Option<u8>,
    #[serde(alias = "comments")]
    #[validate(length(min = 1, max = 300))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ReviewFilter {
    /// Only reviews of this product
    pub product_id: Option<Uuid>,
    /// Only reviews by this user
    pub user_id: Option<Uuid>,
}

impl ReviewFilter {
    pub fn matches(&self, review: &Review) -> bool {
        self.product_id.map_or(true, |id| review.product_id == id)
            && self.user_id.map_or(true, |id| review.user_id == id)
    }
}

impl Review {
    pub fn new(user_id: Uuid, input: CreateReview) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            product_id: input.product_id,
            rating: input.rating,
            comment: input.comment,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateReview) {
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        if let Some(comment) = update.comment {
            self.comment = comment;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub message: String,
    pub review: Review,
}

impl ReviewResponse {
    pub fn new(message: impl Into<String>, review: Review) -> Self {
        Self {
            message: message.into(),
            review,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewsResponse {
    pub message: String,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
