//! Review Service

use axum_helpers::AuthUser;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{CreateReview, Review, ReviewFilter, UpdateReview};
use crate::repository::ReviewRepository;

/// Reviews are written by the caller and changed only by the author or an admin.
pub struct ReviewService<R: ReviewRepository> {
    repository: Arc<R>,
}

impl<R: ReviewRepository> ReviewService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    pub async fn create_review(&self, author_id: Uuid, input: CreateReview) -> ReviewResult<Review> {
        input
            .validate()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;

        self.repository.create(Review::new(author_id, input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_review(&self, id: Uuid) -> ReviewResult<Review> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ReviewError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_reviews(&self, filter: ReviewFilter) -> ReviewResult<Vec<Review>> {
        self.repository.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_review(
        &self,
        caller: AuthUser,
        id: Uuid,
        input: UpdateReview,
    ) -> ReviewResult<Review> {
        input
            .validate()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;

        let mut review = self.authored_review(caller, id).await?;
        review.apply_update(input);

        let review = self.repository.update(review).await?;
        tracing::info!(review_id = %id, "Review updated");
        Ok(review)
    }

    #[instrument(skip(self))]
    pub async fn delete_review(&self, caller: AuthUser, id: Uuid) -> ReviewResult<()> {
        self.authored_review(caller, id).await?;

        if !self.repository.delete(id).await? {
            return Err(ReviewError::NotFound(id));
        }
        tracing::info!(review_id = %id, "Review deleted");
        Ok(())
    }

    async fn authored_review(&self, caller: AuthUser, id: Uuid) -> ReviewResult<Review> {
        let review = self.get_review(id).await?;
        if !caller.can_access(review.user_id) {
            return Err(ReviewError::NotAuthor(id));
        }
        Ok(review)
    }
}

impl<R: ReviewRepository> Clone for ReviewService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
