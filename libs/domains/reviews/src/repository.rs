use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{Review, ReviewFilter};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: Review) -> ReviewResult<Review>;

    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>>;

    /// Reviews matching the filter, newest first
    async fn list(&self, filter: ReviewFilter) -> ReviewResult<Vec<Review>>;

    async fn update(&self, review: Review) -> ReviewResult<Review>;

    async fn delete(&self, id: Uuid) -> ReviewResult<bool>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryReviewRepository {
    reviews: Arc<RwLock<HashMap<Uuid, Review>>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn create(&self, review: Review) -> ReviewResult<Review> {
        self.reviews.write().await.insert(review.id, review.clone());
        Ok(review)
    }

    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        Ok(self.reviews.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: ReviewFilter) -> ReviewResult<Vec<Review>> {
        let mut result: Vec<Review> = self
            .reviews
            .read()
            .await
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update(&self, review: Review) -> ReviewResult<Review> {
        let mut reviews = self.reviews.write().await;

        if !reviews.contains_key(&review.id) {
            return Err(ReviewError::NotFound(review.id));
        }
        reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn delete(&self, id: Uuid) -> ReviewResult<bool> {
        Ok(self.reviews.write().await.remove(&id).is_some())
    }
}
