//! MongoDB implementation of ReviewRepository

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{Review, ReviewFilter};
use crate::repository::ReviewRepository;

pub struct MongoReviewRepository {
    collection: Collection<Review>,
}

impl MongoReviewRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Review>("reviews");
        Self { collection }
    }

    pub async fn init_indexes(&self) -> ReviewResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "product_id": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_product_created".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "user_id": 1 })
                .options(IndexOptions::builder().name("idx_user".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Review indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    fn build_filter(filter: &ReviewFilter) -> Document {
        let mut query = Document::new();

        if let Some(ref product_id) = filter.product_id {
            query.insert("product_id", to_bson(product_id).unwrap_or(Bson::Null));
        }
        if let Some(ref user_id) = filter.user_id {
            query.insert("user_id", to_bson(user_id).unwrap_or(Bson::Null));
        }

        query
    }
}

#[async_trait]
impl ReviewRepository for MongoReviewRepository {
    #[instrument(skip(self, review), fields(review_id = %review.id))]
    async fn create(&self, review: Review) -> ReviewResult<Review> {
        self.collection.insert_one(&review).await?;

        tracing::info!(review_id = %review.id, product_id = %review.product_id, "Review created");
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        let review = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ReviewFilter) -> ReviewResult<Vec<Review>> {
        use futures_util::TryStreamExt;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;

        let reviews: Vec<Review> = cursor.try_collect().await?;
        Ok(reviews)
    }

    #[instrument(skip(self, review), fields(review_id = %review.id))]
    async fn update(&self, review: Review) -> ReviewResult<Review> {
        let result = self
            .collection
            .replace_one(Self::id_filter(review.id), &review)
            .await?;

        if result.matched_count == 0 {
            return Err(ReviewError::NotFound(review.id));
        }
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ReviewResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter() {
        let filter = ReviewFilter {
            product_id: Some(Uuid::now_v7()),
            user_id: None,
        };

        let query = MongoReviewRepository::build_filter(&filter);

        assert!(query.contains_key("product_id"));
        assert!(!query.contains_key("user_id"));
    }
}
