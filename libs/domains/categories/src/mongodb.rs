//! MongoDB implementation of CategoryRepository

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::Category;
use crate::repository::CategoryRepository;

const DUPLICATE_KEY: i32 = 11000;

pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Category>("categories");
        Self { collection }
    }

    pub async fn init_indexes(&self) -> CategoryResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_name_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Category indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        matches!(
            err.kind.as_ref(),
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY
        )
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self, category), fields(name = %category.name))]
    async fn create(&self, category: Category) -> CategoryResult<Category> {
        match self.collection.insert_one(&category).await {
            Ok(_) => {
                tracing::info!(category_id = %category.id, "Category created successfully");
                Ok(category)
            }
            Err(e) if Self::is_duplicate_key(&e) => Err(CategoryError::DuplicateName(category.name)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>> {
        let category = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> CategoryResult<Vec<Category>> {
        use futures_util::TryStreamExt;

        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;

        let categories: Vec<Category> = cursor.try_collect().await?;
        Ok(categories)
    }

    #[instrument(skip(self, category), fields(category_id = %category.id))]
    async fn update(&self, category: Category) -> CategoryResult<Category> {
        let result = match self
            .collection
            .replace_one(Self::id_filter(category.id), &category)
            .await
        {
            Ok(result) => result,
            Err(e) if Self::is_duplicate_key(&e) => {
                return Err(CategoryError::DuplicateName(category.name));
            }
            Err(e) => return Err(e.into()),
        };

        if result.matched_count == 0 {
            return Err(CategoryError::NotFound(category.id));
        }

        tracing::info!(category_id = %category.id, "Category updated successfully");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(category_id = %id, "Category deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}
