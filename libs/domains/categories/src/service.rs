//! Category Service

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, MAX_NAME_LEN};
use crate::repository::CategoryRepository;

pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, name: &str) -> CategoryResult<Category> {
        let name = normalize_name(name)?;
        self.repository.create(Category::new(name)).await
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: Uuid) -> CategoryResult<Category> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> CategoryResult<Vec<Category>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn rename_category(&self, id: Uuid, name: &str) -> CategoryResult<Category> {
        let name = normalize_name(name)?;

        let mut category = self.get_category(id).await?;
        category.rename(name);

        self.repository.update(category).await
    }

    /// Delete a category and return what was removed
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> CategoryResult<Category> {
        let category = self.get_category(id).await?;

        if !self.repository.delete(id).await? {
            return Err(CategoryError::NotFound(id));
        }
        Ok(category)
    }
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn normalize_name(name: &str) -> CategoryResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(CategoryError::Validation(
            "Category name is required".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CategoryError::Validation(format!(
            "Category name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryCategoryRepository, MockCategoryRepository};

    #[tokio::test]
    async fn test_create_trims_name() {
        let service = CategoryService::new(InMemoryCategoryRepository::new());

        let category = service.create_category("  Lighting  ").await.unwrap();

        assert_eq!(category.name, "Lighting");
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let service = CategoryService::new(InMemoryCategoryRepository::new());

        let result = service.create_category("   ").await;

        assert!(matches!(result, Err(CategoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_long_name_rejected() {
        let service = CategoryService::new(InMemoryCategoryRepository::new());

        let result = service
            .create_category("Garden and Outdoor Living")
            .await;

        assert!(matches!(result, Err(CategoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_after_trim_conflicts() {
        let service = CategoryService::new(InMemoryCategoryRepository::new());
        service.create_category("Books").await.unwrap();

        let result = service.create_category(" Books ").await;

        assert!(matches!(result, Err(CategoryError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_rename_missing_category() {
        let mut mock = MockCategoryRepository::new();
        mock.expect_get_by_id().returning(|_| Ok(None));
        mock.expect_update().never();
        let service = CategoryService::new(mock);

        let result = service.rename_category(Uuid::now_v7(), "Toys").await;

        assert!(matches!(result, Err(CategoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_category() {
        let service = CategoryService::new(InMemoryCategoryRepository::new());
        let created = service.create_category("Toys").await.unwrap();

        let deleted = service.delete_category(created.id).await.unwrap();

        assert_eq!(deleted.id, created.id);
        assert!(service.list_categories().await.unwrap().is_empty());
    }
}
