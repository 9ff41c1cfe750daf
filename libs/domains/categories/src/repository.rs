use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::Category;

/// Repository trait for Category persistence. Names are unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Fails with `DuplicateName` if the name is taken
    async fn create(&self, category: Category) -> CategoryResult<Category>;

    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>>;

    /// All categories ordered by name
    async fn list(&self) -> CategoryResult<Vec<Category>>;

    /// Fails with `DuplicateName` if another category has the name
    async fn update(&self, category: Category) -> CategoryResult<Category>;

    async fn delete(&self, id: Uuid) -> CategoryResult<bool>;
}

/// In-memory implementation of CategoryRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_taken(categories: &HashMap<Uuid, Category>, candidate: &Category) -> bool {
    categories
        .values()
        .any(|c| c.id != candidate.id && c.name == candidate.name)
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, category: Category) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        if name_taken(&categories, &category) {
            return Err(CategoryError::DuplicateName(category.name));
        }
        categories.insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn list(&self) -> CategoryResult<Vec<Category>> {
        let mut result: Vec<Category> = self.categories.read().await.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn update(&self, category: Category) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        if !categories.contains_key(&category.id) {
            return Err(CategoryError::NotFound(category.id));
        }
        if name_taken(&categories, &category) {
            return Err(CategoryError::DuplicateName(category.name));
        }
        categories.insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Updated category");
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let removed = self.categories.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let repo = InMemoryCategoryRepository::new();
        repo.create(Category::new("Lighting".to_string()))
            .await
            .unwrap();

        let result = repo.create(Category::new("Lighting".to_string())).await;

        assert!(matches!(result, Err(CategoryError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_rename_to_own_name_is_allowed() {
        let repo = InMemoryCategoryRepository::new();
        let mut category = repo
            .create(Category::new("Lighting".to_string()))
            .await
            .unwrap();

        category.rename("Lighting".to_string());

        assert!(repo.update(category).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let repo = InMemoryCategoryRepository::new();
        for name in ["Toys", "Books", "Garden"] {
            repo.create(Category::new(name.to_string())).await.unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Books", "Garden", "Toys"]);
    }
}
