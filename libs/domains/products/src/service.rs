//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing catalog operations
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, mut input: CreateProduct) -> ProductResult<Product> {
        input.name = input.name.trim().to_string();
        input.validate()?;

        self.repository.create(Product::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// List a page of products and the total number of matches
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<(Vec<Product>, u64)> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Err(ProductError::InvalidPriceRange { min, max });
            }
        }

        let total = self.repository.count(filter.clone()).await?;
        let products = self.repository.list(filter).await?;
        Ok((products, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input.validate()?;

        let mut product = self.get_product(id).await?;
        product.apply_update(input);

        self.repository.update(product).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryProductRepository, MockProductRepository};

    fn lamp(category_id: Uuid) -> CreateProduct {
        CreateProduct {
            name: "  Desk Lamp ".to_string(),
            description: "Warm light".to_string(),
            price: 1500,
            stock: 4,
            category_id,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let service = ProductService::new(InMemoryProductRepository::new());

        let created = service.create_product(lamp(Uuid::now_v7())).await.unwrap();
        let fetched = service.get_product(created.id).await.unwrap();

        assert_eq!(fetched.name, "Desk Lamp");
        assert_eq!(fetched.price, 1500);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_stock() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let mut input = lamp(Uuid::now_v7());
        input.stock = -1;

        let result = service.create_product(input).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_reports_total_before_pagination() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let category = Uuid::now_v7();
        for _ in 0..3 {
            service.create_product(lamp(category)).await.unwrap();
        }

        let (page, total) = service
            .list_products(ProductFilter {
                category_id: Some(category),
                limit: 2,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_price_range() {
        let service = ProductService::new(InMemoryProductRepository::new());

        let result = service
            .list_products(ProductFilter {
                min_price: Some(500),
                max_price: Some(100),
                ..Default::default()
            })
            .await;

        assert!(matches!(
            result,
            Err(ProductError::InvalidPriceRange { min: 500, max: 100 })
        ));
    }

    #[tokio::test]
    async fn test_update_product() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create_product(lamp(Uuid::now_v7())).await.unwrap();

        let updated = service
            .update_product(
                created.id,
                UpdateProduct {
                    stock: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.stock, 0);
        assert_eq!(updated.price, 1500);
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut mock = MockProductRepository::new();
        mock.expect_delete().returning(|_| Ok(false));
        let service = ProductService::new(mock);

        let result = service.delete_product(Uuid::now_v7()).await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }
}
