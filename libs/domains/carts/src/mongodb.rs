//! MongoDB implementation of CartRepository

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CartError, CartResult};
use crate::models::{Cart, CartStatus};
use crate::repository::CartRepository;

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB implementation of the CartRepository
pub struct MongoCartRepository {
    collection: Collection<Cart>,
}

impl MongoCartRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Cart>("carts");
        Self { collection }
    }

    /// Create indexes, including the partial unique index that backs the
    /// one-pending-cart-per-owner rule
    pub async fn init_indexes(&self) -> CartResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "owner_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(Self::pending_filter())
                        .name("idx_owner_pending_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "owner_id": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_owner_created".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Cart indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    fn owner_filter(owner_id: Uuid) -> Document {
        doc! { "owner_id": to_bson(&owner_id).unwrap_or(Bson::Null) }
    }

    fn pending_filter() -> Document {
        doc! { "status": CartStatus::Pending.to_string() }
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
impl CartRepository for MongoCartRepository {
    #[instrument(skip(self, cart), fields(cart_id = %cart.id, owner_id = %cart.owner_id))]
    async fn create(&self, cart: Cart) -> CartResult<Cart> {
        match self.collection.insert_one(&cart).await {
            Ok(_) => {
                tracing::info!(cart_id = %cart.id, "Cart created successfully");
                Ok(cart)
            }
            Err(err) if Self::is_duplicate_key(&err) => {
                Err(CartError::PendingCartExists(cart.owner_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CartResult<Option<Cart>> {
        let cart = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn find_pending(&self, owner_id: Uuid) -> CartResult<Option<Cart>> {
        let mut filter = Self::owner_filter(owner_id);
        filter.extend(Self::pending_filter());
        let cart = self.collection.find_one(filter).await?;
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn list_by_owner(&self, owner_id: Uuid) -> CartResult<Vec<Cart>> {
        use futures_util::TryStreamExt;

        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(Self::owner_filter(owner_id))
            .with_options(options)
            .await?;
        let carts: Vec<Cart> = cursor.try_collect().await?;

        Ok(carts)
    }

    #[instrument(skip(self, cart), fields(cart_id = %cart.id, status = %cart.status))]
    async fn update(&self, cart: Cart) -> CartResult<Cart> {
        let result = match self
            .collection
            .replace_one(Self::id_filter(cart.id), &cart)
            .await
        {
            Ok(result) => result,
            Err(err) if Self::is_duplicate_key(&err) => {
                return Err(CartError::PendingCartExists(cart.owner_id));
            }
            Err(err) => return Err(err.into()),
        };

        if result.matched_count == 0 {
            return Err(CartError::NotFound(cart.id));
        }

        tracing::info!(cart_id = %cart.id, "Cart updated successfully");
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CartResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(cart_id = %id, "Cart deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}
