//! MongoDB implementation of OrderRepository

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{Order, OrderState, OrderStats, StateStats};
use crate::repository::OrderRepository;

/// MongoDB implementation of the OrderRepository
pub struct MongoOrderRepository {
    collection: Collection<Order>,
}

impl MongoOrderRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Order>("orders");
        Self { collection }
    }

    pub async fn init_indexes(&self) -> OrderResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "owner_id": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_owner_created".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "cart_id": 1 })
                .options(IndexOptions::builder().name("idx_cart".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "state": 1 })
                .options(IndexOptions::builder().name("idx_state".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Order indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    fn stats_pipeline() -> Vec<Document> {
        vec![doc! {
            "$group": {
                "_id": "$state",
                "count": { "$sum": 1 },
                "total_amount": { "$sum": "$final_total" }
            }
        }]
    }

    fn state_stats_from_doc(row: &Document) -> Option<StateStats> {
        let state = row.get_str("_id").ok()?.parse::<OrderState>().ok()?;
        let count = row.get("count").and_then(bson_to_i64)?;
        let total_amount = row.get("total_amount").and_then(bson_to_i64)?;

        Some(StateStats {
            state,
            count: u64::try_from(count).unwrap_or_default(),
            total_amount,
        })
    }

    async fn find_sorted(&self, filter: Document) -> OrderResult<Vec<Order>> {
        use futures_util::TryStreamExt;

        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        let orders: Vec<Order> = cursor.try_collect().await?;
        Ok(orders)
    }
}

fn bson_to_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) => Some(*v as i64),
        _ => None,
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[instrument(skip(self, order), fields(order_id = %order.id, cart_id = %order.cart_id))]
    async fn create(&self, order: Order) -> OrderResult<Order> {
        self.collection.insert_one(&order).await?;
        tracing::info!(order_id = %order.id, "Order created successfully");
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let order = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> OrderResult<Vec<Order>> {
        self.find_sorted(doc! {}).await
    }

    #[instrument(skip(self))]
    async fn list_by_owner(&self, owner_id: Uuid) -> OrderResult<Vec<Order>> {
        self.find_sorted(doc! { "owner_id": to_bson(&owner_id).unwrap_or(Bson::Null) })
            .await
    }

    #[instrument(skip(self, order), fields(order_id = %order.id, state = %order.state))]
    async fn update(&self, order: Order) -> OrderResult<Order> {
        let result = self
            .collection
            .replace_one(Self::id_filter(order.id), &order)
            .await?;

        if result.matched_count == 0 {
            return Err(OrderError::NotFound(order.id));
        }

        tracing::info!(order_id = %order.id, "Order updated successfully");
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> OrderResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(order_id = %id, "Order deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> OrderResult<OrderStats> {
        use futures_util::TryStreamExt;

        let cursor = self.collection.aggregate(Self::stats_pipeline()).await?;
        let rows: Vec<Document> = cursor.try_collect().await?;

        let stats = rows
            .iter()
            .filter_map(|row| {
                let parsed = Self::state_stats_from_doc(row);
                if parsed.is_none() {
                    tracing::warn!(?row, "Skipping unrecognised order stats row");
                }
                parsed
            })
            .collect();

        Ok(OrderStats::from_state_stats(stats))
    }
}
