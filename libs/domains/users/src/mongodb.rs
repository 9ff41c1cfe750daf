//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, to_bson},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::addresses::ShippingAddress;
use crate::error::{UserError, UserResult};
use crate::models::{User, UserFilter, normalize_email};
use crate::repository::UserRepository;

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<User>("users");
        Self { collection }
    }

    /// Create indexes. Emails are stored lowercased, so a plain unique
    /// index gives case-insensitive uniqueness.
    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_email_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "role": 1 })
                .options(IndexOptions::builder().name("idx_role".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    fn build_filter(filter: &UserFilter) -> Document {
        let mut query = Document::new();

        if let Some(ref email) = filter.email {
            query.insert(
                "email",
                doc! { "$regex": regex_escape(&normalize_email(email)) },
            );
        }
        if let Some(role) = filter.role {
            query.insert("role", role.as_str());
        }

        query
    }

    fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        matches!(
            err.kind.as_ref(),
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY
        )
    }

    async fn set_fields(&self, id: Uuid, fields: Document) -> UserResult<()> {
        let result = self
            .collection
            .update_one(Self::id_filter(id), doc! { "$set": fields })
            .await?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }
}

fn regex_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn now_bson() -> Bson {
    to_bson(&chrono::Utc::now()).unwrap_or(Bson::Null)
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> UserResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => {
                tracing::info!(user_id = %user.id, "User created successfully");
                Ok(user)
            }
            Err(e) if Self::is_duplicate_key(&e) => Err(UserError::DuplicateEmail(user.email)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let user = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "email": normalize_email(email) })
            .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        use futures_util::TryStreamExt;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(filter.offset as u64)
            .limit(filter.limit as i64)
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: UserFilter) -> UserResult<usize> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count as usize)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<User> {
        let result = match self
            .collection
            .replace_one(Self::id_filter(user.id), &user)
            .await
        {
            Ok(result) => result,
            Err(e) if Self::is_duplicate_key(&e) => {
                return Err(UserError::DuplicateEmail(user.email));
            }
            Err(e) => return Err(e.into()),
        };

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id));
        }

        tracing::info!(user_id = %user.id, "User updated successfully");
        Ok(user)
    }

    #[instrument(skip(self, addresses), fields(count = addresses.len()))]
    async fn replace_addresses(
        &self,
        id: Uuid,
        addresses: Vec<ShippingAddress>,
    ) -> UserResult<()> {
        let addresses = to_bson(&addresses).map_err(|e| UserError::Database(e.to_string()))?;
        self.set_fields(id, doc! { "addresses": addresses, "updated_at": now_bson() })
            .await?;

        tracing::info!(user_id = %id, "Address book saved");
        Ok(())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Uuid, password_hash: String) -> UserResult<()> {
        self.set_fields(
            id,
            doc! { "password_hash": password_hash, "updated_at": now_bson() },
        )
        .await?;

        tracing::info!(user_id = %id, "Password updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "User deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "email": normalize_email(email) })
            .await?;
        Ok(count > 0)
    }
}
