use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use super::{CollectionName, DocumentStore, UniqueInsert};
use crate::models::{DeleteAck, InsertAck, UpdateAck};
use crate::utils::AppError;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        let mongodb = Self { client, db };

        mongodb.ping().await?;
        log::info!("🏓 Pinged deployment, connected to database {}", db_name);

        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Unique index on `users.email` backing the conditional user insert.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection(CollectionName::Users);

        let options = IndexOptions::builder()
            .name("email_unique".to_string())
            .unique(true)
            .partial_filter_expression(doc! { "email": { "$exists": true } })
            .build();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        // Fails when duplicate emails already exist; `insert_unique` still looks
        // the email up before inserting.
        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index ready: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }
    }

    fn collection(&self, name: CollectionName) -> Collection<Document> {
        self.db.collection(name.as_str())
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

fn field_filter(key: &str, value: Bson) -> Document {
    let mut filter = Document::new();
    filter.insert(key, value);
    filter
}

#[async_trait]
impl DocumentStore for MongoDB {
    async fn find(
        &self,
        collection: CollectionName,
        filter: Document,
    ) -> Result<Vec<Document>, AppError> {
        let cursor = self.collection(collection).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_latest(
        &self,
        collection: CollectionName,
        limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        let cursor = self
            .collection(collection)
            .find(doc! {})
            .sort(doc! { "_id": -1 })
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(
        &self,
        collection: CollectionName,
        id: ObjectId,
    ) -> Result<Option<Document>, AppError> {
        Ok(self.collection(collection).find_one(doc! { "_id": id }).await?)
    }

    async fn insert(
        &self,
        collection: CollectionName,
        doc: Document,
    ) -> Result<InsertAck, AppError> {
        let result = self.collection(collection).insert_one(doc).await?;
        Ok(InsertAck::from(result))
    }

    async fn insert_unique(
        &self,
        collection: CollectionName,
        key: &str,
        doc: Document,
    ) -> Result<UniqueInsert, AppError> {
        let coll = self.collection(collection);

        let Some(value) = doc.get(key).cloned() else {
            let result = coll.insert_one(doc).await?;
            return Ok(UniqueInsert::Inserted(result.inserted_id));
        };

        if let Some(existing) = coll.find_one(field_filter(key, value.clone())).await? {
            return Ok(UniqueInsert::Existing(existing));
        }

        // The unique index closes the window between the lookup and the insert.
        match coll.insert_one(doc).await {
            Ok(result) => Ok(UniqueInsert::Inserted(result.inserted_id)),
            Err(e) if is_duplicate_key(&e) => match coll.find_one(field_filter(key, value)).await? {
                Some(existing) => Ok(UniqueInsert::Existing(existing)),
                // The holder was deleted between the insert and the lookup.
                None => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn upsert_by_id(
        &self,
        collection: CollectionName,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateAck, AppError> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .upsert(true)
            .await?;
        Ok(UpdateAck::from(result))
    }

    async fn update_where(
        &self,
        collection: CollectionName,
        key: &str,
        value: Bson,
        fields: Document,
    ) -> Result<UpdateAck, AppError> {
        let result = self
            .collection(collection)
            .update_one(field_filter(key, value), doc! { "$set": fields })
            .await?;
        Ok(UpdateAck::from(result))
    }

    async fn delete_by_id(
        &self,
        collection: CollectionName,
        id: ObjectId,
    ) -> Result<DeleteAck, AppError> {
        let result = self.collection(collection).delete_one(doc! { "_id": id }).await?;
        Ok(DeleteAck::from(result))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
