mod mongo;

#[cfg(test)]
pub mod memory;

pub use mongo::MongoDB;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::models::{DeleteAck, InsertAck, UpdateAck};
use crate::utils::AppError;

/// Collections exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    Visas,
    Users,
    Applications,
}

impl CollectionName {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionName::Visas => "visa",
            CollectionName::Users => "users",
            CollectionName::Applications => "applications",
        }
    }
}

/// Outcome of an insert guarded by a unique key.
#[derive(Debug, Clone, PartialEq)]
pub enum UniqueInsert {
    /// The document was stored under this generated id.
    Inserted(Bson),
    /// Another document already holds the key; nothing was written.
    Existing(Document),
}

/// Single-operation access to the document store.
///
/// Handlers receive this as `web::Data<dyn DocumentStore>`, built once at startup.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document matching all `filter` fields exactly, in storage order.
    async fn find(
        &self,
        collection: CollectionName,
        filter: Document,
    ) -> Result<Vec<Document>, AppError>;

    /// Up to `limit` documents sorted by descending `_id`.
    async fn find_latest(
        &self,
        collection: CollectionName,
        limit: i64,
    ) -> Result<Vec<Document>, AppError>;

    async fn find_by_id(
        &self,
        collection: CollectionName,
        id: ObjectId,
    ) -> Result<Option<Document>, AppError>;

    async fn insert(
        &self,
        collection: CollectionName,
        doc: Document,
    ) -> Result<InsertAck, AppError>;

    /// Inserts `doc` unless another document has the same value under `key`.
    ///
    /// Documents lacking `key` are inserted unconditionally.
    async fn insert_unique(
        &self,
        collection: CollectionName,
        key: &str,
        doc: Document,
    ) -> Result<UniqueInsert, AppError>;

    /// `$set`s `fields` on the document with this id, inserting it if absent.
    async fn upsert_by_id(
        &self,
        collection: CollectionName,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateAck, AppError>;

    /// `$set`s `fields` on the first document whose `key` equals `value`.
    async fn update_where(
        &self,
        collection: CollectionName,
        key: &str,
        value: Bson,
        fields: Document,
    ) -> Result<UpdateAck, AppError>;

    async fn delete_by_id(
        &self,
        collection: CollectionName,
        id: ObjectId,
    ) -> Result<DeleteAck, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
