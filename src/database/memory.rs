//! In-process stores used by handler tests.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::collections::HashMap;
use std::sync::RwLock;

use super::{CollectionName, DocumentStore, UniqueInsert};
use crate::models::{DeleteAck, InsertAck, UpdateAck};
use crate::utils::AppError;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<CollectionName, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, collection: CollectionName) -> usize {
        self.collections
            .read()
            .unwrap()
            .get(&collection)
            .map_or(0, Vec::len)
    }

    fn push(&self, collection: CollectionName, doc: Document) -> ObjectId {
        let id = ObjectId::new();
        let mut stored = Document::new();
        stored.insert("_id", id);
        stored.extend(doc);
        self.collections
            .write()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(stored);
        id
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

fn object_id(doc: &Document) -> [u8; 12] {
    doc.get_object_id("_id").map(|id| id.bytes()).unwrap_or_default()
}

/// Applies `$set` semantics, returning whether anything changed.
fn set_fields(doc: &mut Document, fields: Document) -> bool {
    let mut modified = false;
    for (key, value) in fields {
        if doc.get(&key) != Some(&value) {
            doc.insert(key, value);
            modified = true;
        }
    }
    modified
}

fn update_first(docs: &mut [Document], filter: &Document, fields: Document) -> UpdateAck {
    let mut ack = UpdateAck {
        acknowledged: true,
        matched_count: 0,
        modified_count: 0,
        upserted_count: 0,
        upserted_id: None,
    };
    if let Some(doc) = docs.iter_mut().find(|d| matches(d, filter)) {
        ack.matched_count = 1;
        ack.modified_count = u64::from(set_fields(doc, fields));
    }
    ack
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: CollectionName,
        filter: Document,
    ) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().unwrap();
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_latest(
        &self,
        collection: CollectionName,
        limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        let mut docs = self.find(collection, Document::new()).await?;
        docs.sort_by(|a, b| object_id(b).cmp(&object_id(a)));
        docs.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(docs)
    }

    async fn find_by_id(
        &self,
        collection: CollectionName,
        id: ObjectId,
    ) -> Result<Option<Document>, AppError> {
        let mut filter = Document::new();
        filter.insert("_id", id);
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    async fn insert(
        &self,
        collection: CollectionName,
        doc: Document,
    ) -> Result<InsertAck, AppError> {
        let id = self.push(collection, doc);
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id.to_hex(),
        })
    }

    async fn insert_unique(
        &self,
        collection: CollectionName,
        key: &str,
        doc: Document,
    ) -> Result<UniqueInsert, AppError> {
        if let Some(value) = doc.get(key).cloned() {
            let mut filter = Document::new();
            filter.insert(key, value);
            if let Some(existing) = self.find(collection, filter).await?.into_iter().next() {
                return Ok(UniqueInsert::Existing(existing));
            }
        }
        Ok(UniqueInsert::Inserted(Bson::ObjectId(self.push(collection, doc))))
    }

    async fn upsert_by_id(
        &self,
        collection: CollectionName,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateAck, AppError> {
        let mut filter = Document::new();
        filter.insert("_id", id);

        let mut collections = self.collections.write().unwrap();
        let docs = collections.entry(collection).or_default();
        let ack = update_first(docs, &filter, fields.clone());
        if ack.matched_count > 0 {
            return Ok(ack);
        }

        let mut stored = filter;
        stored.extend(fields);
        docs.push(stored);
        Ok(UpdateAck {
            upserted_count: 1,
            upserted_id: Some(id.to_hex()),
            ..ack
        })
    }

    async fn update_where(
        &self,
        collection: CollectionName,
        key: &str,
        value: Bson,
        fields: Document,
    ) -> Result<UpdateAck, AppError> {
        let mut filter = Document::new();
        filter.insert(key, value);

        let mut collections = self.collections.write().unwrap();
        let docs = collections.entry(collection).or_default();
        Ok(update_first(docs, &filter, fields))
    }

    async fn delete_by_id(
        &self,
        collection: CollectionName,
        id: ObjectId,
    ) -> Result<DeleteAck, AppError> {
        let mut collections = self.collections.write().unwrap();
        let docs = collections.entry(collection).or_default();
        let before = docs.len();
        if let Some(pos) = docs.iter().position(|d| d.get_object_id("_id").ok() == Some(id)) {
            docs.remove(pos);
        }
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: (before - docs.len()) as u64,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Store whose every operation fails, for exercising error responses.
pub struct UnavailableStore;

fn unavailable<T>() -> Result<T, AppError> {
    Err(AppError::DatabaseError("connection refused".to_string()))
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn find(&self, _: CollectionName, _: Document) -> Result<Vec<Document>, AppError> {
        unavailable()
    }

    async fn find_latest(&self, _: CollectionName, _: i64) -> Result<Vec<Document>, AppError> {
        unavailable()
    }

    async fn find_by_id(
        &self,
        _: CollectionName,
        _: ObjectId,
    ) -> Result<Option<Document>, AppError> {
        unavailable()
    }

    async fn insert(&self, _: CollectionName, _: Document) -> Result<InsertAck, AppError> {
        unavailable()
    }

    async fn insert_unique(
        &self,
        _: CollectionName,
        _: &str,
        _: Document,
    ) -> Result<UniqueInsert, AppError> {
        unavailable()
    }

    async fn upsert_by_id(
        &self,
        _: CollectionName,
        _: ObjectId,
        _: Document,
    ) -> Result<UpdateAck, AppError> {
        unavailable()
    }

    async fn update_where(
        &self,
        _: CollectionName,
        _: &str,
        _: Bson,
        _: Document,
    ) -> Result<UpdateAck, AppError> {
        unavailable()
    }

    async fn delete_by_id(&self, _: CollectionName, _: ObjectId) -> Result<DeleteAck, AppError> {
        unavailable()
    }

    async fn ping(&self) -> Result<(), AppError> {
        unavailable()
    }
}
