use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::{Deserialize, Serialize};

use super::document::id_to_string;

/// Result of a single insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Result of an update or upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

/// Result of a delete; `deleted_count` is 0 when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<InsertOneResult> for InsertAck {
    fn from(result: InsertOneResult) -> Self {
        Self {
            acknowledged: true,
            inserted_id: id_to_string(&result.inserted_id),
        }
    }
}

impl From<UpdateResult> for UpdateAck {
    fn from(result: UpdateResult) -> Self {
        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id.as_ref().map(id_to_string),
        }
    }
}

impl From<DeleteResult> for DeleteAck {
    fn from(result: DeleteResult) -> Self {
        Self {
            acknowledged: true,
            deleted_count: result.deleted_count,
        }
    }
}
