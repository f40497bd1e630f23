use mongodb::bson::{self, Document};
use serde::Serialize;
use serde_json::Value;

use super::RawDocument;
use crate::utils::AppError;

/// The ten visa fields accepted by `PUT /visa/{id}`.
///
/// Built from a JSON object by field name; anything else in the body is
/// discarded. Absent fields are written as `null`, so a PUT always sets all ten.
#[derive(Debug, Default, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisaFields {
    #[schema(value_type = Object)]
    pub country_photo: Option<Value>,
    #[schema(value_type = Object)]
    pub country_name: Option<Value>,
    #[schema(value_type = Object)]
    pub visa_type: Option<Value>,
    #[schema(value_type = Object)]
    pub processing_time: Option<Value>,
    #[schema(value_type = Object)]
    pub required_documents: Option<Value>,
    #[schema(value_type = Object)]
    pub description: Option<Value>,
    #[schema(value_type = Object)]
    pub fee: Option<Value>,
    #[schema(value_type = Object)]
    pub validity: Option<Value>,
    #[schema(value_type = Object)]
    pub age_restriction: Option<Value>,
    #[schema(value_type = Object)]
    pub application_method: Option<Value>,
}

impl From<RawDocument> for VisaFields {
    fn from(body: RawDocument) -> Self {
        let mut body = body.0;
        Self {
            country_photo: body.remove("countryPhoto"),
            country_name: body.remove("countryName"),
            visa_type: body.remove("visaType"),
            processing_time: body.remove("processingTime"),
            required_documents: body.remove("requiredDocuments"),
            description: body.remove("description"),
            fee: body.remove("fee"),
            validity: body.remove("validity"),
            age_restriction: body.remove("ageRestriction"),
            application_method: body.remove("applicationMethod"),
        }
    }
}

impl VisaFields {
    pub fn into_set_document(self) -> Result<Document, AppError> {
        Ok(bson::to_document(&self)?)
    }
}
