use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, Document};
use serde::Deserialize;

use crate::database::{CollectionName, DocumentStore};
use crate::models::{documents_to_json, parse_object_id, DeleteAck, InsertAck, RawDocument};
use crate::utils::AppError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApplicationQuery {
    /// Exact email to filter by
    pub email: Option<String>,
}

impl ApplicationQuery {
    fn filter(&self) -> Document {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => doc! { "email": email },
            _ => doc! {},
        }
    }
}

// POST /applications
#[utoipa::path(
    post,
    path = "/applications",
    tag = "Applications",
    request_body = RawDocument,
    responses((status = 200, description = "Insertion acknowledgment", body = InsertAck))
)]
pub async fn create_application(
    store: web::Data<dyn DocumentStore>,
    body: web::Json<RawDocument>,
) -> Result<HttpResponse, AppError> {
    let application = body.into_inner().into_document()?;
    let ack = store.insert(CollectionName::Applications, application).await?;
    log::info!("📝 Application created: {}", ack.inserted_id);
    Ok(HttpResponse::Ok().json(ack))
}

// GET /applications?email=xxx
#[utoipa::path(
    get,
    path = "/applications",
    tag = "Applications",
    params(ApplicationQuery),
    responses((status = 200, description = "Applications, optionally filtered by email"))
)]
pub async fn list_applications(
    store: web::Data<dyn DocumentStore>,
    query: web::Query<ApplicationQuery>,
) -> Result<HttpResponse, AppError> {
    let applications = store
        .find(CollectionName::Applications, query.filter())
        .await?;
    Ok(HttpResponse::Ok().json(documents_to_json(applications)))
}

// DELETE /applications/{id}
#[utoipa::path(
    delete,
    path = "/applications/{id}",
    tag = "Applications",
    params(("id" = String, Path, description = "24-char hex ObjectId")),
    responses(
        (status = 200, description = "Deletion acknowledgment", body = DeleteAck),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn delete_application(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    let ack = store.delete_by_id(CollectionName::Applications, id).await?;
    log::info!("🗑️  DELETE /applications/{} - {} removed", id, ack.deleted_count);
    Ok(HttpResponse::Ok().json(ack))
}
