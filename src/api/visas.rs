use actix_web::{web, HttpResponse};
use mongodb::bson::doc;

use crate::database::{CollectionName, DocumentStore};
use crate::models::{
    document_to_json, documents_to_json, parse_object_id, DeleteAck, InsertAck, RawDocument,
    UpdateAck, VisaFields,
};
use crate::utils::AppError;

pub const LATEST_LIMIT: i64 = 6;

/// GET /visa - Lista todos os vistos
#[utoipa::path(
    get,
    path = "/visa",
    tag = "Visas",
    responses((status = 200, description = "Every stored visa"))
)]
pub async fn list_visas(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    let visas = store.find(CollectionName::Visas, doc! {}).await?;
    log::info!("📋 GET /visa - {} visas", visas.len());
    Ok(HttpResponse::Ok().json(documents_to_json(visas)))
}

/// GET /latestSix - Os seis vistos adicionados mais recentemente
#[utoipa::path(
    get,
    path = "/latestSix",
    tag = "Visas",
    responses(
        (status = 200, description = "Up to six visas, newest first"),
        (status = 500, description = "Failed to fetch latest data")
    )
)]
pub async fn latest_six(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    match store.find_latest(CollectionName::Visas, LATEST_LIMIT).await {
        Ok(visas) => Ok(HttpResponse::Ok().json(documents_to_json(visas))),
        Err(e) => {
            log::error!("❌ Error fetching latest data: {}", e);
            Err(AppError::Unavailable("Failed to fetch latest data"))
        }
    }
}

/// GET /visa/{id} (e /visas/{id}) - Busca visto por id; `null` se não existir
#[utoipa::path(
    get,
    path = "/visa/{id}",
    tag = "Visas",
    params(("id" = String, Path, description = "24-char hex ObjectId")),
    responses(
        (status = 200, description = "The visa, or null when absent"),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn get_visa(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    let visa = store.find_by_id(CollectionName::Visas, id).await?;
    Ok(HttpResponse::Ok().json(visa.map(document_to_json)))
}

/// POST /visa - Insere o documento como recebido
#[utoipa::path(
    post,
    path = "/visa",
    tag = "Visas",
    request_body = RawDocument,
    responses((status = 200, description = "Insertion acknowledgment", body = InsertAck))
)]
pub async fn create_visa(
    store: web::Data<dyn DocumentStore>,
    body: web::Json<RawDocument>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /visa - {:?}", body.get("countryName"));
    let visa = body.into_inner().into_document()?;
    let ack = store.insert(CollectionName::Visas, visa).await?;
    log::info!("✅ Visa created: {}", ack.inserted_id);
    Ok(HttpResponse::Ok().json(ack))
}

/// PUT /visa/{id} - Atualiza os dez campos do visto, inserindo se não existir
#[utoipa::path(
    put,
    path = "/visa/{id}",
    tag = "Visas",
    params(("id" = String, Path, description = "24-char hex ObjectId")),
    request_body = VisaFields,
    responses(
        (status = 200, description = "Update or upsert acknowledgment", body = UpdateAck),
        (status = 400, description = "Malformed id or body")
    )
)]
pub async fn replace_visa(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
    body: web::Json<RawDocument>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    let fields = VisaFields::from(body.into_inner()).into_set_document()?;
    let ack = store.upsert_by_id(CollectionName::Visas, id, fields).await?;
    log::info!(
        "🔧 PUT /visa/{} - matched {}, upserted {}",
        id,
        ack.matched_count,
        ack.upserted_count
    );
    Ok(HttpResponse::Ok().json(ack))
}

/// DELETE /visa/{id} - Remove visto
#[utoipa::path(
    delete,
    path = "/visa/{id}",
    tag = "Visas",
    params(("id" = String, Path, description = "24-char hex ObjectId")),
    responses(
        (status = 200, description = "Deletion acknowledgment", body = DeleteAck),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn delete_visa(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    let ack = store.delete_by_id(CollectionName::Visas, id).await?;
    log::info!("🗑️  DELETE /visa/{} - {} removed", id, ack.deleted_count);
    Ok(HttpResponse::Ok().json(ack))
}
