use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, Bson, Document};
use serde_json::json;

use crate::database::{CollectionName, DocumentStore, UniqueInsert};
use crate::models::{
    document_to_json, documents_to_json, id_to_string, parse_object_id, DeleteAck, RawDocument,
    UpdateAck,
};
use crate::utils::AppError;

/// GET /users - Lista todos os usuários
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses((status = 200, description = "Every stored user"))
)]
pub async fn list_users(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    let users = store.find(CollectionName::Users, doc! {}).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(users)))
}

/// POST /users - Cria o usuário se o email ainda não existir
///
/// The unique index on `email` makes this a single conditional insert: a
/// colliding insert is rejected by the store and the holder is returned.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = RawDocument,
    responses((status = 200, description = "`User created` with its new id, or `User already exists` with the stored record"))
)]
pub async fn create_user(
    store: web::Data<dyn DocumentStore>,
    body: web::Json<RawDocument>,
) -> Result<HttpResponse, AppError> {
    let user = body.into_inner().into_document()?;

    match store.insert_unique(CollectionName::Users, "email", user.clone()).await? {
        UniqueInsert::Existing(existing) => {
            log::info!("👤 User already exists in the database");
            Ok(HttpResponse::Ok().json(json!({
                "message": "User already exists",
                "user": document_to_json(existing),
            })))
        }
        UniqueInsert::Inserted(id) => {
            log::info!("👤 Creating new user {:?}", user.get("email"));
            let mut created = Document::new();
            created.insert("_id", id.clone());
            created.extend(user);
            Ok(HttpResponse::Ok().json(json!({
                "message": "User created",
                "user": document_to_json(created),
                "insertedId": id_to_string(&id),
            })))
        }
    }
}

/// PATCH /users/{email} - Atualiza apenas os campos enviados
#[utoipa::path(
    patch,
    path = "/users/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Email of the user to update")),
    request_body = RawDocument,
    responses(
        (status = 200, description = "Update acknowledgment; matchedCount is 0 when no user has this email", body = UpdateAck),
        (status = 400, description = "Empty or malformed body")
    )
)]
pub async fn update_user(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
    body: web::Json<RawDocument>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    let fields = body.into_inner().into_document()?;
    if fields.is_empty() {
        return Err(AppError::InvalidRequest("no fields to update".to_string()));
    }

    let ack = store
        .update_where(CollectionName::Users, "email", Bson::String(email.clone()), fields)
        .await?;
    log::info!("🔧 PATCH /users/{} - matched {}", email, ack.matched_count);
    Ok(HttpResponse::Ok().json(ack))
}

/// DELETE /users/{id} - Remove usuário
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "24-char hex ObjectId")),
    responses(
        (status = 200, description = "Deletion acknowledgment", body = DeleteAck),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn delete_user(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    let ack = store.delete_by_id(CollectionName::Users, id).await?;
    log::info!("🗑️  DELETE /users/{} - {} removed", id, ack.deleted_count);
    Ok(HttpResponse::Ok().json(ack))
}
