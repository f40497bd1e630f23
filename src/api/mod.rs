use actix_web::web;

use crate::utils::AppError;

/// Builds a test service over the given store, e.g. `test_app!(store.clone())`.
#[cfg(test)]
macro_rules! test_app {
    ($store:expr) => {{
        let store: std::sync::Arc<dyn crate::database::DocumentStore> = $store;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from(store))
                .configure(crate::api::configure),
        )
        .await
    }};
}

pub mod applications;
pub mod health;
pub mod swagger;
pub mod users;
pub mod visas;

/// Registers every route of the gateway.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    // Liveness & health
    .route("/", web::get().to(health::liveness))
    .route("/health", web::get().to(health::health_check))
    // Visas
    .route("/visa", web::get().to(visas::list_visas))
    .route("/visa", web::post().to(visas::create_visa))
    .route("/visa/{id}", web::get().to(visas::get_visa))
    .route("/visa/{id}", web::put().to(visas::replace_visa))
    .route("/visa/{id}", web::delete().to(visas::delete_visa))
    .route("/visas/{id}", web::get().to(visas::get_visa))
    .route("/latestSix", web::get().to(visas::latest_six))
    // Users
    .route("/users", web::get().to(users::list_users))
    .route("/users", web::post().to(users::create_user))
    .route("/users/{email}", web::patch().to(users::update_user))
    .route("/users/{id}", web::delete().to(users::delete_user))
    // Applications
    .route("/applications", web::get().to(applications::list_applications))
    .route("/applications", web::post().to(applications::create_application))
    .route("/applications/{id}", web::delete().to(applications::delete_application));
}
