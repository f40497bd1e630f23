use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visa Navigator API",
        version = "1.0.0",
        description = "Pass-through CRUD gateway over the visa database.\n\n**Collections:**\n- Visas (`/visa`, `/visas/{id}`, `/latestSix`)\n- Users (`/users`)\n- Applications (`/applications`)\n\nIds are 24-char hex ObjectIds. Errors are returned as `{\"error\": \"...\"}`."
    ),
    paths(
        // Health
        crate::api::health::liveness,
        crate::api::health::health_check,

        // Visas
        crate::api::visas::list_visas,
        crate::api::visas::latest_six,
        crate::api::visas::get_visa,
        crate::api::visas::create_visa,
        crate::api::visas::replace_visa,
        crate::api::visas::delete_visa,

        // Users
        crate::api::users::list_users,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Applications
        crate::api::applications::create_application,
        crate::api::applications::list_applications,
        crate::api::applications::delete_application,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::VisaFields,
            crate::models::InsertAck,
            crate::models::UpdateAck,
            crate::models::DeleteAck,
        )
    ),
    tags(
        (name = "Health", description = "Liveness text and database health."),
        (name = "Visas", description = "Visa catalog: list, newest six, get, create, upsert, delete."),
        (name = "Users", description = "Users keyed by email: list, create-if-absent, partial update, delete."),
        (name = "Applications", description = "Visa applications: create, list (optionally by email), delete."),
    )
)]
pub struct ApiDoc;
