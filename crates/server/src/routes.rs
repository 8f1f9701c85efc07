use std::fmt::Display;
use std::str::FromStr;

use axum::{
    extract::Request,
    http::{StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::session::{require_admin, require_session, require_teacher};

pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod dashboard;
pub mod fees;
pub mod messages;
pub mod notifications;
pub mod schedule;
pub mod settings;
pub mod testimonials;
pub mod users;

use self::auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok", version: env!("CARGO_PKG_VERSION") })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn api_not_found(uri: &Uri) -> JsonApiError {
    JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("no route for {}", uri.path())))
}

/// Unknown `/api` paths answer in JSON; everything else is the frontend
/// bundle with `index.html` for client-side routes.
async fn frontend(assets: ServeDir<ServeFile>, req: Request) -> Response {
    let path = req.uri().path();
    if path == "/api" || path.starts_with("/api/") {
        return api_not_found(req.uri()).into_response();
    }
    match assets.oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}

/// Parse an optional query filter; blank counts as absent, garbage is a 400.
pub(crate) fn parse_filter<T>(raw: Option<&str>) -> Result<Option<T>, JsonApiError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(|e| JsonApiError::bad_request(e.to_string())),
    }
}

/// Build the full application router: public pages, session routes, teacher
/// and admin routes, the OpenAPI document and the frontend bundle.
pub fn build_router(state: ServerState, cors: CorsLayer, static_dir: &str) -> Router {
    let assets = ServeDir::new(static_dir).fallback(ServeFile::new(format!("{static_dir}/index.html")));

    // No session required
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/courses", get(catalog::public_courses))
        .route("/api/courses/:id", get(catalog::public_course))
        .route("/api/services", get(catalog::public_services))
        .route("/api/bookings", post(bookings::create))
        .route("/api/messages", post(messages::submit_contact))
        .route("/api/testimonials", get(testimonials::public_list).post(testimonials::submit))
        .route("/api/settings", get(settings::get_all));

    // Any signed-in user
    let member = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/password", post(auth::change_password))
        .route("/api/inbox", get(messages::inbox).post(messages::send))
        .route("/api/inbox/contacts", get(messages::contacts))
        .route("/api/inbox/:id/read", patch(messages::mark_read))
        .route("/api/fees", get(fees::my_fees))
        .route("/api/account-book", get(fees::account_book))
        .route("/api/installments/:id/challan", get(fees::challan))
        .route("/api/schedule", get(schedule::mine))
        .route("/api/notifications", get(notifications::feed))
        .route("/api/notifications/:id/read", patch(notifications::mark_read))
        .route("/api/notifications/read-all", post(notifications::mark_all_read))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let teacher = Router::new()
        .route("/api/teacher/students", get(schedule::teacher_students))
        .route_layer(middleware::from_fn(require_teacher))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let admin = Router::new()
        .route("/api/admin/stats", get(dashboard::stats))
        .route("/api/admin/courses", get(catalog::list_courses).post(catalog::create_course))
        .route("/api/admin/courses/:id", put(catalog::update_course).delete(catalog::delete_course))
        .route("/api/admin/services", get(catalog::list_services).post(catalog::create_service))
        .route("/api/admin/services/:id", put(catalog::update_service).delete(catalog::delete_service))
        .route("/api/admin/bookings", get(bookings::list))
        .route("/api/admin/bookings/:id", put(bookings::update_status).delete(bookings::delete))
        .route("/api/admin/messages", get(messages::list_contact))
        .route("/api/admin/messages/:id", patch(messages::set_contact_read).delete(messages::delete_contact))
        .route("/api/admin/testimonials", get(testimonials::list))
        .route("/api/admin/testimonials/:id", put(testimonials::update).delete(testimonials::delete))
        .route("/api/admin/settings", put(settings::put_many))
        .route("/api/admin/users", get(users::list).post(users::create))
        .route("/api/admin/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route("/api/admin/fee-plans", get(fees::list_plans).post(fees::create_plan))
        .route("/api/admin/fee-plans/:id", axum::routing::delete(fees::delete_plan))
        .route("/api/admin/installments/:id/payments", post(fees::record_payment))
        .route("/api/admin/schedule", get(schedule::list).post(schedule::create))
        .route("/api/admin/schedule/:id", axum::routing::delete(schedule::delete))
        .route("/api/admin/notifications", post(notifications::broadcast))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    public
        .merge(member)
        .merge(teacher)
        .merge(admin)
        .fallback(move |req: Request| frontend(assets.clone(), req))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // One INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // Status and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
