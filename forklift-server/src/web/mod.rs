//! Web Module
//!
//! HTML page handlers and the router tying them to the middleware stack.
//! Each submodule serves the pages of one area of the site.

pub mod auth;
pub mod error;
pub mod forklift;
pub mod health;
pub mod pm_job;
pub mod user;
pub mod workshop_job;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::compression::{CompressionLayer, predicate::SizeAbove};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{admin_only, cache_control, require_auth};
use crate::service::{forklift_service, user_service};
use crate::state::AppState;
use crate::templates::{ForkliftOption, TechnicianOption};
use crate::web::error::WebResult;

/// Bodies smaller than this are sent uncompressed
const COMPRESS_MIN_BYTES: u16 = 500;

const SECURITY_HEADERS: [(HeaderName, &str); 5] = [
    (
        header::CONTENT_SECURITY_POLICY,
        "default-src 'self'; img-src 'self' data:; style-src 'self' 'unsafe-inline'; script-src 'self'; font-src 'self' data:",
    ),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=31536000; includeSubDomains",
    ),
];

/// Forklift and technician choices for the PM and workshop job forms
pub(crate) async fn job_form_options(
    state: &AppState,
    forklift_id: Option<i64>,
    technicians: &[i64],
) -> WebResult<(Vec<ForkliftOption>, Vec<TechnicianOption>)> {
    let forklifts = forklift_service::list_all(state.pool()).await?;
    let users = user_service::list_technicians(state.pool()).await?;

    Ok((
        ForkliftOption::list(&forklifts, forklift_id),
        TechnicianOption::list(&users, technicians),
    ))
}

/// Create the application router with all pages, static files and middleware
pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config().static_dir);

    let mut router = Router::new()
        // Health check
        .route("/healthz", get(health::health_check))
        // Forklifts
        .route("/", get(forklift::list_forklifts))
        .route("/tambah", post(forklift::create_forklift))
        .route(
            "/edit/{id}",
            get(forklift::edit_forklift_form).post(forklift::update_forklift),
        )
        .route("/delete/{id}", post(forklift::delete_forklift))
        .route("/delete_bulk", post(forklift::delete_forklifts))
        // PM jobs
        .route("/pm", get(pm_job::list_jobs))
        .route("/pm/", get(pm_job::list_jobs))
        .route("/pm/tambah", post(pm_job::create_job))
        .route(
            "/pm/edit/{id}",
            get(pm_job::edit_job_form).post(pm_job::update_job),
        )
        .route("/pm/delete/{id}", get(pm_job::delete_job))
        // Workshop jobs
        .route("/workshop", get(workshop_job::list_jobs))
        .route("/workshop/", get(workshop_job::list_jobs))
        .route("/workshop/tambah", post(workshop_job::create_job))
        .route(
            "/workshop/edit/{id}",
            get(workshop_job::edit_job_form).post(workshop_job::update_job),
        )
        .route("/workshop/delete/{id}", get(workshop_job::delete_job))
        // Users
        .route("/users", get(user::list_users))
        .route("/users/", get(user::list_users))
        .route("/users/tambah", post(user::create_user))
        .route(
            "/users/edit/{id}",
            get(user::edit_user_form).post(user::update_user),
        )
        .route("/users/delete/{id}", get(user::delete_user))
        // Auth
        .route("/auth/login", get(auth::login_form).post(auth::login))
        .route("/auth/logout", get(auth::logout))
        .route("/auth/user-info", get(auth::user_info))
        .route(
            "/auth/forgot-password",
            get(auth::forgot_password_form).post(auth::forgot_password),
        )
        .route(
            "/auth/reset-password/{token}",
            get(auth::reset_password_form).post(auth::reset_password),
        )
        // Static assets
        .nest_service("/static", static_files)
        // Middleware, innermost first
        .layer(from_fn(admin_only))
        .layer(from_fn_with_state(state.clone(), require_auth))
        .layer(from_fn(cache_control));

    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ));
    }

    router
        .layer(CompressionLayer::new().compress_when(SizeAbove::new(COMPRESS_MIN_BYTES)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
