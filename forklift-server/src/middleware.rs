//! Request Middleware
//!
//! Session authentication, the admin guard for `/users` and response
//! cache headers. Security headers are applied as layers in
//! [`create_router`](crate::web::create_router).

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use forklift_core::authz::{self, CurrentUser};

use crate::session::SESSION_COOKIE;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/auth/login";

const PUBLIC_PREFIXES: [&str; 5] = [
    "/auth/login",
    "/auth/logout",
    "/auth/forgot-password",
    "/auth/reset-password/",
    "/static/",
];

const STATIC_CACHE: &str = "public, max-age=31536000, immutable";
const DYNAMIC_CACHE: &str = "no-store";

/// Paths reachable without a session
pub fn is_public(path: &str) -> bool {
    path == "/healthz" || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

fn is_admin_area(path: &str) -> bool {
    path == "/users" || path.starts_with("/users/")
}

/// Resolve the session cookie and attach the [`CurrentUser`] to the request.
///
/// Protected paths without a live session redirect to the login page.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let user = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions().get(cookie.value()));

    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
        }
        None if !is_public(request.uri().path()) => {
            tracing::debug!("No session for {}, redirecting to login", request.uri().path());
            return Redirect::to(LOGIN_PATH).into_response();
        }
        None => {}
    }

    next.run(request).await
}

/// Restrict `/users` to admins. Other roles are sent back to the fleet list.
pub async fn admin_only(request: Request, next: Next) -> Response {
    if !is_admin_area(request.uri().path()) {
        return next.run(request).await;
    }

    let redirect = match request.extensions().get::<CurrentUser>() {
        None => Some(LOGIN_PATH),
        Some(u) if !authz::is_admin(Some(u)) => {
            tracing::warn!("User {} denied access to {}", u.id, request.uri().path());
            Some("/")
        }
        Some(_) => None,
    };

    match redirect {
        Some(to) => Redirect::to(to).into_response(),
        None => next.run(request).await,
    }
}

/// Long-lived caching for static assets, none for pages
pub async fn cache_control(request: Request, next: Next) -> Response {
    let is_static = request.uri().path().starts_with("/static/");
    let mut response = next.run(request).await;

    let value = if is_static { STATIC_CACHE } else { DYNAMIC_CACHE };
    response
        .headers_mut()
        .entry(header::CACHE_CONTROL)
        .or_insert(HeaderValue::from_static(value));

    response
}
