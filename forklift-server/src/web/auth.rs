//! Auth Handlers
//!
//! Login, logout, the user-info endpoint and the password reset flow.

use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use forklift_core::authz::CurrentUser;
use forklift_core::dto::auth::{ForgotPasswordForm, LoginForm, ResetPasswordForm, UserInfo};

use crate::service::auth_service::{self, AuthError};
use crate::session::SESSION_COOKIE;
use crate::state::AppState;
use crate::templates::{ForgotPasswordTemplate, Layout, LoginTemplate, ResetPasswordTemplate};
use crate::web::error::{WebError, WebResult};

const RESET_REQUESTED: &str = "If your email is registered, a password reset link has been generated.";
const RESET_DONE: &str =
    "Your password has been reset successfully. You can now login with your new password.";

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let max_age = time::Duration::seconds(state.sessions().ttl().num_seconds());

    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config().secure_cookies)
        .max_age(max_age)
        .build()
}

/// GET /auth/login
pub async fn login_form() -> LoginTemplate {
    LoginTemplate {
        layout: Layout::anonymous(),
        error: None,
    }
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(req): Form<LoginForm>,
) -> WebResult<Response> {
    match auth_service::login(state.pool(), state.sessions(), &req.email, &req.password).await {
        Ok((token, _)) => {
            let jar = jar.add(session_cookie(&state, token));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(e @ AuthError::InvalidCredentials) => Ok(LoginTemplate {
            layout: Layout::anonymous(),
            error: Some(e.to_string()),
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /auth/logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    auth_service::logout(state.sessions(), token.as_deref());

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/auth/login"))
}

/// GET /auth/user-info
pub async fn user_info(user: Option<Extension<CurrentUser>>) -> WebResult<Json<UserInfo>> {
    let Some(Extension(user)) = user else {
        return Err(WebError::Unauthorized);
    };

    Ok(Json(UserInfo {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role.to_string(),
    }))
}

/// GET /auth/forgot-password
pub async fn forgot_password_form() -> ForgotPasswordTemplate {
    ForgotPasswordTemplate {
        layout: Layout::anonymous(),
        error: None,
        success: None,
        reset_link: None,
    }
}

/// POST /auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(req): Form<ForgotPasswordForm>,
) -> WebResult<ForgotPasswordTemplate> {
    let token =
        auth_service::request_password_reset(state.pool(), state.reset_tokens(), &req.email)
            .await?;

    Ok(ForgotPasswordTemplate {
        layout: Layout::anonymous(),
        error: None,
        success: Some(RESET_REQUESTED.to_string()),
        reset_link: token.map(|t| format!("/auth/reset-password/{}", t)),
    })
}

/// GET /auth/reset-password/{token}
pub async fn reset_password_form(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ResetPasswordTemplate {
    let valid = auth_service::reset_token_is_valid(state.reset_tokens(), &token);

    ResetPasswordTemplate {
        layout: Layout::anonymous(),
        token: valid.then_some(token),
        error: (!valid).then(|| auth_service::INVALID_RESET_LINK.to_string()),
        success: None,
    }
}

/// POST /auth/reset-password/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Form(req): Form<ResetPasswordForm>,
) -> WebResult<ResetPasswordTemplate> {
    let result = auth_service::reset_password(
        state.pool(),
        state.reset_tokens(),
        &token,
        &req.password,
        &req.confirm_password,
    )
    .await;

    let page = match result {
        Ok(()) => ResetPasswordTemplate {
            layout: Layout::anonymous(),
            token: None,
            error: None,
            success: Some(RESET_DONE.to_string()),
        },
        Err(e @ AuthError::InvalidResetToken) => ResetPasswordTemplate {
            layout: Layout::anonymous(),
            token: None,
            error: Some(e.to_string()),
            success: None,
        },
        Err(e @ (AuthError::PasswordMismatch | AuthError::ValidationError(_))) => {
            ResetPasswordTemplate {
                layout: Layout::anonymous(),
                token: Some(token),
                error: Some(e.to_string()),
                success: None,
            }
        }
        Err(e) => return Err(e.into()),
    };

    Ok(page)
}
