//! Forklift Handlers
//!
//! Fleet list, create, edit and delete pages served from the site root.

use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use forklift_core::authz::{self, CurrentUser};
use forklift_core::domain::forklift::Forklift;
use forklift_core::dto::ListQuery;
use forklift_core::dto::forklift::{BulkDeleteForm, ForkliftForm};

use crate::service::forklift_service::{self, ForkliftError};
use crate::state::AppState;
use crate::templates::{ForkliftEditTemplate, ForkliftListTemplate, Layout};
use crate::web::error::{WebError, WebResult};

async fn list_page(
    state: &AppState,
    user: &CurrentUser,
    query: &ListQuery,
    error: Option<String>,
) -> WebResult<ForkliftListTemplate> {
    let (forklifts, pagination) =
        forklift_service::list_page(state.pool(), query.page, query.size).await?;

    Ok(ForkliftListTemplate {
        layout: Layout::for_user(Some(user)),
        forklifts,
        pagination,
        error,
        can_delete: authz::can_manage_fleet(Some(user)),
    })
}

fn require_fleet_manager(user: &CurrentUser) -> WebResult<()> {
    if !authz::can_manage_fleet(Some(user)) {
        tracing::warn!("User {} tried to delete forklifts", user.id);
        return Err(WebError::Forbidden(
            "Only admins and supervisors can delete forklifts".to_string(),
        ));
    }
    Ok(())
}

/// GET /
pub async fn list_forklifts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> WebResult<ForkliftListTemplate> {
    list_page(&state, &user, &query, None).await
}

/// POST /tambah
pub async fn create_forklift(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(req): Form<ForkliftForm>,
) -> WebResult<Response> {
    tracing::info!("Creating forklift: {}", req.eq_no);

    match forklift_service::create_forklift(state.pool(), req).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(e @ (ForkliftError::Duplicate | ForkliftError::ValidationError(_))) => {
            let page = list_page(&state, &user, &ListQuery::default(), Some(e.to_string())).await?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /edit/{id}
pub async fn edit_forklift_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> WebResult<Response> {
    match forklift_service::get_forklift(state.pool(), id).await {
        Ok(forklift) => Ok(ForkliftEditTemplate {
            layout: Layout::for_user(Some(&user)),
            forklift,
            error: None,
        }
        .into_response()),
        Err(ForkliftError::NotFound(_)) => Ok(Redirect::to("/").into_response()),
        Err(e) => Err(e.into()),
    }
}

/// POST /edit/{id}
pub async fn update_forklift(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Form(req): Form<ForkliftForm>,
) -> WebResult<Response> {
    tracing::info!("Updating forklift: {}", id);

    let submitted = Forklift {
        id,
        brand: req.brand.clone(),
        forklift_type: req.forklift_type.clone(),
        eq_no: req.eq_no.clone(),
        serial_number: req.serial_number.clone(),
        location: req.location.clone(),
        powertrain: req.powertrain.clone(),
        owner: req.owner.clone(),
        mfg_year: req.mfg_year,
        status: req.status.clone(),
    };

    match forklift_service::update_forklift(state.pool(), id, req).await {
        Ok(()) | Err(ForkliftError::NotFound(_)) => Ok(Redirect::to("/").into_response()),
        Err(e @ (ForkliftError::Duplicate | ForkliftError::ValidationError(_))) => {
            Ok(ForkliftEditTemplate {
                layout: Layout::for_user(Some(&user)),
                forklift: submitted,
                error: Some(e.to_string()),
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /delete/{id}
pub async fn delete_forklift(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> WebResult<Redirect> {
    require_fleet_manager(&user)?;

    tracing::info!("Deleting forklift: {}", id);

    match forklift_service::delete_forklift(state.pool(), id).await {
        Ok(()) | Err(ForkliftError::NotFound(_)) => Ok(Redirect::to("/")),
        Err(e) => Err(e.into()),
    }
}

/// POST /delete_bulk
pub async fn delete_forklifts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    axum_extra::extract::Form(req): axum_extra::extract::Form<BulkDeleteForm>,
) -> WebResult<Redirect> {
    require_fleet_manager(&user)?;

    forklift_service::delete_forklifts(state.pool(), &req.ids).await?;

    Ok(Redirect::to("/"))
}
