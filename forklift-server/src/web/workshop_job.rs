//! Workshop Job Handlers
//!
//! Workshop repair pages under `/workshop`, including the parts used.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use forklift_core::authz::CurrentUser;
use forklift_core::dto::ListQuery;
use forklift_core::dto::workshop_job::WorkshopJobForm;

use crate::service::workshop_job_service::{self, WorkshopJobError};
use crate::state::AppState;
use crate::templates::{
    Layout, WorkshopFormValues, WorkshopJobEditTemplate, WorkshopJobListTemplate, WorkshopJobView,
};
use crate::web::error::WebResult;
use crate::web::job_form_options;

const LIST_PATH: &str = "/workshop/";

async fn list_page(
    state: &AppState,
    user: &CurrentUser,
    query: &ListQuery,
    submitted: Option<&WorkshopJobForm>,
    error: Option<String>,
) -> WebResult<WorkshopJobListTemplate> {
    let (jobs, pagination) =
        workshop_job_service::list_page(state.pool(), query.page, query.size).await?;
    let (forklifts, technicians) = match submitted {
        Some(form) => job_form_options(state, Some(form.forklift_id), &form.technicians).await?,
        None => job_form_options(state, None, &[]).await?,
    };

    Ok(WorkshopJobListTemplate {
        layout: Layout::for_user(Some(user)),
        jobs: jobs
            .iter()
            .map(|j| WorkshopJobView::new(j, Some(user)))
            .collect(),
        forklifts,
        technicians,
        pagination,
        form: submitted.map_or_else(WorkshopFormValues::blank, WorkshopFormValues::from_form),
        error,
        success: query.success.as_deref() == Some("1"),
    })
}

/// GET /workshop/
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> WebResult<WorkshopJobListTemplate> {
    list_page(&state, &user, &query, None, None).await
}

/// POST /workshop/tambah
pub async fn create_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(req): Form<WorkshopJobForm>,
) -> WebResult<Response> {
    tracing::info!("Creating workshop job: {}", req.report_no);

    match workshop_job_service::create_job(state.pool(), req.clone(), &user).await {
        Ok(_) => Ok(Redirect::to("/workshop/?success=1").into_response()),
        Err(e @ (WorkshopJobError::NoTechnicians | WorkshopJobError::ValidationError(_))) => {
            let page = list_page(
                &state,
                &user,
                &ListQuery::default(),
                Some(&req),
                Some(e.to_string()),
            )
            .await?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /workshop/edit/{id}
pub async fn edit_job_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> WebResult<Response> {
    let job = match workshop_job_service::get_job_for_edit(state.pool(), id, &user).await {
        Ok(job) => job,
        Err(WorkshopJobError::NotFound(_)) => return Ok(Redirect::to(LIST_PATH).into_response()),
        Err(e) => return Err(e.into()),
    };

    let assigned: Vec<i64> = job.assigned.iter().map(|a| a.user_id).collect();
    let (forklifts, technicians) = job_form_options(&state, Some(job.forklift.id), &assigned).await?;

    Ok(WorkshopJobEditTemplate {
        layout: Layout::for_user(Some(&user)),
        job_id: id,
        forklifts,
        technicians,
        form: WorkshopFormValues::from_job(&job),
        error: None,
    }
    .into_response())
}

/// POST /workshop/edit/{id}
pub async fn update_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Form(req): Form<WorkshopJobForm>,
) -> WebResult<Response> {
    tracing::info!("Updating workshop job: {}", id);

    match workshop_job_service::update_job(state.pool(), id, req.clone(), &user).await {
        Ok(()) | Err(WorkshopJobError::NotFound(_)) => {
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e @ (WorkshopJobError::NoTechnicians | WorkshopJobError::ValidationError(_))) => {
            let (forklifts, technicians) =
                job_form_options(&state, Some(req.forklift_id), &req.technicians).await?;

            Ok(WorkshopJobEditTemplate {
                layout: Layout::for_user(Some(&user)),
                job_id: id,
                forklifts,
                technicians,
                form: WorkshopFormValues::from_form(&req),
                error: Some(e.to_string()),
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /workshop/delete/{id}
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> WebResult<Redirect> {
    tracing::info!("Deleting workshop job: {}", id);

    match workshop_job_service::delete_job(state.pool(), id, &user).await {
        Ok(()) | Err(WorkshopJobError::NotFound(_)) => Ok(Redirect::to(LIST_PATH)),
        Err(e) => Err(e.into()),
    }
}
