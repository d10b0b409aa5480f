//! Askama Templates
//!
//! Template structs for rendering HTML pages, plus the view models they
//! display. Every page extends `base.html`, which needs a [`Layout`].

use askama::Template;
use askama_web::WebTemplate;
use chrono::{Datelike, NaiveDate};
use forklift_core::authz::{self, CurrentUser};
use forklift_core::domain::Role;
use forklift_core::domain::forklift::Forklift;
use forklift_core::domain::pm_job::PmJob;
use forklift_core::domain::user::User;
use forklift_core::domain::workshop_job::{JobItem, WorkshopJob};
use forklift_core::dto::pm_job::PmJobForm;
use forklift_core::dto::workshop_job::WorkshopJobForm;
use forklift_core::pagination::Pagination;
use forklift_core::schedule::DATE_FORMAT;

/// Data every page hands to the base template
#[derive(Debug, Clone)]
pub struct Layout {
    pub user_name: Option<String>,
    pub role: Option<String>,
    pub is_admin: bool,
    pub current_year: i32,
}

impl Layout {
    pub fn for_user(user: Option<&CurrentUser>) -> Self {
        Self {
            user_name: user.map(|u| u.name.clone()),
            role: user.map(|u| u.role.to_string()),
            is_admin: authz::is_admin(user),
            current_year: chrono::Local::now().year(),
        }
    }

    pub fn anonymous() -> Self {
        Self::for_user(None)
    }
}

pub fn today() -> String {
    chrono::Utc::now().date_naive().format(DATE_FORMAT).to_string()
}

fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub layout: Layout,
    pub error: Option<String>,
    pub success: Option<String>,
    pub reset_link: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub layout: Layout,
    /// Present while the link is usable and the form should be shown
    pub token: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub layout: Layout,
    pub status: u16,
    pub message: String,
}

// =============================================================================
// Forklifts
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "forklifts/list.html")]
pub struct ForkliftListTemplate {
    pub layout: Layout,
    pub forklifts: Vec<Forklift>,
    pub pagination: Pagination,
    pub error: Option<String>,
    pub can_delete: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "forklifts/edit.html")]
pub struct ForkliftEditTemplate {
    pub layout: Layout,
    pub forklift: Forklift,
    pub error: Option<String>,
}

// =============================================================================
// Shared job form pieces
// =============================================================================

/// A forklift entry in a job form's select box
#[derive(Debug, Clone)]
pub struct ForkliftOption {
    pub id: i64,
    pub label: String,
    pub selected: bool,
}

impl ForkliftOption {
    pub fn list(forklifts: &[Forklift], selected: Option<i64>) -> Vec<Self> {
        forklifts
            .iter()
            .map(|f| ForkliftOption {
                id: f.id,
                label: f.to_ref().label(),
                selected: selected == Some(f.id),
            })
            .collect()
    }
}

/// A technician checkbox in a job form
#[derive(Debug, Clone)]
pub struct TechnicianOption {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

impl TechnicianOption {
    pub fn list(users: &[User], selected: &[i64]) -> Vec<Self> {
        users
            .iter()
            .map(|u| TechnicianOption {
                id: u.id,
                name: u.name.clone(),
                selected: selected.contains(&u.id),
            })
            .collect()
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

// =============================================================================
// PM jobs
// =============================================================================

/// A row of the PM job table
#[derive(Debug, Clone)]
pub struct PmJobView {
    pub id: i64,
    pub date: String,
    pub forklift: String,
    pub report_no: String,
    pub job_desc: String,
    pub recommendation: String,
    pub next_pm_date: String,
    pub technicians: String,
    pub can_modify: bool,
}

impl PmJobView {
    pub fn new(job: &PmJob, user: Option<&CurrentUser>) -> Self {
        Self {
            id: job.id,
            date: fmt_date(job.date),
            forklift: job.forklift.label(),
            report_no: job.report_no.clone(),
            job_desc: job.job_desc.clone(),
            recommendation: job.recommendation.clone().unwrap_or_default(),
            next_pm_date: job.next_pm_date.map(fmt_date).unwrap_or_else(|| "-".to_string()),
            technicians: join_names(job.assigned.iter().map(|a| a.name.as_str())),
            can_modify: authz::is_assigned(user, job),
        }
    }
}

/// Values shown in the PM job form
#[derive(Debug, Clone, Default)]
pub struct PmFormValues {
    pub date: String,
    pub report_no: String,
    pub job_desc: String,
    pub recommendation: String,
    pub next_pm_date: String,
}

impl PmFormValues {
    pub fn blank() -> Self {
        Self {
            date: today(),
            ..Default::default()
        }
    }

    pub fn from_job(job: &PmJob) -> Self {
        Self {
            date: fmt_date(job.date),
            report_no: job.report_no.clone(),
            job_desc: job.job_desc.clone(),
            recommendation: job.recommendation.clone().unwrap_or_default(),
            next_pm_date: job.next_pm_date.map(fmt_date).unwrap_or_default(),
        }
    }

    pub fn from_form(form: &PmJobForm) -> Self {
        Self {
            date: form.date.clone(),
            report_no: form.report_no.clone(),
            job_desc: form.job_desc.clone(),
            recommendation: form.recommendation.clone().unwrap_or_default(),
            next_pm_date: form.next_pm_date.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "pm_jobs/list.html")]
pub struct PmJobListTemplate {
    pub layout: Layout,
    pub jobs: Vec<PmJobView>,
    pub forklifts: Vec<ForkliftOption>,
    pub technicians: Vec<TechnicianOption>,
    pub pagination: Pagination,
    pub form: PmFormValues,
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "pm_jobs/edit.html")]
pub struct PmJobEditTemplate {
    pub layout: Layout,
    pub job_id: i64,
    pub forklifts: Vec<ForkliftOption>,
    pub technicians: Vec<TechnicianOption>,
    pub form: PmFormValues,
    pub error: Option<String>,
}

// =============================================================================
// Workshop jobs
// =============================================================================

/// A row of the workshop job table
#[derive(Debug, Clone)]
pub struct WorkshopJobView {
    pub id: i64,
    pub date: String,
    pub forklift: String,
    pub report_no: String,
    pub job_desc: String,
    pub notes: String,
    pub technicians: String,
    pub items: Vec<JobItem>,
    pub can_modify: bool,
}

impl WorkshopJobView {
    pub fn new(job: &WorkshopJob, user: Option<&CurrentUser>) -> Self {
        Self {
            id: job.id,
            date: fmt_date(job.date),
            forklift: job.forklift.label(),
            report_no: job.report_no.clone(),
            job_desc: job.job_desc.clone(),
            notes: job.notes.clone().unwrap_or_default(),
            technicians: join_names(job.assigned.iter().map(|a| a.name.as_str())),
            items: job.items.clone(),
            can_modify: authz::is_assigned(user, job),
        }
    }
}

/// An item row in the workshop job form; quantities are kept as typed
#[derive(Debug, Clone, Default)]
pub struct ItemRow {
    pub item_name: String,
    pub qty: String,
}

/// Values shown in the workshop job form
#[derive(Debug, Clone, Default)]
pub struct WorkshopFormValues {
    pub date: String,
    pub report_no: String,
    pub job_desc: String,
    pub notes: String,
    pub items: Vec<ItemRow>,
}

impl WorkshopFormValues {
    pub fn blank() -> Self {
        Self {
            date: today(),
            items: vec![ItemRow::default()],
            ..Default::default()
        }
    }

    pub fn from_job(job: &WorkshopJob) -> Self {
        let mut items: Vec<ItemRow> = job
            .items
            .iter()
            .map(|i| ItemRow {
                item_name: i.item_name.clone(),
                qty: i.qty.to_string(),
            })
            .collect();
        items.push(ItemRow::default());

        Self {
            date: fmt_date(job.date),
            report_no: job.report_no.clone(),
            job_desc: job.job_desc.clone(),
            notes: job.notes.clone().unwrap_or_default(),
            items,
        }
    }

    pub fn from_form(form: &WorkshopJobForm) -> Self {
        let mut items: Vec<ItemRow> = form
            .item_name
            .iter()
            .zip(form.qty.iter())
            .map(|(name, qty)| ItemRow {
                item_name: name.clone(),
                qty: qty.clone(),
            })
            .collect();
        if items.is_empty() {
            items.push(ItemRow::default());
        }

        Self {
            date: form.date.clone(),
            report_no: form.report_no.clone(),
            job_desc: form.job_desc.clone(),
            notes: form.notes.clone().unwrap_or_default(),
            items,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "workshop_jobs/list.html")]
pub struct WorkshopJobListTemplate {
    pub layout: Layout,
    pub jobs: Vec<WorkshopJobView>,
    pub forklifts: Vec<ForkliftOption>,
    pub technicians: Vec<TechnicianOption>,
    pub pagination: Pagination,
    pub form: WorkshopFormValues,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "workshop_jobs/edit.html")]
pub struct WorkshopJobEditTemplate {
    pub layout: Layout,
    pub job_id: i64,
    pub forklifts: Vec<ForkliftOption>,
    pub technicians: Vec<TechnicianOption>,
    pub form: WorkshopFormValues,
    pub error: Option<String>,
}

// =============================================================================
// Users
// =============================================================================

/// A role choice in the user forms
#[derive(Debug, Clone)]
pub struct RoleOption {
    pub value: &'static str,
    pub selected: bool,
}

impl RoleOption {
    pub fn list(selected: Role) -> Vec<Self> {
        Role::all()
            .into_iter()
            .map(|r| RoleOption {
                value: r.as_str(),
                selected: r == selected,
            })
            .collect()
    }
}

/// A row of the user table
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone().unwrap_or_default(),
            role: user.role.to_string(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "users/list.html")]
pub struct UserListTemplate {
    pub layout: Layout,
    pub users: Vec<UserView>,
    pub roles: Vec<RoleOption>,
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "users/edit.html")]
pub struct UserEditTemplate {
    pub layout: Layout,
    pub user: UserView,
    pub roles: Vec<RoleOption>,
    pub error: Option<String>,
}
