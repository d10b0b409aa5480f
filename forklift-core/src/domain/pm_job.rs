//! Preventive maintenance job domain model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Assignee, ForkliftRef};

/// A preventive maintenance visit on one forklift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmJob {
    pub id: i64,
    pub forklift: ForkliftRef,
    pub date: NaiveDate,
    pub report_no: String,
    pub job_desc: String,
    pub recommendation: Option<String>,
    pub next_pm_date: Option<NaiveDate>,

    /// User id of whoever logged the job
    pub created_by: i64,

    pub assigned: Vec<Assignee>,
}

/// Fields written when a PM job is created or edited
#[derive(Debug, Clone)]
pub struct NewPmJob {
    pub forklift_id: i64,
    pub date: NaiveDate,
    pub report_no: String,
    pub job_desc: String,
    pub recommendation: Option<String>,
    pub next_pm_date: Option<NaiveDate>,
    pub technicians: Vec<i64>,
}
