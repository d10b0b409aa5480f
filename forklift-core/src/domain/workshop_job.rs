//! Workshop job domain model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Assignee, ForkliftRef};

/// A repair carried out in the workshop, with the parts it used
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkshopJob {
    pub id: i64,
    pub forklift: ForkliftRef,
    pub date: NaiveDate,
    pub report_no: String,
    pub job_desc: String,
    pub notes: Option<String>,
    pub assigned: Vec<Assignee>,
    pub items: Vec<JobItem>,
}

/// A part or consumable used on a workshop job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobItem {
    pub item_name: String,
    pub qty: i32,
}

/// Fields written when a workshop job is created or edited
#[derive(Debug, Clone)]
pub struct NewWorkshopJob {
    pub forklift_id: i64,
    pub date: NaiveDate,
    pub report_no: String,
    pub job_desc: String,
    pub notes: Option<String>,
    pub technicians: Vec<i64>,
    pub items: Vec<JobItem>,
}
