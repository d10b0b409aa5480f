//! PM job payloads

use serde::Deserialize;

/// Create/edit form for a PM job.
///
/// `technicians` is a repeated field, one entry per ticked checkbox.
#[derive(Debug, Clone, Deserialize)]
pub struct PmJobForm {
    pub forklift_id: i64,
    pub date: String,
    #[serde(default)]
    pub technicians: Vec<i64>,
    pub report_no: String,
    pub job_desc: String,
    pub recommendation: Option<String>,
    pub next_pm_option: Option<String>,
    pub next_pm_date: Option<String>,
}
