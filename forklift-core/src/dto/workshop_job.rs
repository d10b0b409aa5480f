//! Workshop job payloads

use serde::Deserialize;

use crate::domain::workshop_job::JobItem;

/// Create/edit form for a workshop job.
///
/// Items arrive as two parallel repeated fields, `item_name` and `qty`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkshopJobForm {
    pub forklift_id: i64,
    pub date: String,
    #[serde(default)]
    pub technicians: Vec<i64>,
    pub report_no: String,
    pub job_desc: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub item_name: Vec<String>,
    #[serde(default)]
    pub qty: Vec<String>,
}

impl WorkshopJobForm {
    /// Pair up item rows, dropping rows with a blank name.
    ///
    /// A quantity that does not parse counts as 0; rows beyond the shorter of
    /// the two lists are ignored.
    pub fn items(&self) -> Vec<JobItem> {
        self.item_name
            .iter()
            .zip(self.qty.iter())
            .filter(|(name, _)| !name.trim().is_empty())
            .map(|(name, qty)| JobItem {
                item_name: name.trim().to_string(),
                qty: qty.trim().parse().unwrap_or(0),
            })
            .collect()
    }
}
