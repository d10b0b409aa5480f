//! Forklift payloads

use serde::Deserialize;

/// Create/edit form for a forklift
#[derive(Debug, Clone, Deserialize)]
pub struct ForkliftForm {
    pub brand: String,
    #[serde(rename = "type")]
    pub forklift_type: String,
    pub eq_no: String,
    pub serial_number: String,
    pub location: String,
    pub powertrain: String,
    pub owner: String,
    pub mfg_year: i32,
    pub status: String,
}

/// Checkbox selection posted by the bulk delete button
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkDeleteForm {
    #[serde(default)]
    pub ids: Vec<i64>,
}
