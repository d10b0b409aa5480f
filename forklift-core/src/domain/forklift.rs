//! Forklift domain model

use serde::{Deserialize, Serialize};

use super::ForkliftRef;

/// A forklift in the fleet
///
/// `eq_no` and `serial_number` are unique across the fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forklift {
    pub id: i64,
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

impl Forklift {
    pub fn to_ref(&self) -> ForkliftRef {
        ForkliftRef {
            id: self.id,
            eq_no: self.eq_no.clone(),
            brand: self.brand.clone(),
            forklift_type: self.forklift_type.clone(),
        }
    }
}
