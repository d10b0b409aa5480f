//! Core domain types
//!
//! Business entities persisted by the server and rendered by its templates.

pub mod forklift;
pub mod pm_job;
pub mod user;
pub mod workshop_job;

pub use user::Role;

use serde::{Deserialize, Serialize};

/// A technician assigned to a job, with the name loaded for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub user_id: i64,
    pub name: String,
}

/// The forklift a job was done on, as shown in job tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkliftRef {
    pub id: i64,
    pub eq_no: String,
    pub brand: String,
    pub forklift_type: String,
}

impl ForkliftRef {
    /// Label used in tables and select boxes, e.g. "FL-01 (Toyota 8FD25)"
    pub fn label(&self) -> String {
        format!("{} ({} {})", self.eq_no, self.brand, self.forklift_type)
    }
}
