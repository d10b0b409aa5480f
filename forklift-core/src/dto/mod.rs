//! Data Transfer Objects
//!
//! Form and query payloads submitted by the HTML pages. Field names match the
//! `name` attributes used in the templates.

pub mod auth;
pub mod forklift;
pub mod pm_job;
pub mod user;
pub mod workshop_job;

use serde::Deserialize;

/// `?page=&size=&success=` on list pages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub success: Option<String>,
}

/// Treat blank optional inputs as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some(" oil leak ".to_string())), Some("oil leak".to_string()));
    }
}
