//! User management payloads

use serde::Deserialize;

/// Create/edit form for a user.
///
/// On edit a blank password keeps the stored one.
#[derive(Debug, Clone, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: String,
}
