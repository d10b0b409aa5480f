//! User domain model

use serde::{Deserialize, Serialize};

/// A person who can log in and/or be assigned to jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,

    /// Stored password hash, never serialized
    #[serde(skip_serializing, default)]
    pub password: Option<String>,

    pub role: Role,
}

/// Access role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including user management
    Admin,

    /// May edit any job and remove forklifts
    Supervisor,

    /// Field technician; may only touch jobs they are assigned to
    #[serde(rename = "teknisi", alias = "user")]
    Technician,
}

impl Role {
    /// Parse a stored or submitted role name.
    ///
    /// Matching ignores case and surrounding whitespace. `user` is accepted
    /// as an alias for the technician role.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "supervisor" => Some(Role::Supervisor),
            "teknisi" | "user" => Some(Role::Technician),
            _ => None,
        }
    }

    /// Name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Technician => "teknisi",
        }
    }

    pub fn all() -> [Role; 3] {
        [Role::Admin, Role::Supervisor, Role::Technician]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
