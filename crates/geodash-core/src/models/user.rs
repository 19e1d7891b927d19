//! User account types for the credential store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access role. The admin portal admits admin and editor; the client portal
/// admits client only. User management requires admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Client => "client",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "editor" => Some(Role::Editor),
            "client" => Some(Role::Client),
            _ => None,
        }
    }

    /// May use the administrative portal (data entry).
    pub fn can_edit_data(&self) -> bool {
        matches!(self, Role::Admin | Role::Editor)
    }

    /// May manage user accounts.
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored account. The password is kept as a SHA-256 hex digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub email: String,
    pub password_digest: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Input for account creation; the plaintext password is digested by the
/// store before persisting.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}
