//! Authenticated caller, supplied by the host application

use serde::{Deserialize, Serialize};

/// Caller role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// Who is performing an operation
///
/// Only used to stamp `created_by_id` and to attribute log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    /// Create identity with the `user` role
    #[inline]
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role: Role::User,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_to_user() {
        let identity: Identity =
            serde_json::from_str(r#"{"user_id": "u1", "name": "Somsri"}"#).unwrap();
        assert_eq!(identity, Identity::new("u1", "Somsri"));

        let admin: Identity =
            serde_json::from_str(r#"{"user_id": "a1", "name": "Admin", "role": "admin"}"#).unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
