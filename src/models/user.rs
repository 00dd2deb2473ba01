//! User model as returned by the catalog API

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Current user (`UserPublic` on the wire).
///
/// Read-only projection of the server session; the front end never edits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Whether this user may add and delete books
    pub fn can_manage_catalog(&self) -> bool {
        self.is_active && self.is_superuser
    }

    /// Require catalog management rights
    pub fn require_catalog_manager(&self) -> AppResult<()> {
        if self.can_manage_catalog() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "The user doesn't have enough privileges".to_string(),
            ))
        }
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}
