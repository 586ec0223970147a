//! Role Model

use super::serde_helpers;
use crate::auth::permissions::PermissionMatrix;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Role ID type
pub type RoleId = RecordId;

/// Role model matching the role table
///
/// `permissions` is the nested `resource -> action -> allow` matrix with the
/// reserved `"*"` wildcard key (see [`crate::auth::permissions`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RoleId>,
    /// Unique role name ("super-admin", "customer", ...)
    pub name: String,
    /// Display name for the UI
    pub display_name: String,
    /// Permission matrix
    #[serde(default)]
    pub permissions: PermissionMatrix,
    /// System roles cannot be modified or deleted through the role API
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_system: bool,
    /// Whether the role is active
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Role {
    /// Create a new role
    pub fn new(name: String, display_name: String, permissions: PermissionMatrix) -> Self {
        Self {
            id: None,
            name,
            display_name,
            permissions,
            is_system: false,
            is_active: true,
        }
    }
}

/// Create role request
#[derive(Debug, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub permissions: PermissionMatrix,
}

/// Update role request
#[derive(Debug, Serialize, Deserialize)]
pub struct RoleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
