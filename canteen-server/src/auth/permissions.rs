//! Permission matrix and store
//!
//! Dynamic RBAC: each role carries a nested `resource -> action -> bool`
//! matrix with the reserved `"*"` wildcard key. The [`PermissionStore`]
//! keeps the matrices of all active roles in memory and is consulted by the
//! authorization middleware on every protected request.
//!
//! Lookup semantics:
//! - a `"*" -> "*" -> true` entry grants everything for that role
//! - otherwise only the exact `(resource, action)` entry counts
//! - anything absent is denied
//! - a user is authorized if ANY of their roles grants the pair

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::security_log;
use shared::{AppError, AppResult};

/// Reserved wildcard key, valid in both resource and action position
pub const WILDCARD: &str = "*";

/// Resource name registry
pub mod resource {
    pub const CATEGORY: &str = "category";
    pub const MENU: &str = "menu";
    pub const FOOD_ITEM: &str = "fooditem";
    pub const TIMEFRAME: &str = "timeframe";
    pub const ORDER: &str = "order";
    pub const PAYMENT: &str = "payment";
    pub const ROLE: &str = "role";
    pub const USER: &str = "user";
}

/// Action name registry
pub mod action {
    pub const READ: &str = "read";
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    /// Cancel an order (self-service: own orders only)
    pub const CANCEL: &str = "cancel";
    /// Settle a payment
    pub const PROCESS: &str = "process";
    /// Staff-level management of a resource (e.g. cancel any order)
    pub const MANAGE: &str = "manage";
}

/// All registered resource names
pub const RESOURCES: &[&str] = &[
    resource::CATEGORY,
    resource::MENU,
    resource::FOOD_ITEM,
    resource::TIMEFRAME,
    resource::ORDER,
    resource::PAYMENT,
    resource::ROLE,
    resource::USER,
];

/// All registered action names
pub const ACTIONS: &[&str] = &[
    action::READ,
    action::CREATE,
    action::UPDATE,
    action::DELETE,
    action::CANCEL,
    action::PROCESS,
    action::MANAGE,
];

/// Seeded role names, created at bootstrap
pub const SEEDED_ROLES: &[&str] = &[
    "super-admin",
    "canteen-admin",
    "menu-manager",
    "order-manager",
    "payment-manager",
    "cashier",
    "customer",
];

/// Role name that carries the wildcard grant and `is_system` protection
pub const SUPER_ADMIN: &str = "super-admin";

pub fn is_known_resource(name: &str) -> bool {
    name == WILDCARD || RESOURCES.contains(&name)
}

pub fn is_known_action(name: &str) -> bool {
    name == WILDCARD || ACTIONS.contains(&name)
}

/// Per-role permission matrix: `resource -> action -> allow`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix(pub HashMap<String, HashMap<String, bool>>);

impl PermissionMatrix {
    /// Empty matrix (denies everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Matrix holding only the unconditional `"*" -> "*" -> true` grant
    pub fn wildcard() -> Self {
        let mut matrix = Self::new();
        matrix.grant(WILDCARD, WILDCARD);
        matrix
    }

    /// Set `(resource, action)` to allow
    pub fn grant(&mut self, resource: &str, action: &str) {
        self.0
            .entry(resource.to_string())
            .or_default()
            .insert(action.to_string(), true);
    }

    /// Whether this matrix allows `(resource, action)`
    ///
    /// The full wildcard entry short-circuits; otherwise only the exact
    /// entry is consulted and absence means deny.
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        if let Some(actions) = self.0.get(WILDCARD)
            && actions.get(WILDCARD).copied().unwrap_or(false)
        {
            return true;
        }
        self.0
            .get(resource)
            .and_then(|actions| actions.get(action))
            .copied()
            .unwrap_or(false)
    }

    /// Whether this matrix holds the full wildcard grant
    pub fn is_wildcard(&self) -> bool {
        self.0
            .get(WILDCARD)
            .and_then(|actions| actions.get(WILDCARD))
            .copied()
            .unwrap_or(false)
    }

    /// Iterate over all granted `(resource, action)` pairs
    pub fn granted_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(res, actions)| {
            actions
                .iter()
                .filter(|(_, allow)| **allow)
                .map(move |(act, _)| (res.as_str(), act.as_str()))
        })
    }

    /// Validate that every key is a registered name or the wildcard
    pub fn validate(&self) -> AppResult<()> {
        for (res, actions) in &self.0 {
            if !is_known_resource(res) {
                return Err(AppError::invalid_request(format!(
                    "Unknown resource name: {}",
                    res
                )));
            }
            for act in actions.keys() {
                if !is_known_action(act) {
                    return Err(AppError::invalid_request(format!(
                        "Unknown action name: {}",
                        act
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Default permission matrix for a seeded role name
///
/// Unknown role names get an empty (deny-all) matrix.
pub fn default_matrix(role_name: &str) -> PermissionMatrix {
    use action::*;
    use resource::*;

    let mut m = PermissionMatrix::new();
    match role_name {
        "super-admin" => return PermissionMatrix::wildcard(),
        "canteen-admin" => {
            for res in RESOURCES {
                for act in [READ, CREATE, UPDATE, DELETE] {
                    m.grant(res, act);
                }
            }
            m.grant(ORDER, CANCEL);
            m.grant(ORDER, MANAGE);
            m.grant(PAYMENT, PROCESS);
        }
        "menu-manager" => {
            for res in [CATEGORY, MENU, FOOD_ITEM, TIMEFRAME] {
                for act in [READ, CREATE, UPDATE, DELETE] {
                    m.grant(res, act);
                }
            }
        }
        "order-manager" => {
            m.grant(ORDER, READ);
            m.grant(ORDER, UPDATE);
            m.grant(ORDER, CANCEL);
            m.grant(ORDER, MANAGE);
            m.grant(PAYMENT, READ);
            m.grant(FOOD_ITEM, READ);
        }
        "payment-manager" => {
            m.grant(PAYMENT, READ);
            m.grant(PAYMENT, PROCESS);
            m.grant(ORDER, READ);
        }
        "cashier" => {
            m.grant(ORDER, READ);
            m.grant(ORDER, CREATE);
            m.grant(PAYMENT, READ);
            m.grant(PAYMENT, PROCESS);
            m.grant(CATEGORY, READ);
            m.grant(MENU, READ);
            m.grant(FOOD_ITEM, READ);
        }
        "customer" => {
            m.grant(ORDER, READ);
            m.grant(ORDER, CREATE);
            m.grant(ORDER, CANCEL);
            m.grant(CATEGORY, READ);
            m.grant(MENU, READ);
            m.grant(FOOD_ITEM, READ);
        }
        _ => {}
    }
    m
}

/// In-memory store of role permission matrices
///
/// Loaded from the role table at startup and refreshed whenever a role is
/// mutated through the role API. Lookups are lock-free (DashMap) since they
/// run on the hot path of every authorized request.
#[derive(Debug, Default)]
pub struct PermissionStore {
    roles: DashMap<String, PermissionMatrix>,
}

impl PermissionStore {
    pub fn new() -> Self {
        Self {
            roles: DashMap::new(),
        }
    }

    /// Replace the full role set (startup / reload)
    pub fn replace_all(&self, roles: impl IntoIterator<Item = (String, PermissionMatrix)>) {
        self.roles.clear();
        for (name, matrix) in roles {
            self.roles.insert(name, matrix);
        }
    }

    /// Insert or update a single role's matrix
    pub fn upsert_role(&self, name: impl Into<String>, matrix: PermissionMatrix) {
        self.roles.insert(name.into(), matrix);
    }

    /// Remove a role from the store
    pub fn remove_role(&self, name: &str) {
        self.roles.remove(name);
    }

    /// Whether a single role allows `(resource, action)`
    ///
    /// Unknown roles deny.
    pub fn is_allowed(&self, role: &str, resource: &str, action: &str) -> bool {
        self.roles
            .get(role)
            .map(|matrix| matrix.allows(resource, action))
            .unwrap_or(false)
    }

    /// Whether any of the given roles allows `(resource, action)`
    ///
    /// Unlike [`authorize`](Self::authorize) this never errors; roles missing
    /// from the store simply do not grant.
    pub fn any_allows(&self, roles: &[String], resource: &str, action: &str) -> bool {
        roles
            .iter()
            .any(|role| self.is_allowed(role, resource, action))
    }

    /// Authorize a user's role set for `(resource, action)`
    ///
    /// A role name that resolves to no stored role is a configuration
    /// integrity error and fails closed with a permission error.
    pub fn authorize(&self, roles: &[String], resource: &str, action: &str) -> AppResult<()> {
        if roles.is_empty() {
            return Err(AppError::permission_denied(format!(
                "Permission denied: {}:{}",
                resource, action
            )));
        }

        let mut granted = false;
        for role in roles {
            match self.roles.get(role.as_str()) {
                Some(matrix) => {
                    if matrix.allows(resource, action) {
                        granted = true;
                    }
                }
                None => {
                    security_log!(
                        "WARN",
                        "unknown_role",
                        role = role.clone(),
                        required = format!("{}:{}", resource, action)
                    );
                    return Err(AppError::forbidden(format!(
                        "Role '{}' is not configured",
                        role
                    )));
                }
            }
        }

        if granted {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Permission denied: {}:{}",
                resource, action
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, PermissionMatrix)]) -> PermissionStore {
        let store = PermissionStore::new();
        store.replace_all(
            entries
                .iter()
                .map(|(name, m)| (name.to_string(), m.clone())),
        );
        store
    }

    #[test]
    fn test_wildcard_allows_everything() {
        let matrix = PermissionMatrix::wildcard();
        assert!(matrix.allows(resource::ORDER, action::CREATE));
        assert!(matrix.allows(resource::ROLE, action::DELETE));
        assert!(matrix.allows("anything", "whatever"));
    }

    #[test]
    fn test_empty_matrix_denies_everything() {
        let matrix = PermissionMatrix::new();
        for res in RESOURCES {
            for act in ACTIONS {
                assert!(!matrix.allows(res, act));
            }
        }
    }

    #[test]
    fn test_exact_entry_is_returned() {
        let mut matrix = PermissionMatrix::new();
        matrix.grant(resource::ORDER, action::READ);
        matrix
            .0
            .entry(resource::ORDER.to_string())
            .or_default()
            .insert(action::CANCEL.to_string(), false);

        assert!(matrix.allows(resource::ORDER, action::READ));
        // Explicit false is deny
        assert!(!matrix.allows(resource::ORDER, action::CANCEL));
        // Absent is deny
        assert!(!matrix.allows(resource::ORDER, action::DELETE));
    }

    #[test]
    fn test_no_partial_wildcard_fallback() {
        let mut matrix = PermissionMatrix::new();
        // A resource-level wildcard without the full "*"/"*" pair grants
        // nothing beyond its exact entries
        matrix.grant(WILDCARD, action::READ);
        assert!(!matrix.allows(resource::ORDER, action::READ));
        assert!(matrix.allows(WILDCARD, action::READ));
    }

    #[test]
    fn test_multi_role_or_semantics() {
        let mut orders_only = PermissionMatrix::new();
        orders_only.grant(resource::ORDER, action::READ);

        let store = store_with(&[
            ("order-reader", orders_only),
            ("nobody", PermissionMatrix::new()),
        ]);

        let roles = vec!["nobody".to_string(), "order-reader".to_string()];
        assert!(store.authorize(&roles, resource::ORDER, action::READ).is_ok());
        assert!(
            store
                .authorize(&roles, resource::ORDER, action::DELETE)
                .is_err()
        );
    }

    #[test]
    fn test_missing_role_fails_closed() {
        let store = store_with(&[("super-admin", PermissionMatrix::wildcard())]);
        // Even combined with a wildcard role, an unconfigured role name is an
        // integrity error
        let roles = vec!["ghost".to_string()];
        assert!(store.authorize(&roles, resource::ORDER, action::READ).is_err());

        let empty: Vec<String> = vec![];
        assert!(store.authorize(&empty, resource::ORDER, action::READ).is_err());
    }

    #[test]
    fn test_default_matrices() {
        assert!(default_matrix(SUPER_ADMIN).is_wildcard());

        let customer = default_matrix("customer");
        assert!(customer.allows(resource::ORDER, action::CREATE));
        assert!(customer.allows(resource::ORDER, action::CANCEL));
        assert!(!customer.allows(resource::ORDER, action::MANAGE));
        assert!(!customer.allows(resource::ROLE, action::READ));

        let cashier = default_matrix("cashier");
        assert!(cashier.allows(resource::PAYMENT, action::PROCESS));
        assert!(!cashier.allows(resource::ORDER, action::CANCEL));

        assert!(default_matrix("unknown-role").0.is_empty());
    }

    #[test]
    fn test_matrix_validate() {
        let mut matrix = PermissionMatrix::new();
        matrix.grant(resource::ORDER, action::READ);
        matrix.grant(WILDCARD, WILDCARD);
        assert!(matrix.validate().is_ok());

        let mut bad = PermissionMatrix::new();
        bad.grant("spaceship", action::READ);
        assert!(bad.validate().is_err());

        let mut bad_action = PermissionMatrix::new();
        bad_action.grant(resource::ORDER, "launch");
        assert!(bad_action.validate().is_err());
    }

    #[test]
    fn test_matrix_serde_shape() {
        let mut matrix = PermissionMatrix::new();
        matrix.grant(resource::ORDER, action::READ);
        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, r#"{"order":{"read":true}}"#);

        let parsed: PermissionMatrix = serde_json::from_str(r#"{"*":{"*":true}}"#).unwrap();
        assert!(parsed.is_wildcard());
    }
}
