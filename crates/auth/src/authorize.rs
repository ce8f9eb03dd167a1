use std::collections::HashSet;

use thiserror::Error;

use crate::{Permission, PrincipalId, Role};

/// A fully resolved principal for authorization decisions.
///
/// Construction is intentionally decoupled from storage and transport: the
/// API derives it from validated session claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub name: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Permissions granted by a role.
///
/// `admin` gets the wildcard; `operator` covers day-to-day catalog and
/// ledger work but not destructive operations or backups.
pub fn role_permissions(role: &Role) -> Vec<Permission> {
    match role.as_str() {
        "admin" => vec![Permission::new("*")],
        "operator" => vec![
            Permission::new("manufacturers.read"),
            Permission::new("manufacturers.write"),
            Permission::new("products.read"),
            Permission::new("products.write"),
            Permission::new("movements.read"),
            Permission::new("movements.write"),
            Permission::new("reports.read"),
        ],
        _ => Vec::new(),
    }
}

/// Authorize a principal against a required permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<String> = principal
        .roles
        .iter()
        .flat_map(role_permissions)
        .map(|p| p.as_str().to_string())
        .collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(roles: Vec<Role>) -> Principal {
        Principal {
            principal_id: PrincipalId::new(),
            name: "test".to_string(),
            roles,
        }
    }

    #[test]
    fn admin_wildcard_grants_everything() {
        let p = principal(vec![Role::admin()]);
        assert!(authorize(&p, &Permission::new("backup.read")).is_ok());
        assert!(authorize(&p, &Permission::new("products.delete")).is_ok());
    }

    #[test]
    fn operator_can_work_the_ledger_but_not_delete() {
        let p = principal(vec![Role::operator()]);
        assert!(authorize(&p, &Permission::new("movements.write")).is_ok());
        assert!(authorize(&p, &Permission::new("products.write")).is_ok());

        let err = authorize(&p, &Permission::new("products.delete")).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("products.delete".to_string()));
        assert!(authorize(&p, &Permission::new("backup.read")).is_err());
    }

    #[test]
    fn unknown_roles_grant_nothing() {
        let p = principal(vec![Role::new("auditor")]);
        assert!(authorize(&p, &Permission::new("products.read")).is_err());
    }
}
