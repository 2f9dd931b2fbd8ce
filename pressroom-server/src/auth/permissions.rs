//! Permission grants per role
//!
//! Roles are closed; the grant lists are static. Admin is special-cased in
//! [`CurrentUser::has_permission`](super::CurrentUser::has_permission) and
//! needs no list here.

use shared::workflow::Role;

/// Sales own intake, import, dispatch decisions and the customer side
const SALES_PERMISSIONS: &[&str] = &[
    "orders:create",
    "orders:update",
    "orders:archive",
    "orders:delete",
    "orders:import",
    "orders:check_duplicate",
    "items:process",
    "items:approve",
    "items:dispatch",
    "vendors:read",
    "files:*",
];

/// Department roles process items and read what they can see
const DEPARTMENT_PERMISSIONS: &[&str] = &["items:process", "files:*", "vendors:read"];

/// Production additionally starts and tracks outsource jobs
const PRODUCTION_PERMISSIONS: &[&str] = &[
    "items:process",
    "items:outsource",
    "items:substage",
    "files:*",
    "vendors:read",
];

/// Dispatch finalizes shipments
const DISPATCH_PERMISSIONS: &[&str] = &["items:process", "items:dispatch", "files:*"];

pub fn permissions_for(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &[],
        Role::Sales => SALES_PERMISSIONS,
        Role::Design | Role::Prepress => DEPARTMENT_PERMISSIONS,
        Role::Production => PRODUCTION_PERMISSIONS,
        Role::Dispatch => DISPATCH_PERMISSIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sales_can_import_but_prepress_cannot() {
        assert!(permissions_for(Role::Sales).contains(&"orders:import"));
        assert!(!permissions_for(Role::Prepress).contains(&"orders:import"));
    }
}
