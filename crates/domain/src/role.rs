//! Role representation and the permission membership checks built on it.
//!
//! A stored role is either the reserved superadmin role or a named role
//! carrying an explicit permission set and a sidebar allow-list. The two
//! cases are collapsed into one tagged variant at construction time, so
//! every check below has exactly one superadmin branch.

use std::collections::BTreeSet;

use sangathan_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::Permission;

/// Reserved role name that short-circuits every authorization check.
pub const SUPERADMIN_ROLE_NAME: &str = "superadmin";

/// Sidebar path allow-list attached to a role.
///
/// The wildcard entry `"*"` grants every path; all other entries match by
/// exact string comparison only. There is no prefix or glob matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarAccess {
    /// Every sidebar path is accessible.
    All,
    /// Only the listed paths are accessible.
    Paths(BTreeSet<String>),
}

impl SidebarAccess {
    /// Builds sidebar access from stored entries, folding the `"*"`
    /// wildcard sentinel into the `All` variant.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = String>) -> Self {
        let mut paths = BTreeSet::new();
        for entry in entries {
            let trimmed = entry.trim();
            if trimmed == "*" {
                return Self::All;
            }
            if !trimmed.is_empty() {
                paths.insert(trimmed.to_owned());
            }
        }

        Self::Paths(paths)
    }

    /// Returns whether the given path is accessible.
    #[must_use]
    pub fn allows(&self, path: &str) -> bool {
        match self {
            Self::All => true,
            Self::Paths(paths) => paths.contains(path),
        }
    }

    /// Returns the stored entries, with `All` rendered as the wildcard.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::All => vec!["*".to_owned()],
            Self::Paths(paths) => paths.iter().cloned().collect(),
        }
    }
}

/// A named role with explicit permission grants and sidebar access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    name: NonEmptyString,
    permissions: BTreeSet<Permission>,
    sidebar: SidebarAccess,
}

impl Role {
    /// Creates a validated role.
    pub fn new(
        name: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
        sidebar: SidebarAccess,
    ) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            permissions: permissions.into_iter().collect(),
            sidebar,
        })
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the granted permission set.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    /// Returns the sidebar allow-list.
    #[must_use]
    pub fn sidebar(&self) -> &SidebarAccess {
        &self.sidebar
    }
}

/// A role as seen by authorization checks.
///
/// A stored role named [`SUPERADMIN_ROLE_NAME`] becomes the `Superadmin`
/// variant here, so the bypass exists in exactly one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveRole {
    /// Bypasses every permission and sidebar check.
    Superadmin,
    /// A regular role checked against its explicit grants.
    Standard(Role),
}

impl EffectiveRole {
    /// Collapses a stored role into its effective form.
    #[must_use]
    pub fn from_role(role: Role) -> Self {
        if role.name() == SUPERADMIN_ROLE_NAME {
            Self::Superadmin
        } else {
            Self::Standard(role)
        }
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Superadmin => SUPERADMIN_ROLE_NAME,
            Self::Standard(role) => role.name(),
        }
    }

    /// Returns whether the role grants a single permission.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        match self {
            Self::Superadmin => true,
            Self::Standard(role) => role.permissions.contains(&permission),
        }
    }

    /// Returns whether at least one of the requested permissions is granted.
    ///
    /// An empty request is vacuously false.
    #[must_use]
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        permissions
            .iter()
            .any(|permission| self.has_permission(*permission))
    }

    /// Returns whether every requested permission is granted.
    ///
    /// An empty request is vacuously true.
    #[must_use]
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        permissions
            .iter()
            .all(|permission| self.has_permission(*permission))
    }

    /// Returns whether the role may access a sidebar path.
    #[must_use]
    pub fn allows_path(&self, path: &str) -> bool {
        match self {
            Self::Superadmin => true,
            Self::Standard(role) => role.sidebar.allows(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::Permission;

    use super::{EffectiveRole, Role, SidebarAccess};

    fn manager_role() -> EffectiveRole {
        let role = Role::new(
            "manager",
            [Permission::DashboardView, Permission::EventRead],
            SidebarAccess::from_entries(["/dashboard".to_owned(), "/events".to_owned()]),
        );
        EffectiveRole::from_role(role.unwrap_or_else(|_| unreachable!("valid role")))
    }

    #[test]
    fn superadmin_has_every_known_permission() {
        let role = EffectiveRole::Superadmin;
        for permission in Permission::all() {
            assert!(role.has_permission(*permission));
        }
    }

    #[test]
    fn stored_role_named_superadmin_collapses_to_bypass() {
        let role = Role::new("superadmin", [], SidebarAccess::from_entries([]));
        let effective = EffectiveRole::from_role(role.unwrap_or_else(|_| unreachable!()));
        assert_eq!(effective, EffectiveRole::Superadmin);
        assert!(effective.has_permission(Permission::RoleManage));
        assert!(effective.allows_path("/anything"));
    }

    #[test]
    fn standard_role_checks_exact_membership() {
        let role = manager_role();
        assert!(role.has_permission(Permission::DashboardView));
        assert!(!role.has_permission(Permission::RoleManage));
    }

    #[test]
    fn any_of_empty_request_is_false() {
        assert!(!manager_role().has_any_permission(&[]));
        assert!(!EffectiveRole::Superadmin.has_any_permission(&[]));
    }

    #[test]
    fn all_of_empty_request_is_true() {
        assert!(manager_role().has_all_permissions(&[]));
        assert!(EffectiveRole::Superadmin.has_all_permissions(&[]));
    }

    #[test]
    fn any_of_passes_on_a_single_grant() {
        let role = manager_role();
        assert!(role.has_any_permission(&[Permission::RoleManage, Permission::EventRead]));
        assert!(!role.has_any_permission(&[Permission::RoleManage, Permission::UserManage]));
    }

    #[test]
    fn wildcard_sidebar_entry_grants_every_path() {
        let access = SidebarAccess::from_entries(["/dashboard".to_owned(), "*".to_owned()]);
        assert_eq!(access, SidebarAccess::All);
        assert!(access.allows("/never-configured"));
    }

    #[test]
    fn sidebar_paths_match_exactly_without_prefixes() {
        let access = SidebarAccess::from_entries(["/events".to_owned()]);
        assert!(access.allows("/events"));
        assert!(!access.allows("/events/archive"));
        assert!(!access.allows("/event"));
    }

    proptest! {
        #[test]
        fn superadmin_allows_any_path(path in "/[a-z/-]{0,24}") {
            prop_assert!(EffectiveRole::Superadmin.allows_path(&path));
        }

        #[test]
        fn exact_sidebar_membership_is_the_only_grant(path in "/[a-z-]{1,16}") {
            let access = SidebarAccess::from_entries(["/events".to_owned()]);
            prop_assert_eq!(access.allows(&path), path == "/events");
        }
    }
}
