//! Sidebar menu tree and its access-control annotations.

use sangathan_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::Permission;

/// A node in the sidebar menu tree.
///
/// Leaf nodes carry a path; group nodes carry children instead. Access
/// annotations are optional: an empty role list means any role, an empty
/// permission list means no permission requirement (any-of otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    logical_name: NonEmptyString,
    label: NonEmptyString,
    path: Option<String>,
    icon: Option<String>,
    allowed_roles: Vec<String>,
    required_permissions: Vec<Permission>,
    children: Vec<MenuItem>,
}

impl MenuItem {
    /// Creates a validated menu node.
    pub fn new(
        logical_name: impl Into<String>,
        label: impl Into<String>,
        path: Option<String>,
        icon: Option<String>,
        allowed_roles: Vec<String>,
        required_permissions: Vec<Permission>,
        children: Vec<MenuItem>,
    ) -> AppResult<Self> {
        let path = path.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            logical_name: NonEmptyString::new(logical_name)?,
            label: NonEmptyString::new(label)?,
            path,
            icon,
            allowed_roles,
            required_permissions,
            children,
        })
    }

    /// Returns the stable node identifier.
    #[must_use]
    pub fn logical_name(&self) -> &str {
        self.logical_name.as_str()
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the navigation path for leaf nodes.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the optional icon name.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the role-name restriction, empty meaning unrestricted.
    #[must_use]
    pub fn allowed_roles(&self) -> &[String] {
        &self.allowed_roles
    }

    /// Returns the any-of permission requirement, empty meaning none.
    #[must_use]
    pub fn required_permissions(&self) -> &[Permission] {
        &self.required_permissions
    }

    /// Returns the child nodes.
    #[must_use]
    pub fn children(&self) -> &[MenuItem] {
        &self.children
    }

    /// Returns a copy of this node with the given children.
    #[must_use]
    pub fn with_children(&self, children: Vec<MenuItem>) -> Self {
        Self {
            children,
            ..self.clone()
        }
    }
}

fn leaf(
    logical_name: &str,
    label: &str,
    path: &str,
    icon: &str,
    required_permissions: Vec<Permission>,
) -> AppResult<MenuItem> {
    MenuItem::new(
        logical_name,
        label,
        Some(path.to_owned()),
        Some(icon.to_owned()),
        Vec::new(),
        required_permissions,
        Vec::new(),
    )
}

/// Builds the sidebar menu served to the dashboard.
pub fn default_menu() -> AppResult<Vec<MenuItem>> {
    let directory = MenuItem::new(
        "directory",
        "Directory",
        None,
        Some("map".to_owned()),
        Vec::new(),
        Vec::new(),
        vec![
            leaf(
                "states",
                "States",
                "/states",
                "flag",
                vec![Permission::StateRead],
            )?,
            leaf(
                "districts",
                "Districts",
                "/districts",
                "grid",
                vec![Permission::DistrictRead],
            )?,
            leaf(
                "divisions",
                "Divisions",
                "/divisions",
                "layers",
                vec![Permission::DivisionRead],
            )?,
            leaf(
                "booths",
                "Booths",
                "/booths",
                "home",
                vec![Permission::BoothRead],
            )?,
        ],
    )?;

    let administration = MenuItem::new(
        "administration",
        "Administration",
        None,
        Some("settings".to_owned()),
        Vec::new(),
        Vec::new(),
        vec![
            leaf(
                "users",
                "Users",
                "/users",
                "user",
                vec![Permission::UserManage],
            )?,
            leaf(
                "roles",
                "Roles",
                "/roles",
                "shield",
                vec![Permission::RoleManage],
            )?,
            leaf(
                "audit_log",
                "Audit Log",
                "/audit-log",
                "list",
                vec![Permission::AuditRead],
            )?,
        ],
    )?;

    Ok(vec![
        leaf(
            "dashboard",
            "Dashboard",
            "/dashboard",
            "gauge",
            vec![Permission::DashboardView],
        )?,
        directory,
        leaf(
            "samitis",
            "Samitis",
            "/samitis",
            "users",
            vec![Permission::CommitteeRead],
        )?,
        leaf(
            "events",
            "Events",
            "/events",
            "calendar",
            vec![Permission::EventRead],
        )?,
        administration,
    ])
}

#[cfg(test)]
mod tests {
    use crate::Permission;

    use super::{MenuItem, default_menu};

    #[test]
    fn menu_node_requires_a_label() {
        let item = MenuItem::new(
            "dashboard",
            "  ",
            Some("/dashboard".to_owned()),
            None,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert!(item.is_err());
    }

    #[test]
    fn blank_path_is_dropped() {
        let item = MenuItem::new(
            "directory",
            "Directory",
            Some("   ".to_owned()),
            None,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(item.ok().and_then(|node| node.path().map(str::to_owned)), None);
    }

    #[test]
    fn default_menu_covers_every_dashboard_surface() {
        let menu = default_menu().unwrap_or_default();
        assert_eq!(menu.len(), 5);

        let directory = menu
            .iter()
            .find(|item| item.logical_name() == "directory")
            .map(|item| item.children().len());
        assert_eq!(directory, Some(4));

        let dashboard = menu.first();
        assert_eq!(
            dashboard.map(|item| item.required_permissions().to_vec()),
            Some(vec![Permission::DashboardView])
        );
    }
}
