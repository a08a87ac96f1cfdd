use sangathan_domain::{MenuItem, default_menu};

use super::*;

impl AuthorizationService {
    /// Returns the sidebar menu filtered to what the subject may see.
    ///
    /// An absent role sees an empty menu.
    pub async fn resolve_navigation(&self, subject: &str) -> AppResult<Vec<MenuItem>> {
        let Some(role) = self.resolve_role(subject).await? else {
            return Ok(Vec::new());
        };

        Ok(filter_menu(default_menu()?, &role))
    }
}

/// Depth-first menu filter.
///
/// A node is kept when the role-name restriction passes, at least one
/// required permission is granted (an empty requirement is unrestricted),
/// and its path, when present, passes the sidebar allow-list. Group nodes
/// are kept only while they still have visible children.
fn filter_menu(items: Vec<MenuItem>, role: &EffectiveRole) -> Vec<MenuItem> {
    let mut visible = Vec::with_capacity(items.len());

    for item in items {
        if !role_restriction_passes(&item, role) || !permission_restriction_passes(&item, role) {
            continue;
        }

        if let Some(path) = item.path()
            && !role.allows_path(path)
        {
            continue;
        }

        if item.children().is_empty() {
            visible.push(item);
            continue;
        }

        let children = filter_menu(item.children().to_vec(), role);
        if !children.is_empty() {
            visible.push(item.with_children(children));
        }
    }

    visible
}

fn role_restriction_passes(item: &MenuItem, role: &EffectiveRole) -> bool {
    if matches!(role, EffectiveRole::Superadmin) || item.allowed_roles().is_empty() {
        return true;
    }

    item.allowed_roles()
        .iter()
        .any(|allowed| allowed == role.name())
}

fn permission_restriction_passes(item: &MenuItem, role: &EffectiveRole) -> bool {
    item.required_permissions().is_empty()
        || role.has_any_permission(item.required_permissions())
}
