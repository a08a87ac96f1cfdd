use std::str::FromStr;

use sangathan_core::AppError;
use serde::{Deserialize, Serialize};

/// Permissions enforced by application policy checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows viewing the dashboard landing page.
    DashboardView,
    /// Allows reading state units.
    StateRead,
    /// Allows mutating state units.
    StateWrite,
    /// Allows reading districts.
    DistrictRead,
    /// Allows mutating districts.
    DistrictWrite,
    /// Allows reading divisions.
    DivisionRead,
    /// Allows mutating divisions.
    DivisionWrite,
    /// Allows reading booths.
    BoothRead,
    /// Allows mutating booths.
    BoothWrite,
    /// Allows reading samiti committees.
    CommitteeRead,
    /// Allows mutating samiti committees.
    CommitteeWrite,
    /// Allows reading organizational events.
    EventRead,
    /// Allows mutating organizational events.
    EventWrite,
    /// Allows managing user accounts.
    UserManage,
    /// Allows managing roles and assignments.
    RoleManage,
    /// Allows reading audit log entries.
    AuditRead,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DashboardView => "dashboard.view",
            Self::StateRead => "directory.state.read",
            Self::StateWrite => "directory.state.write",
            Self::DistrictRead => "directory.district.read",
            Self::DistrictWrite => "directory.district.write",
            Self::DivisionRead => "directory.division.read",
            Self::DivisionWrite => "directory.division.write",
            Self::BoothRead => "directory.booth.read",
            Self::BoothWrite => "directory.booth.write",
            Self::CommitteeRead => "committee.read",
            Self::CommitteeWrite => "committee.write",
            Self::EventRead => "event.read",
            Self::EventWrite => "event.write",
            Self::UserManage => "admin.user.manage",
            Self::RoleManage => "admin.role.manage",
            Self::AuditRead => "admin.audit.read",
        }
    }

    /// Returns the category this permission belongs to.
    #[must_use]
    pub fn category(&self) -> PermissionCategory {
        match self {
            Self::DashboardView => PermissionCategory::Dashboard,
            Self::StateRead
            | Self::StateWrite
            | Self::DistrictRead
            | Self::DistrictWrite
            | Self::DivisionRead
            | Self::DivisionWrite
            | Self::BoothRead
            | Self::BoothWrite => PermissionCategory::Directory,
            Self::CommitteeRead | Self::CommitteeWrite => PermissionCategory::Committees,
            Self::EventRead | Self::EventWrite => PermissionCategory::Events,
            Self::UserManage | Self::RoleManage | Self::AuditRead => {
                PermissionCategory::Administration
            }
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::DashboardView,
            Permission::StateRead,
            Permission::StateWrite,
            Permission::DistrictRead,
            Permission::DistrictWrite,
            Permission::DivisionRead,
            Permission::DivisionWrite,
            Permission::BoothRead,
            Permission::BoothWrite,
            Permission::CommitteeRead,
            Permission::CommitteeWrite,
            Permission::EventRead,
            Permission::EventWrite,
            Permission::UserManage,
            Permission::RoleManage,
            Permission::AuditRead,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    ///
    /// Unknown values are rejected here, so a role's grant list can only
    /// ever contain members of the closed set.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dashboard.view" => Ok(Self::DashboardView),
            "directory.state.read" => Ok(Self::StateRead),
            "directory.state.write" => Ok(Self::StateWrite),
            "directory.district.read" => Ok(Self::DistrictRead),
            "directory.district.write" => Ok(Self::DistrictWrite),
            "directory.division.read" => Ok(Self::DivisionRead),
            "directory.division.write" => Ok(Self::DivisionWrite),
            "directory.booth.read" => Ok(Self::BoothRead),
            "directory.booth.write" => Ok(Self::BoothWrite),
            "committee.read" => Ok(Self::CommitteeRead),
            "committee.write" => Ok(Self::CommitteeWrite),
            "event.read" => Ok(Self::EventRead),
            "event.write" => Ok(Self::EventWrite),
            "admin.user.manage" => Ok(Self::UserManage),
            "admin.role.manage" => Ok(Self::RoleManage),
            "admin.audit.read" => Ok(Self::AuditRead),
            _ => Err(AppError::Validation(format!(
                "unknown permission value '{value}'"
            ))),
        }
    }
}

/// Grouping used when presenting the permission catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    /// Dashboard landing page.
    Dashboard,
    /// Geographic directory units.
    Directory,
    /// Samiti committees.
    Committees,
    /// Organizational events.
    Events,
    /// User, role and audit administration.
    Administration,
}

impl PermissionCategory {
    /// Returns a stable display value for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Directory => "directory",
            Self::Committees => "committees",
            Self::Events => "events",
            Self::Administration => "administration",
        }
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a directory unit is created.
    DirectoryUnitCreated,
    /// Emitted when a directory unit is updated.
    DirectoryUnitUpdated,
    /// Emitted when a directory unit is deleted.
    DirectoryUnitDeleted,
    /// Emitted when a samiti committee is created.
    CommitteeCreated,
    /// Emitted when a samiti committee is updated.
    CommitteeUpdated,
    /// Emitted when a samiti committee is deleted.
    CommitteeDeleted,
    /// Emitted when an organizational event is created.
    EventCreated,
    /// Emitted when an organizational event is updated.
    EventUpdated,
    /// Emitted when an organizational event is deleted.
    EventDeleted,
    /// Emitted when a custom role is created.
    SecurityRoleCreated,
    /// Emitted when a role is assigned to a subject.
    SecurityRoleAssigned,
    /// Emitted when a role is removed from a subject.
    SecurityRoleUnassigned,
    /// Emitted when an administrator creates a user account.
    UserCreated,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectoryUnitCreated => "directory.unit.created",
            Self::DirectoryUnitUpdated => "directory.unit.updated",
            Self::DirectoryUnitDeleted => "directory.unit.deleted",
            Self::CommitteeCreated => "committee.created",
            Self::CommitteeUpdated => "committee.updated",
            Self::CommitteeDeleted => "committee.deleted",
            Self::EventCreated => "event.created",
            Self::EventUpdated => "event.updated",
            Self::EventDeleted => "event.deleted",
            Self::SecurityRoleCreated => "security.role.created",
            Self::SecurityRoleAssigned => "security.role.assigned",
            Self::SecurityRoleUnassigned => "security.role.unassigned",
            Self::UserCreated => "user.created",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Permission, PermissionCategory};

    #[test]
    fn every_permission_roundtrips_through_storage_value() {
        for permission in Permission::all() {
            let restored = Permission::from_str(permission.as_str());
            assert_eq!(restored.ok(), Some(*permission));
        }
    }

    #[test]
    fn unknown_permission_is_rejected() {
        let parsed = Permission::from_str("directory.state.publish");
        assert!(parsed.is_err());
    }

    #[test]
    fn directory_permissions_share_a_category() {
        assert_eq!(
            Permission::BoothWrite.category(),
            PermissionCategory::Directory
        );
        assert_eq!(
            Permission::StateRead.category(),
            PermissionCategory::Directory
        );
    }
}
