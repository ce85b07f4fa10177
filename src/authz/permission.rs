use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Atomic capability tag checked by the authorization engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum Permission {
    #[serde(rename = "events:create")]
    CreateEvents,
    #[serde(rename = "events:manage")]
    ManageEvents,
    #[serde(rename = "events:publish")]
    PublishEvents,
    #[serde(rename = "attendees:view")]
    ViewAttendees,
    #[serde(rename = "attendees:check-in")]
    CheckInAttendees,
    #[serde(rename = "reports:view")]
    ViewReports,
    #[serde(rename = "system:configure")]
    ConfigureSystem,
    #[serde(rename = "users:manage")]
    ManageUsers,
}

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::CreateEvents,
        Permission::ManageEvents,
        Permission::PublishEvents,
        Permission::ViewAttendees,
        Permission::CheckInAttendees,
        Permission::ViewReports,
        Permission::ConfigureSystem,
        Permission::ManageUsers,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateEvents => "events:create",
            Permission::ManageEvents => "events:manage",
            Permission::PublishEvents => "events:publish",
            Permission::ViewAttendees => "attendees:view",
            Permission::CheckInAttendees => "attendees:check-in",
            Permission::ViewReports => "reports:view",
            Permission::ConfigureSystem => "system:configure",
            Permission::ManageUsers => "users:manage",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named grouping of permissions for administration screens.
///
/// Groups have no effect on evaluation; they only shape how permissions are
/// presented.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PermissionGroup {
    pub name: &'static str,
    pub permissions: &'static [Permission],
}

pub const PERMISSION_GROUPS: [PermissionGroup; 4] = [
    PermissionGroup {
        name: "Events",
        permissions: &[
            Permission::CreateEvents,
            Permission::ManageEvents,
            Permission::PublishEvents,
        ],
    },
    PermissionGroup {
        name: "Attendees",
        permissions: &[Permission::ViewAttendees, Permission::CheckInAttendees],
    },
    PermissionGroup {
        name: "Reports",
        permissions: &[Permission::ViewReports],
    },
    PermissionGroup {
        name: "System",
        permissions: &[Permission::ConfigureSystem, Permission::ManageUsers],
    },
];
