use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Coarse-grained user category.
///
/// Privilege is NOT ordered by rank: permissions are assigned per role in
/// [`crate::authz::PermissionMap`], even though in practice higher roles end
/// up with supersets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Attendee,
    Staff,
    Organizer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Attendee, Role::Staff, Role::Organizer, Role::Admin];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Attendee => "attendee",
            Role::Staff => "staff",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attendee" => Ok(Role::Attendee),
            "staff" => Ok(Role::Staff),
            "organizer" => Ok(Role::Organizer),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);
