//! Route requirements and the guard evaluation chain.
//!
//! Requirements are ordinary data attached at route registration, not
//! handler annotations. Evaluation is an ordered list of pure predicates:
//! presence/authentication first, then roles, then permissions. Declaring
//! only one kind of requirement skips the other check entirely.

use crate::auth::principal::Principal;
use crate::authz::{engine, Permission, PermissionMap, Role};

/// Role/permission requirements declared alongside a route registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequirements {
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl RouteRequirements {
    /// Open to any authenticated principal.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    #[must_use]
    pub fn permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }
}

/// Why a guarded request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    /// No verified principal on the request: an authentication failure, not
    /// an authorization failure.
    #[error("authentication required")]
    Unauthenticated,
    #[error("required role missing")]
    MissingRole,
    #[error("required permission missing")]
    MissingPermission,
}

type GuardCheck = fn(&Principal, &RouteRequirements, &PermissionMap) -> Result<(), Denial>;

/// Ordered predicate chain; each link passes or short-circuits with a denial.
const GUARD_CHAIN: &[GuardCheck] = &[check_roles, check_permissions];

fn check_roles(
    principal: &Principal,
    requirements: &RouteRequirements,
    _map: &PermissionMap,
) -> Result<(), Denial> {
    if requirements.roles.is_empty() {
        return Ok(());
    }
    if engine::has_role(&principal.roles, &requirements.roles) {
        Ok(())
    } else {
        Err(Denial::MissingRole)
    }
}

fn check_permissions(
    principal: &Principal,
    requirements: &RouteRequirements,
    map: &PermissionMap,
) -> Result<(), Denial> {
    if requirements.permissions.is_empty() {
        return Ok(());
    }
    if map.has_all_permissions(&principal.roles, &requirements.permissions) {
        Ok(())
    } else {
        Err(Denial::MissingPermission)
    }
}

/// Evaluate the guard chain for a protected operation.
///
/// `principal` is `None` when no verified token was attached to the request;
/// that case is always [`Denial::Unauthenticated`] regardless of what the
/// route requires.
pub fn authorize(
    principal: Option<&Principal>,
    requirements: &RouteRequirements,
    map: &PermissionMap,
) -> Result<(), Denial> {
    let principal = principal.ok_or(Denial::Unauthenticated)?;

    for check in GUARD_CHAIN {
        check(principal, requirements, map)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal::new(7, "guard@example.com".to_string(), role)
    }

    #[test]
    fn missing_principal_is_an_authentication_failure() {
        let map = PermissionMap::new();
        let requirements = RouteRequirements::none();

        assert_eq!(
            authorize(None, &requirements, &map),
            Err(Denial::Unauthenticated)
        );
    }

    #[test]
    fn no_requirements_admit_any_authenticated_principal() {
        let map = PermissionMap::new();
        let requirements = RouteRequirements::none();
        let attendee = principal(Role::Attendee);

        assert_eq!(authorize(Some(&attendee), &requirements, &map), Ok(()));
    }

    #[test]
    fn role_requirement_is_any_of() {
        let map = PermissionMap::new();
        let requirements = RouteRequirements::none().roles([Role::Organizer, Role::Admin]);

        assert_eq!(
            authorize(Some(&principal(Role::Organizer)), &requirements, &map),
            Ok(())
        );
        assert_eq!(
            authorize(Some(&principal(Role::Staff)), &requirements, &map),
            Err(Denial::MissingRole)
        );
    }

    #[test]
    fn permission_requirement_is_all_of() {
        let map = PermissionMap::new();
        let requirements = RouteRequirements::none()
            .permissions([Permission::ViewAttendees, Permission::ViewReports]);

        assert_eq!(
            authorize(Some(&principal(Role::Organizer)), &requirements, &map),
            Ok(())
        );
        // Staff can view attendees but not reports: the superset check fails.
        assert_eq!(
            authorize(Some(&principal(Role::Staff)), &requirements, &map),
            Err(Denial::MissingPermission)
        );
    }

    #[test]
    fn role_check_runs_before_permission_check() {
        let map = PermissionMap::new();
        let requirements = RouteRequirements::none()
            .roles([Role::Admin])
            .permissions([Permission::ViewAttendees]);

        // Staff holds the permission but not the role; the denial must name
        // the role, proving evaluation order.
        assert_eq!(
            authorize(Some(&principal(Role::Staff)), &requirements, &map),
            Err(Denial::MissingRole)
        );
    }

    #[test]
    fn both_checks_must_pass_when_both_are_declared() {
        let map = PermissionMap::new();
        let requirements = RouteRequirements::none()
            .roles([Role::Admin, Role::Staff])
            .permissions([Permission::ConfigureSystem]);

        assert_eq!(
            authorize(Some(&principal(Role::Admin)), &requirements, &map),
            Ok(())
        );
        // Staff passes the role gate but lacks the permission.
        assert_eq!(
            authorize(Some(&principal(Role::Staff)), &requirements, &map),
            Err(Denial::MissingPermission)
        );
    }

    #[test]
    fn role_only_requirement_skips_permission_check() {
        let map = PermissionMap::new();
        let requirements = RouteRequirements::none().roles([Role::Attendee]);

        // Attendee carries zero permissions yet passes: no permission
        // requirement was declared.
        assert_eq!(
            authorize(Some(&principal(Role::Attendee)), &requirements, &map),
            Ok(())
        );
    }
}
