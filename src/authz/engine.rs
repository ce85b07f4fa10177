use std::collections::{BTreeSet, HashMap};

use crate::authz::{Permission, Role};

/// Static role → permission assignments.
///
/// Built once at process start and never mutated. The map is configuration,
/// not data: it is not persisted and changing it requires a deploy.
#[derive(Debug)]
pub struct PermissionMap {
    grants: HashMap<Role, BTreeSet<Permission>>,
}

impl PermissionMap {
    #[must_use]
    pub fn new() -> Self {
        let mut grants: HashMap<Role, BTreeSet<Permission>> = HashMap::new();

        grants.insert(Role::Attendee, BTreeSet::new());
        grants.insert(
            Role::Staff,
            BTreeSet::from([Permission::ViewAttendees, Permission::CheckInAttendees]),
        );
        grants.insert(
            Role::Organizer,
            BTreeSet::from([
                Permission::CreateEvents,
                Permission::ManageEvents,
                Permission::PublishEvents,
                Permission::ViewAttendees,
                Permission::CheckInAttendees,
                Permission::ViewReports,
            ]),
        );
        grants.insert(Role::Admin, Permission::ALL.into_iter().collect());

        Self { grants }
    }

    /// Union of the permissions carried by every role in the set.
    #[must_use]
    pub fn permissions_for(&self, roles: &BTreeSet<Role>) -> BTreeSet<Permission> {
        roles
            .iter()
            .filter_map(|role| self.grants.get(role))
            .flat_map(|permissions| permissions.iter().copied())
            .collect()
    }

    /// The role-derived permission set must cover every required permission.
    #[must_use]
    pub fn has_all_permissions(&self, roles: &BTreeSet<Role>, required: &[Permission]) -> bool {
        let held = self.permissions_for(roles);
        required.iter().all(|permission| held.contains(permission))
    }

    /// At least one candidate permission is held.
    #[must_use]
    pub fn has_any_permission(&self, roles: &BTreeSet<Role>, candidates: &[Permission]) -> bool {
        let held = self.permissions_for(roles);
        candidates
            .iter()
            .any(|permission| held.contains(permission))
    }
}

impl Default for PermissionMap {
    fn default() -> Self {
        Self::new()
    }
}

/// "Any of" match: the principal's role set intersects the required set.
#[must_use]
pub fn has_role(roles: &BTreeSet<Role>, required: &[Role]) -> bool {
    required.iter().any(|role| roles.contains(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(list: &[Role]) -> BTreeSet<Role> {
        list.iter().copied().collect()
    }

    #[test]
    fn staff_holds_its_assigned_permissions() {
        let map = PermissionMap::new();
        let staff = roles(&[Role::Staff]);

        for permission in [Permission::ViewAttendees, Permission::CheckInAttendees] {
            assert!(map.has_all_permissions(&staff, &[permission]));
        }
    }

    #[test]
    fn staff_lacks_admin_only_permissions() {
        let map = PermissionMap::new();
        let staff = roles(&[Role::Staff]);

        assert!(!map.has_all_permissions(&staff, &[Permission::ConfigureSystem]));
        assert!(!map.has_all_permissions(&staff, &[Permission::ManageUsers]));
    }

    #[test]
    fn admin_covers_every_permission() {
        let map = PermissionMap::new();
        let admin = roles(&[Role::Admin]);

        assert!(map.has_all_permissions(&admin, &Permission::ALL));
    }

    #[test]
    fn permissions_union_across_roles() {
        let map = PermissionMap::new();
        let both = roles(&[Role::Attendee, Role::Staff]);

        let held = map.permissions_for(&both);
        assert_eq!(
            held,
            BTreeSet::from([Permission::ViewAttendees, Permission::CheckInAttendees])
        );
    }

    #[test]
    fn has_any_permission_matches_partial_overlap() {
        let map = PermissionMap::new();
        let staff = roles(&[Role::Staff]);

        assert!(map.has_any_permission(
            &staff,
            &[Permission::ConfigureSystem, Permission::ViewAttendees]
        ));
        assert!(!map.has_any_permission(
            &staff,
            &[Permission::ConfigureSystem, Permission::ManageUsers]
        ));
    }

    #[test]
    fn has_role_is_an_any_of_match() {
        let organizer = roles(&[Role::Organizer]);

        assert!(has_role(&organizer, &[Role::Admin, Role::Organizer]));
        assert!(!has_role(&organizer, &[Role::Admin, Role::Staff]));
        assert!(!has_role(&organizer, &[]));
    }

    #[test]
    fn attendee_has_no_permissions() {
        let map = PermissionMap::new();
        let attendee = roles(&[Role::Attendee]);

        assert!(map.permissions_for(&attendee).is_empty());
    }
}
