//! Administration views over the authorization configuration.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::authz::{Permission, Role, RouteRequirements, PERMISSION_GROUPS};

use super::auth::require_authorized;

#[derive(ToSchema, Serialize, Debug)]
pub struct PermissionGroupView {
    pub name: &'static str,
    pub permissions: Vec<Permission>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct RoleGrantsView {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct PermissionCatalog {
    pub groups: Vec<PermissionGroupView>,
    pub roles: Vec<RoleGrantsView>,
}

/// Requirements for the catalog route, declared as plain data next to the
/// registration.
pub(crate) fn catalog_requirements() -> RouteRequirements {
    RouteRequirements::none()
        .roles([Role::Admin])
        .permissions([Permission::ConfigureSystem])
}

#[utoipa::path(
    get,
    path = "/v1/admin/permissions",
    responses(
        (status = 200, description = "Permission groups and role grants", body = PermissionCatalog),
        (status = 401, description = "Unauthorized", body = String),
        (status = 403, description = "Forbidden", body = String)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn list_permissions(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> impl IntoResponse {
    if let Err(rejection) = require_authorized(&headers, &state, &catalog_requirements()) {
        return rejection.into_response();
    }

    let groups = PERMISSION_GROUPS
        .iter()
        .map(|group| PermissionGroupView {
            name: group.name,
            permissions: group.permissions.to_vec(),
        })
        .collect();

    let roles = Role::ALL
        .iter()
        .map(|&role| RoleGrantsView {
            role,
            permissions: state
                .permissions
                .permissions_for(&std::collections::BTreeSet::from([role]))
                .into_iter()
                .collect(),
        })
        .collect();

    (StatusCode::OK, Json(PermissionCatalog { groups, roles })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_state::lazy_state;
    use anyhow::Result;

    #[test]
    fn catalog_requires_admin_role_and_configure_permission() {
        let requirements = catalog_requirements();
        assert_eq!(requirements.roles, vec![Role::Admin]);
        assert_eq!(requirements.permissions, vec![Permission::ConfigureSystem]);
    }

    #[tokio::test]
    async fn list_permissions_requires_auth() -> Result<()> {
        let response = list_permissions(HeaderMap::new(), Extension(lazy_state()?))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
