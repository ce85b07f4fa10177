//! The authenticated identity attached to a request.

use std::collections::BTreeSet;

use crate::auth::token::Claims;
use crate::authz::Role;

/// Built fresh from verified token claims on every request; never persisted.
///
/// Roles are a set even though the platform currently assigns exactly one
/// role per user: the authorization engine is written against the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub email: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    #[must_use]
    pub fn new(user_id: i64, email: String, role: Role) -> Self {
        Self {
            user_id,
            email,
            roles: BTreeSet::from([role]),
        }
    }

    #[must_use]
    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.email.clone(), claims.role)
    }

    /// The single persisted role. Kept for token issuance, which stores one
    /// role per token.
    #[must_use]
    pub fn primary_role(&self) -> Role {
        self.roles
            .iter()
            .next()
            .copied()
            .unwrap_or(Role::Attendee)
    }
}
