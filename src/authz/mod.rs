//! Role-based authorization.
//!
//! Roles are a small closed enumeration; each role carries an explicit list
//! of permissions (no rank inheritance). The [`PermissionMap`] is built once
//! at process start and is immutable afterwards. Request guards evaluate an
//! ordered chain of pure predicate checks over plain `(principal,
//! requirements)` data, with no handler metadata or middleware inheritance.

pub mod engine;
pub mod permission;
pub mod requirements;
pub mod role;

pub use engine::{has_role, PermissionMap};
pub use permission::{Permission, PermissionGroup, PERMISSION_GROUPS};
pub use requirements::{authorize, Denial, RouteRequirements};
pub use role::Role;
