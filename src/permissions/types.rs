/*!
 * Permission Types
 * Actor, role, and capability model supplied by the identity provider
 */

use crate::core::id::ActorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional module guarding withdrawal requests (individual and mass)
pub const MODULE_WITHDRAWALS: &str = "withdrawals";

/// Functional module guarding the reason catalog
pub const MODULE_REASONS: &str = "reasons";

/// Generic CRUD grant kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Read,
    Create,
    Update,
    Delete,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CapabilityKind::Read => "read",
            CapabilityKind::Create => "create",
            CapabilityKind::Update => "update",
            CapabilityKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// One capability on one module, held through a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePermission {
    pub module: String,
    pub capability: CapabilityKind,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl ModulePermission {
    pub fn new(module: impl Into<String>, capability: CapabilityKind) -> Self {
        Self {
            module: module.into(),
            capability,
            enabled: true,
        }
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    #[inline]
    pub fn grants(&self, module: &str, capability: CapabilityKind) -> bool {
        self.enabled && self.capability == capability && self.module == module
    }
}

/// Named role with its module permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub active: bool,
    #[serde(default)]
    pub permissions: Vec<ModulePermission>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            permissions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_permission(mut self, module: impl Into<String>, capability: CapabilityKind) -> Self {
        self.permissions.push(ModulePermission::new(module, capability));
        self
    }

    #[must_use]
    pub fn with(mut self, permission: ModulePermission) -> Self {
        self.permissions.push(permission);
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Case-insensitive role name match
    #[inline]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Authenticated actor as handed over by the session layer
///
/// The workflow never authenticates; it only reads the roles loaded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub is_administrator: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Actor {
    pub fn new(id: impl Into<ActorId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            is_administrator: false,
            roles: Vec::new(),
        }
    }

    pub fn administrator(id: impl Into<ActorId>, display_name: impl Into<String>) -> Self {
        Self {
            is_administrator: true,
            ..Self::new(id, display_name)
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    /// Roles that currently count for permission checks
    pub fn active_roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter().filter(|role| role.active)
    }
}
