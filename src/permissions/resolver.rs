/*!
 * Permission Resolver
 * Central query answering "may this actor do that" for every workflow action
 */

use super::policy::{ActionPolicy, ActionRule};
use super::types::{Actor, CapabilityKind};
use crate::core::errors::{WithdrawalError, WithdrawalResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Which route granted an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "route")]
pub enum Grant {
    Administrator,
    Capability {
        role: String,
        module: String,
        kind: CapabilityKind,
    },
    Role {
        role: String,
    },
}

/// Permission checking interface consumed by the workflow
///
/// Implementations never fail: any lookup miss is a plain `false`.
pub trait PermissionChecker: Send + Sync {
    /// Actor holds `kind` on `module` through an active role, or is an administrator
    fn has_capability(&self, actor: &Actor, module: &str, kind: CapabilityKind) -> bool;

    /// Actor may perform the named action
    fn has_action(&self, actor: &Actor, action: &str) -> bool;

    /// True if any active role of the actor is on the action's allowlist
    ///
    /// Ignores the capability route and the administrator flag; used where the
    /// allowlist extends another check (cancellation by ownership).
    fn role_allowed(&self, actor: &Actor, action: &str) -> bool;

    /// Boundary helper turning a denied action into an authorization error
    fn require_action(&self, actor: &Actor, action: &str) -> WithdrawalResult<()> {
        if self.has_action(actor, action) {
            Ok(())
        } else {
            Err(WithdrawalError::unauthorized(actor.id, action))
        }
    }
}

/// Resolver backed by a declarative action table
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    policy: Arc<ActionPolicy>,
}

impl PermissionResolver {
    pub fn new(policy: ActionPolicy) -> Self {
        debug!(actions = policy.len(), "Permission resolver initialized");
        Self {
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &ActionPolicy {
        &self.policy
    }

    /// Resolve an action and report the granting route
    pub fn explain(&self, actor: &Actor, action: &str) -> Option<Grant> {
        if actor.is_administrator {
            return Some(Grant::Administrator);
        }

        let Some(rule) = self.policy.rule(action) else {
            debug!(actor = %actor.id, action, "Unknown action");
            return None;
        };

        Self::grant_by_capability(actor, rule).or_else(|| Self::grant_by_role(actor, rule))
    }

    fn grant_by_capability(actor: &Actor, rule: &ActionRule) -> Option<Grant> {
        let requirement = rule.capability.as_ref()?;
        actor
            .active_roles()
            .find(|role| {
                role.permissions
                    .iter()
                    .any(|perm| perm.grants(&requirement.module, requirement.kind))
            })
            .map(|role| Grant::Capability {
                role: role.name.clone(),
                module: requirement.module.clone(),
                kind: requirement.kind,
            })
    }

    fn grant_by_role(actor: &Actor, rule: &ActionRule) -> Option<Grant> {
        actor
            .active_roles()
            .find(|role| rule.roles.iter().any(|name| role.is_named(name)))
            .map(|role| Grant::Role {
                role: role.name.clone(),
            })
    }
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::new(ActionPolicy::default())
    }
}

impl PermissionChecker for PermissionResolver {
    fn has_capability(&self, actor: &Actor, module: &str, kind: CapabilityKind) -> bool {
        if actor.is_administrator {
            return true;
        }
        actor
            .active_roles()
            .flat_map(|role| role.permissions.iter())
            .any(|perm| perm.grants(module, kind))
    }

    fn role_allowed(&self, actor: &Actor, action: &str) -> bool {
        self.policy
            .rule(action)
            .map(|rule| Self::grant_by_role(actor, rule).is_some())
            .unwrap_or(false)
    }

    fn has_action(&self, actor: &Actor, action: &str) -> bool {
        match self.explain(actor, action) {
            Some(grant) => {
                debug!(actor = %actor.id, action, ?grant, "Action granted");
                true
            }
            None => {
                debug!(actor = %actor.id, action, "Action denied");
                false
            }
        }
    }
}
