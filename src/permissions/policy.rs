/*!
 * Action Policy
 * Declarative mapping from workflow action names to the grants that allow them
 *
 * Each action resolves through a capability route (module + CRUD kind) and/or
 * an explicit role allowlist. The capability route is consulted first; the
 * allowlist is the fallback. Both the individual and the mass flows read the
 * same table.
 */

use super::types::{CapabilityKind, MODULE_REASONS, MODULE_WITHDRAWALS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known action names
pub mod actions {
    pub const CREATE_WITHDRAWAL: &str = "create_withdrawal";
    pub const DERIVE_WITHDRAWAL: &str = "derive_withdrawal";
    pub const DECIDE_WITHDRAWAL: &str = "decide_withdrawal";
    pub const CANCEL_WITHDRAWAL: &str = "cancel_withdrawal";
    pub const VIEW_WITHDRAWAL: &str = "view_withdrawal";
    pub const REGISTER_DEPARTURE: &str = "register_departure";
    pub const MANAGE_REASONS: &str = "manage_reasons";
}

/// Well-known role names used by the default table
pub mod roles {
    pub const RECEPTION: &str = "reception";
    pub const TEACHER: &str = "teacher";
    pub const GUARDIAN_PROXY: &str = "guardian_proxy";
    pub const SUPERVISOR: &str = "supervisor";
}

/// Capability route of an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRequirement {
    pub module: String,
    pub kind: CapabilityKind,
}

/// How one action is granted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<CapabilityRequirement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl ActionRule {
    pub fn capability(module: impl Into<String>, kind: CapabilityKind) -> Self {
        Self {
            capability: Some(CapabilityRequirement {
                module: module.into(),
                kind,
            }),
            roles: Vec::new(),
        }
    }

    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            capability: None,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn or_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// True if the role name is on the allowlist
    pub fn allows_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(name))
    }
}

/// Action table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPolicy {
    #[serde(default)]
    pub actions: BTreeMap<String, ActionRule>,
}

impl ActionPolicy {
    /// Empty table; every non-administrator check fails
    pub fn empty() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// Add or replace the rule for an action
    #[must_use]
    pub fn with_rule(mut self, action: impl Into<String>, rule: ActionRule) -> Self {
        self.actions.insert(action.into(), rule);
        self
    }

    pub fn set_rule(&mut self, action: impl Into<String>, rule: ActionRule) {
        self.actions.insert(action.into(), rule);
    }

    #[inline]
    pub fn rule(&self, action: &str) -> Option<&ActionRule> {
        self.actions.get(action)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionPolicy {
    fn default() -> Self {
        use actions::*;
        use roles::*;

        Self::empty()
            .with_rule(
                CREATE_WITHDRAWAL,
                ActionRule::capability(MODULE_WITHDRAWALS, CapabilityKind::Create)
                    .or_roles([RECEPTION, TEACHER, GUARDIAN_PROXY]),
            )
            .with_rule(
                DERIVE_WITHDRAWAL,
                ActionRule::capability(MODULE_WITHDRAWALS, CapabilityKind::Update)
                    .or_roles([RECEPTION]),
            )
            .with_rule(DECIDE_WITHDRAWAL, ActionRule::roles([SUPERVISOR]))
            // Ownership decides cancellation; roles listed here may cancel on top of it
            .with_rule(CANCEL_WITHDRAWAL, ActionRule::default())
            .with_rule(
                VIEW_WITHDRAWAL,
                ActionRule::capability(MODULE_WITHDRAWALS, CapabilityKind::Read),
            )
            .with_rule(
                REGISTER_DEPARTURE,
                ActionRule::capability(MODULE_WITHDRAWALS, CapabilityKind::Update)
                    .or_roles([RECEPTION]),
            )
            .with_rule(
                MANAGE_REASONS,
                ActionRule::capability(MODULE_REASONS, CapabilityKind::Update),
            )
    }
}
