/*!
 * Workflow Builder
 * Builder pattern for Workflow construction
 */

use super::workflow::Workflow;
use crate::audit::{AuditLog, AuditSink};
use crate::catalog::Catalog;
use crate::config::WithdrawalConfig;
use crate::core::clock::{Clock, SystemClock};
use crate::permissions::{ActionPolicy, PermissionChecker, PermissionResolver};
use crate::storage::Store;
use std::sync::Arc;
use tracing::info;

/// Builder for Workflow
pub struct WorkflowBuilder {
    catalog: Arc<dyn Catalog>,
    policy: Option<ActionPolicy>,
    permissions: Option<Arc<dyn PermissionChecker>>,
    audit: Option<Arc<dyn AuditSink>>,
    clock: Option<Arc<dyn Clock>>,
}

impl WorkflowBuilder {
    /// Start from the catalog every lifecycle validates against
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            policy: None,
            permissions: None,
            audit: None,
            clock: None,
        }
    }

    /// Resolve permissions against this action table
    pub fn with_policy(mut self, policy: ActionPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Replace the resolver entirely; takes precedence over `with_policy`
    pub fn with_permissions(mut self, permissions: Arc<dyn PermissionChecker>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Send audit entries to an external sink instead of a fresh AuditLog
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Apply the policy from a loaded config
    pub fn with_config(self, config: &WithdrawalConfig) -> Self {
        self.with_policy(config.policy.clone())
    }

    /// Build the Workflow
    pub fn build(self) -> Workflow {
        let mut features = Vec::new();

        let permissions = match self.permissions {
            Some(permissions) => {
                features.push("custom-permissions");
                permissions
            }
            None => {
                if self.policy.is_some() {
                    features.push("custom-policy");
                }
                let resolver = PermissionResolver::new(self.policy.unwrap_or_default());
                Arc::new(resolver) as Arc<dyn PermissionChecker>
            }
        };

        let (audit_log, sink) = match self.audit {
            Some(sink) => {
                features.push("external-audit");
                (None, sink)
            }
            None => {
                let log = Arc::new(AuditLog::new());
                (Some(Arc::clone(&log)), log as Arc<dyn AuditSink>)
            }
        };

        let clock = match self.clock {
            Some(clock) => {
                features.push("custom-clock");
                clock
            }
            None => Arc::new(SystemClock) as Arc<dyn Clock>,
        };

        if features.is_empty() {
            features.push("defaults");
        }
        info!("Withdrawal workflow initialized with: {}", features.join(", "));

        Workflow::assemble(
            Store::new(sink),
            self.catalog,
            permissions,
            clock,
            audit_log,
        )
    }
}
