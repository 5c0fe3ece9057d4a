/*!
 * Workflow
 *
 * Facade wiring one store, catalog, resolver and clock into the individual
 * and mass lifecycles plus the shared decision recorder. All handles share
 * the same rows, so a request id from one lifecycle is `NotFound` in the
 * other but its decision is visible through `recorder()`.
 */

use super::lifecycle::RequestLifecycle;
use super::subject::{Individual, Mass};
use super::workflow_builder::WorkflowBuilder;
use crate::audit::AuditLog;
use crate::authorization::AuthorizationRecorder;
use crate::catalog::Catalog;
use crate::core::clock::Clock;
use crate::permissions::PermissionChecker;
use crate::storage::{Store, StoreStats};
use std::sync::Arc;

pub type IndividualLifecycle = RequestLifecycle<Individual>;
pub type MassLifecycle = RequestLifecycle<Mass>;

/// Assembled withdrawal workflow
#[derive(Clone)]
pub struct Workflow {
    store: Store,
    permissions: Arc<dyn PermissionChecker>,
    individual: IndividualLifecycle,
    mass: MassLifecycle,
    audit_log: Option<Arc<AuditLog>>,
}

impl Workflow {
    pub fn builder(catalog: Arc<dyn Catalog>) -> WorkflowBuilder {
        WorkflowBuilder::new(catalog)
    }

    pub(super) fn assemble(
        store: Store,
        catalog: Arc<dyn Catalog>,
        permissions: Arc<dyn PermissionChecker>,
        clock: Arc<dyn Clock>,
        audit_log: Option<Arc<AuditLog>>,
    ) -> Self {
        let individual = RequestLifecycle::new(
            store.clone(),
            Arc::clone(&catalog),
            Arc::clone(&permissions),
            Arc::clone(&clock),
        );
        let mass = RequestLifecycle::new(store.clone(), catalog, Arc::clone(&permissions), clock);
        Self {
            store,
            permissions,
            individual,
            mass,
            audit_log,
        }
    }

    pub fn individual(&self) -> &IndividualLifecycle {
        &self.individual
    }

    pub fn mass(&self) -> &MassLifecycle {
        &self.mass
    }

    pub fn recorder(&self) -> &AuthorizationRecorder {
        self.individual.recorder()
    }

    pub fn permissions(&self) -> &dyn PermissionChecker {
        self.permissions.as_ref()
    }

    /// Built-in audit log; `None` when an external sink was supplied
    pub fn audit_log(&self) -> Option<&AuditLog> {
        self.audit_log.as_deref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }
}
