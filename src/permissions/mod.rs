/*!
 * Permissions Module
 * Centralized permission checking for the withdrawal workflow
 *
 * One declarative action table answers every "may this actor do that"
 * question for both request flows, replacing per-endpoint role comparisons.
 *
 * ## Usage
 * ```ignore
 * use student_withdrawal::permissions::{actions, PermissionChecker, PermissionResolver};
 *
 * let resolver = PermissionResolver::default();
 * if resolver.has_action(&actor, actions::DERIVE_WITHDRAWAL) {
 *     // hand the request to the supervisor
 * }
 * ```
 */

pub mod policy;
pub mod resolver;
pub mod types;

// Re-export commonly used items
pub use policy::{actions, roles, ActionPolicy, ActionRule, CapabilityRequirement};
pub use resolver::{Grant, PermissionChecker, PermissionResolver};
pub use types::{Actor, CapabilityKind, ModulePermission, Role, MODULE_REASONS, MODULE_WITHDRAWALS};
