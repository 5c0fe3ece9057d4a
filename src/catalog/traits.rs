/*!
 * Catalog Traits
 * Read-only lookups into the student, guardian, and reason stores
 */

use super::types::WithdrawalReason;
use crate::core::id::{GuardianId, ReasonId, StudentId};

/// Catalog lookup interface
///
/// The workflow checks existence and the reason's active flag, nothing else.
pub trait Catalog: Send + Sync {
    fn student_exists(&self, id: StudentId) -> bool;

    fn guardian_exists(&self, id: GuardianId) -> bool;

    /// Reason by id, including inactive ones
    fn reason(&self, id: ReasonId) -> Option<WithdrawalReason>;
}
