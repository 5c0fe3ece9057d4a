/*!
 * Catalog Module
 * Student, guardian, and reason reference data
 */

pub mod memory;
pub mod traits;
pub mod types;

pub use memory::InMemoryCatalog;
pub use traits::Catalog;
pub use types::{Guardian, Severity, Student, WithdrawalReason};
