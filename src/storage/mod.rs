/*!
 * Storage Module
 * Transactional in-memory store backing the workflow
 */

pub mod store;
pub mod transaction;

pub use store::{Store, StoreStats, Tables};
pub use transaction::{StagedWrite, Transaction, TransactionState};
