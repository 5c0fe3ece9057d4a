/*!
 * Audit Module
 * Append-only sink fed by every committed workflow transition
 */

pub mod log;
pub mod types;

pub use log::{AuditLog, AuditSink, AuditStats};
pub use types::AuditEntry;
