/*!
 * Authorization Module
 * Supervisor decisions: one write-once row per request
 */

pub mod recorder;
pub mod types;

pub use recorder::{check_justification, AuthorizationRecorder};
pub use types::{AuthorizationDecision, Verdict};
