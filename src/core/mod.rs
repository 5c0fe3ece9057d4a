/*!
 * Core Module
 * Identifiers, time source, and error taxonomy shared by every component
 */

pub mod clock;
pub mod errors;
pub mod id;

// Re-export for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::*;
pub use id::*;
