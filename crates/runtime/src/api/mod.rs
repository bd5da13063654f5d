//! Public API surface for runtime consumers.
//!
//! Re-exports the handle and error types that hosts use to drive the
//! plugin without touching worker internals.
mod errors;
mod handle;

pub use errors::{Component, Result, RuntimeError};
pub use handle::CompassHandle;
