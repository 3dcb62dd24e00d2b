//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the service and worker layers can stay focused on orchestration.

pub mod errors;
pub mod handle;

pub use errors::{Result, ServiceError};
pub use handle::RuntimeHandle;
