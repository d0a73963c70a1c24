//! Public SDK surface for Slidecraft.
//!
//! This crate re-exports the building blocks so consumers can depend on a
//! single crate, and provides a small initialization helper to keep setup
//! consistent across binaries.

/// Re-export for convenience.
pub use slidecraft_config as config;
pub use slidecraft_core as core;
/// Re-export for convenience.
pub use slidecraft_protocol as protocol;
/// Re-export for convenience.
pub use slidecraft_render as render;

/// Initialize logging using env_logger.
///
/// Safe to call more than once; later calls are no-ops.
#[inline]
pub fn init_logging() {
    let _ = env_logger::try_init();
}
