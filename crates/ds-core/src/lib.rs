//! ds-core: stable foundation for the dual-reservoir plant simulator.
//!
//! Contains:
//! - time (scaled simulation time + the `NEVER` sentinel)
//! - numeric (Real, finite checks, guarded division)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod time;

// Re-exports: nice ergonomics for downstream crates
pub use error::{DsError, DsResult};
pub use numeric::*;
pub use time::*;
