//! lt-core: shared foundation for looptrace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - version (library release constant)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod version;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use version::LIBRARY_VERSION;
