//! Convenience re-exports for typical usage.
//!
//! ```ignore
//! use rollover::prelude::*;
//! ```

pub use std::path::PathBuf;

pub use crate::{
    Compression, Error, ErrorKind, NamingScheme, Result, RotationAction, RotationPolicy,
    RotationResult, Rotator, RunSummary, Schedule,
};
