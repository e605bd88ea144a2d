//! # Rollover
//!
//! Log rotation with compression and age-based retention.
//!
//! Rollover rotates live log files into archive slots when a size or time
//! threshold is crossed, compresses the archives, and deletes archives
//! that outlive a retention age. It operates purely on already-closed or
//! independently-flushed files on a filesystem; there is no coordination
//! with writer processes beyond the atomicity of `rename`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rollover::prelude::*;
//!
//! let policy = RotationPolicy::builder()
//!     .max_size_bytes(50_000_000)
//!     .compression(Compression::Gzip)
//!     .retention_age(std::time::Duration::from_secs(30 * 86_400))
//!     .naming(NamingScheme::Shifting { max_kept: 5 })
//!     .build()?;
//!
//! let rotator = Rotator::new(policy)?;
//! let results = rotator.run(&[PathBuf::from("/var/log/app.log")])?;
//! println!("{}", RunSummary::from_results(&results));
//! ```
//!
//! ## Structure
//!
//! - `rollover-core`: data model, policy, errors
//! - `rollover-engine`: evaluate / rotate / compress / sweep / pipeline
//! - this crate: the [`Rotator`] facade, stamping the clock once per batch
//!
//! Every engine function takes the current time as a parameter; only the
//! facade's convenience entry points read `Utc::now()`, so everything
//! below them is deterministic and testable without wall-clock mocking.

#![warn(missing_docs)]

mod rotator;

pub mod prelude;

// Re-export the main entry point
pub use rotator::Rotator;

// Re-export the core model
pub use rollover_core::{
    ArchiveEntry, Compression, Error, ErrorKind, LogFile, NamingScheme, PolicyBuilder, Result,
    RotationAction, RotationPolicy, RotationResult, RunSummary, Schedule,
};

// Re-export the engine stages for callers that drive them directly
pub use rollover_engine::{is_expired, should_rotate};
