//! Rotation engine: decision, execution, compression, and retention.
//!
//! The engine is organized as one module per pipeline stage:
//! - [`evaluate`]: pure rotation/expiry decisions against an injected clock
//! - [`naming`]: archive naming conventions and sibling discovery
//! - [`rotate`]: the atomic rename-and-recreate sequence
//! - [`compress`]: verify-before-delete archive compression
//! - [`sweep`]: best-effort age-based retention
//! - [`pipeline`]: per-path orchestration over a batch
//!
//! All functions take the current time as a parameter; nothing in this
//! crate reads the wall clock. Callers that want convenience entry points
//! stamped with `Utc::now()` should use the `rollover` facade crate.

pub mod compress;
pub mod evaluate;
pub mod naming;
pub mod pipeline;
pub mod rotate;
pub mod sweep;

pub use compress::compress;
pub use evaluate::{is_expired, should_rotate};
pub use naming::{ArchiveSibling, ArchiveSuffix};
pub use pipeline::{run_at, run_unordered_at};
pub use rotate::rotate;
pub use sweep::sweep;
