//! The `Rotator` facade: a validated policy plus run entry points.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;

use rollover_core::{Result, RotationPolicy, RotationResult};
use rollover_engine::pipeline;

/// A rotation engine bound to a validated policy.
///
/// Construction runs the pre-flight policy validation, so a policy that
/// can never trigger surfaces as an error before any file is processed.
///
/// The batch entry points never fail once construction succeeded: every
/// per-file outcome, including errors, is a [`RotationResult`] in the
/// returned list.
#[derive(Debug, Clone)]
pub struct Rotator {
    policy: RotationPolicy,
}

impl Rotator {
    /// Bind a policy, validating it up front.
    pub fn new(policy: RotationPolicy) -> Result<Self> {
        policy.validate()?;
        debug!(?policy, "rotator configured");
        Ok(Rotator { policy })
    }

    /// The bound policy.
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Run the pipeline over `paths`, stamping the clock once for the
    /// whole batch.
    pub fn run(&self, paths: &[PathBuf]) -> Result<Vec<RotationResult>> {
        self.run_at(paths, Utc::now())
    }

    /// Run the pipeline against an injected clock. Results are in input
    /// order.
    pub fn run_at(&self, paths: &[PathBuf], now: DateTime<Utc>) -> Result<Vec<RotationResult>> {
        pipeline::run_at(paths, &self.policy, now)
    }

    /// Run with a worker pool; results are unordered across paths, while
    /// each path's own rotate → compress → sweep sequence stays
    /// sequential.
    ///
    /// `paths` must not contain two entries from the same basename family.
    pub fn run_unordered(&self, paths: &[PathBuf], threads: usize) -> Result<Vec<RotationResult>> {
        pipeline::run_unordered_at(paths, &self.policy, Utc::now(), threads)
    }
}
