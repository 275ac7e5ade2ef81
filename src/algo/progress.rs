//! Progress reporting for long-running algorithms.
//!
//! The mapping drivers iterate until an energy criterion holds, so there is no
//! known total to report against. Instead they hand an [`IterationUpdate`] to a
//! caller-supplied callback on a sparse, stage-dependent schedule (see
//! [`Stage::should_report`]).
//!
//! # Example
//!
//! ```
//! use spheremap::algo::Progress;
//!
//! let progress = Progress::new(|update| {
//!     println!(
//!         "[{}] iteration {}: energy {:.6} (decrease {:.3e})",
//!         update.stage, update.iteration, update.energy, update.energy_delta
//!     );
//! });
//! ```

use super::spherical::Stage;

/// A snapshot of a driver's state after one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationUpdate {
    /// The map being computed.
    pub stage: Stage,
    /// Zero-based iteration counter.
    pub iteration: usize,
    /// Energy after this iteration.
    pub energy: f64,
    /// Previous energy minus current energy. Positive when the energy dropped.
    pub energy_delta: f64,
}

/// A progress callback that receives updates during long-running operations.
pub struct Progress {
    callback: Box<dyn Fn(&IterationUpdate) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&IterationUpdate) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, update: &IterationUpdate) {
        (self.callback)(update);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
