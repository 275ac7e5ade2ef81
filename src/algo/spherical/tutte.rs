//! Tutte map: gradient descent on the uniform Dirichlet energy.

use crate::algo::Progress;
use crate::error::{MeshError, Result};

use super::context::SphereContext;
use super::energy::EnergyMode;
use super::{
    record_iteration, MapReport, Stage, DEFAULT_ENERGY_THRESHOLD, DEFAULT_STEP_SIZE,
    PREVIOUS_ENERGY_SENTINEL,
};

/// Options for [`tutte_map`].
#[derive(Debug, Clone, PartialEq)]
pub struct TutteOptions {
    /// Step size of each gradient step.
    pub step_size: f64,

    /// Iteration stops once `previous - current` energy is at most this.
    pub energy_threshold: f64,

    /// Iteration ceiling. Reaching it ends the run with `converged == false`.
    pub max_iterations: usize,

    /// Re-center on the area-weighted center of mass every this many
    /// iterations. `None` never re-centers.
    pub recenter_interval: Option<usize>,
}

impl Default for TutteOptions {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            energy_threshold: DEFAULT_ENERGY_THRESHOLD,
            max_iterations: 1_000_000,
            recenter_interval: None,
        }
    }
}

impl TutteOptions {
    /// Set the step size.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Set the stopping threshold.
    pub fn with_energy_threshold(mut self, energy_threshold: f64) -> Self {
        self.energy_threshold = energy_threshold;
        self
    }

    /// Set the iteration ceiling.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Re-center every `interval` iterations.
    pub fn with_recenter_interval(mut self, interval: usize) -> Self {
        self.recenter_interval = Some(interval);
        self
    }

    /// Check that every option is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.step_size > 0.0 && self.step_size.is_finite()) {
            return Err(MeshError::invalid_param("step_size", self.step_size, "must be positive"));
        }
        if !(self.energy_threshold >= 0.0 && self.energy_threshold.is_finite()) {
            return Err(MeshError::invalid_param(
                "energy_threshold",
                self.energy_threshold,
                "must be non-negative",
            ));
        }
        if self.recenter_interval == Some(0) {
            return Err(MeshError::invalid_param("recenter_interval", 0, "must be at least 1"));
        }
        Ok(())
    }
}

/// Run the Tutte map on an embedding that is already on the unit sphere.
///
/// Each iteration computes the uniform-weight tangential gradient, steps
/// against it with `options.step_size` and re-normalizes every vertex. The
/// loop runs while the energy decrease of the last iteration exceeds
/// `options.energy_threshold`; the first test compares against a fixed
/// previous energy of 1000. An energy increase therefore also stops it.
///
/// # Errors
/// [`MeshError::InvalidParameter`] for bad options, or a re-centering error.
pub fn tutte_map(ctx: &mut SphereContext, options: &TutteOptions, progress: &Progress) -> Result<MapReport> {
    options.validate()?;

    let mode = EnergyMode::Uniform;
    let mut current = ctx.energy(mode);
    let mut previous = PREVIOUS_ENERGY_SENTINEL;
    let mut energies = vec![current];
    let mut iteration = 0;

    log::debug!("Tutte map starting at energy {:.9}", current);

    let converged = loop {
        if !(previous - current > options.energy_threshold) {
            break true;
        }
        if iteration >= options.max_iterations {
            break false;
        }

        ctx.compute_gradients(mode);
        ctx.apply_gradient_step(options.step_size);
        if let Some(interval) = options.recenter_interval {
            if (iteration + 1) % interval == 0 {
                ctx.recenter_by_area()?;
            }
        }

        previous = current;
        current = ctx.energy(mode);
        record_iteration(Stage::Tutte, iteration, previous, current, &mut energies, progress);
        iteration += 1;
    };

    if converged {
        log::info!("Tutte map converged after {} iterations, energy {:.9}", iteration, current);
    } else {
        log::warn!(
            "Tutte map stopped at the {} iteration ceiling, energy {:.9}",
            options.max_iterations,
            current
        );
    }

    Ok(MapReport {
        stage: Stage::Tutte,
        iterations: iteration,
        energy: current,
        converged,
        energies,
    })
}
