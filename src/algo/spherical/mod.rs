//! Spherical parameterization of closed genus-0 meshes.
//!
//! A mesh is mapped onto the unit sphere in three stages:
//!
//! 1. **Star map**: every vertex is projected radially from the vertex
//!    centroid. The projected directions become the vertex normals used by
//!    all later gradient projections.
//! 2. **Tutte map**: explicit gradient descent on the uniform Dirichlet energy
//!    ([`tutte_map`]).
//! 3. **Harmonic map**: nonlinear conjugate gradient with a doubling line
//!    search on the cotangent-weighted Dirichlet energy ([`harmonic_map`]).
//!
//! Cotangent weights are computed once from the input embedding, before the
//! star map. After every step each vertex is re-normalized onto the sphere.
//!
//! # Example
//!
//! ```
//! use spheremap::algo::spherical::{spherical_parameterization, SphericalOptions};
//! use spheremap::algo::Progress;
//! use spheremap::mesh::primitives;
//!
//! let mesh = primitives::cube().unwrap();
//! let (sphere, report) = spherical_parameterization(
//!     mesh,
//!     &SphericalOptions::default(),
//!     &Progress::none(),
//!     |_, _| Ok(()),
//! )
//! .unwrap();
//!
//! assert!(report.tutte.converged);
//! for v in sphere.vertex_ids() {
//!     assert!((sphere.position(v).coords.norm() - 1.0).abs() < 1e-9);
//! }
//! ```

mod context;
mod energy;
mod fields;
mod gradient;
mod harmonic;
mod tutte;
mod update;
mod weights;

use std::fmt;

pub use context::SphereContext;
pub use energy::{dirichlet_energy, EnergyMode};
pub use fields::VertexFields;
pub use gradient::compute_tangential_gradients;
pub use harmonic::{conjugate_gradient_step, harmonic_map, line_search, HarmonicOptions};
pub use tutte::{tutte_map, TutteOptions};
pub use update::{apply_gradient_step, displace_along_search, project_to_unit_sphere, recenter_by_area};
pub use weights::{cotangent_weights, face_normals, EdgeWeights};

use crate::error::{MeshError, Result};
use crate::mesh::HalfEdgeMesh;

use super::{IterationUpdate, Progress};

/// Default step size of the plain gradient steps.
pub const DEFAULT_STEP_SIZE: f64 = 1e-2;

/// Default energy decrease below which a driver stops.
pub const DEFAULT_ENERGY_THRESHOLD: f64 = 1e-5;

/// Stand-in for the previous energy before the first iteration.
pub(crate) const PREVIOUS_ENERGY_SENTINEL: f64 = 1000.0;

/// The stages of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Central projection from the vertex centroid.
    Star,
    /// Uniform-weight gradient descent.
    Tutte,
    /// Cotangent-weight conjugate gradient.
    Harmonic,
}

impl Stage {
    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Star => "star",
            Stage::Tutte => "Tutte",
            Stage::Harmonic => "harmonic",
        }
    }

    /// Suffix appended to the output prefix for this stage's checkpoint file.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Stage::Star => "Star",
            Stage::Tutte => "Tuette",
            Stage::Harmonic => "Harmonic",
        }
    }

    /// Whether a driver reports progress after `iteration`.
    ///
    /// Tutte reports every 100 iterations below 1000 and every 1000 after.
    /// Harmonic reports each of the first ten iterations and every 100 after.
    pub fn should_report(self, iteration: usize) -> bool {
        match self {
            Stage::Star => false,
            Stage::Tutte => (iteration % 100 == 0 && iteration < 1000) || iteration % 1000 == 0,
            Stage::Harmonic => iteration < 10 || iteration % 100 == 0,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one mapping driver.
#[derive(Debug, Clone, PartialEq)]
pub struct MapReport {
    /// The map that was computed.
    pub stage: Stage,
    /// Number of completed iterations.
    pub iterations: usize,
    /// Energy of the final embedding.
    pub energy: f64,
    /// Whether the stopping criterion was met before the iteration ceiling.
    pub converged: bool,
    /// Energy at the start followed by the energy after every step.
    pub energies: Vec<f64>,
}

impl MapReport {
    /// Energy before the first step.
    pub fn initial_energy(&self) -> f64 {
        self.energies.first().copied().unwrap_or(self.energy)
    }

    /// Turn a run that hit the iteration ceiling into an error.
    pub fn ensure_converged(&self) -> Result<()> {
        if self.converged {
            Ok(())
        } else {
            Err(MeshError::ConvergenceFailed {
                stage: self.stage.name(),
                iterations: self.iterations,
            })
        }
    }
}

/// Record the energy after an iteration and report it if the stage's cadence
/// calls for it.
pub(crate) fn record_iteration(
    stage: Stage,
    iteration: usize,
    previous: f64,
    current: f64,
    energies: &mut Vec<f64>,
    progress: &Progress,
) {
    energies.push(current);
    if stage.should_report(iteration) {
        let update = IterationUpdate {
            stage,
            iteration,
            energy: current,
            energy_delta: previous - current,
        };
        log::debug!("{} iteration {}: energy {:.9}", stage, iteration, current);
        progress.report(&update);
    }
}

/// Options for the full pipeline.
#[derive(Debug, Clone)]
pub struct SphericalOptions {
    /// Options of the Tutte stage.
    pub tutte: TutteOptions,
    /// Options of the harmonic stage.
    pub harmonic: HarmonicOptions,
    /// Whether to run the harmonic stage after the Tutte stage.
    pub run_harmonic: bool,
}

impl Default for SphericalOptions {
    fn default() -> Self {
        Self {
            tutte: TutteOptions::default(),
            harmonic: HarmonicOptions::default(),
            run_harmonic: true,
        }
    }
}

impl SphericalOptions {
    /// Set the Tutte stage options.
    pub fn with_tutte(mut self, tutte: TutteOptions) -> Self {
        self.tutte = tutte;
        self
    }

    /// Set the harmonic stage options.
    pub fn with_harmonic(mut self, harmonic: HarmonicOptions) -> Self {
        self.harmonic = harmonic;
        self
    }

    /// Stop after the Tutte stage.
    pub fn skip_harmonic(mut self) -> Self {
        self.run_harmonic = false;
        self
    }
}

/// Reports of the stages that ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizationReport {
    /// The Tutte stage.
    pub tutte: MapReport,
    /// The harmonic stage, unless skipped.
    pub harmonic: Option<MapReport>,
}

/// Run the star, Tutte, and harmonic stages on `mesh`.
///
/// `checkpoint` is called with the embedding after every stage; its error
/// aborts the run. Hitting an iteration ceiling is not an error: the stage is
/// reported with `converged == false` and the pipeline carries on.
///
/// # Errors
/// Fails on malformed input (see [`SphereContext::new`]), invalid options, a
/// degenerate embedding during projection or re-centering, or a checkpoint
/// error.
pub fn spherical_parameterization<F>(
    mesh: HalfEdgeMesh,
    options: &SphericalOptions,
    progress: &Progress,
    mut checkpoint: F,
) -> Result<(HalfEdgeMesh, ParameterizationReport)>
where
    F: FnMut(Stage, &HalfEdgeMesh) -> Result<()>,
{
    options.tutte.validate()?;
    if options.run_harmonic {
        options.harmonic.validate()?;
    }

    let mut ctx = SphereContext::new(mesh)?;

    ctx.project_to_unit_sphere()?;
    log::info!("star map done");
    checkpoint(Stage::Star, ctx.mesh())?;

    let tutte = tutte_map(&mut ctx, &options.tutte, progress)?;
    checkpoint(Stage::Tutte, ctx.mesh())?;

    let harmonic = if options.run_harmonic {
        let report = harmonic_map(&mut ctx, &options.harmonic, progress)?;
        checkpoint(Stage::Harmonic, ctx.mesh())?;
        Some(report)
    } else {
        None
    };

    Ok((ctx.into_mesh(), ParameterizationReport { tutte, harmonic }))
}
