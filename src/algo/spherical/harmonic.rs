//! Harmonic map: nonlinear conjugate gradient on the cotangent-weighted
//! Dirichlet energy.

use crate::algo::Progress;
use crate::error::{MeshError, Result};

use super::context::SphereContext;
use super::energy::{dirichlet_energy, EnergyMode};
use super::fields::VertexFields;
use super::update::{displace_along_search, snapshot_positions};
use super::{
    record_iteration, MapReport, Stage, DEFAULT_ENERGY_THRESHOLD, DEFAULT_STEP_SIZE,
    PREVIOUS_ENERGY_SENTINEL,
};

/// Options for [`harmonic_map`].
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicOptions {
    /// Step size of the plain gradient step that seeds the iteration.
    pub step_size: f64,

    /// Iteration stops once `previous - current` energy is at most this.
    pub energy_threshold: f64,

    /// Iteration ceiling. Reaching it ends the run with `converged == false`.
    pub max_iterations: usize,

    /// First trial step of the line search.
    pub initial_alpha: f64,

    /// Trial steps double while below this.
    pub max_alpha: f64,

    /// Compare each trial against the best energy found so far instead of the
    /// energy at the start of the line search.
    pub track_best_energy: bool,

    /// Re-center on the area-weighted center of mass every this many
    /// iterations. `None` never re-centers.
    pub recenter_interval: Option<usize>,
}

impl Default for HarmonicOptions {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            energy_threshold: DEFAULT_ENERGY_THRESHOLD,
            max_iterations: 100_000,
            initial_alpha: 1e-6,
            max_alpha: 1e-2,
            track_best_energy: false,
            recenter_interval: None,
        }
    }
}

impl HarmonicOptions {
    /// Set the seed step size.
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

    /// Set the line search range `[initial_alpha, max_alpha)`.
    pub fn with_alpha_range(mut self, initial_alpha: f64, max_alpha: f64) -> Self {
        self.initial_alpha = initial_alpha;
        self.max_alpha = max_alpha;
        self
    }

    /// Let each accepted trial lower the line search baseline.
    pub fn with_track_best_energy(mut self, track: bool) -> Self {
        self.track_best_energy = track;
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
        if !(self.initial_alpha > 0.0 && self.initial_alpha.is_finite()) {
            return Err(MeshError::invalid_param("initial_alpha", self.initial_alpha, "must be positive"));
        }
        if !(self.max_alpha > self.initial_alpha && self.max_alpha.is_finite()) {
            return Err(MeshError::invalid_param(
                "max_alpha",
                self.max_alpha,
                "must exceed initial_alpha",
            ));
        }
        if self.recenter_interval == Some(0) {
            return Err(MeshError::invalid_param("recenter_interval", 0, "must be at least 1"));
        }
        Ok(())
    }
}

/// Fletcher-Reeves update of every search direction:
/// `d ← d * |t|² / |t_prev|² - t`. A zero previous gradient gives `beta = 0`.
fn update_search_directions(fields: &mut VertexFields) {
    for i in 0..fields.len() {
        let t = fields.tangential_gradient[i];
        let denom = fields.previous_tangential_gradient[i].norm_squared();
        let beta = if denom > 0.0 { t.norm_squared() / denom } else { 0.0 };
        fields.beta[i] = beta;
        fields.search_direction[i] = fields.search_direction[i] * beta - t;
    }
}

/// Doubling line search along the current search directions.
///
/// Trial steps `alpha = initial_alpha, 2 * initial_alpha, ...` below
/// `max_alpha` are applied cumulatively, each followed by re-normalization.
/// A trial whose energy is below the baseline is remembered; the baseline is
/// the starting energy unless `track_best_energy` is set. The mesh ends at
/// the last remembered configuration, or where it started if no trial
/// improved.
///
/// Returns the energy of the final configuration.
pub fn line_search(ctx: &mut SphereContext, options: &HarmonicOptions) -> f64 {
    let mode = EnergyMode::Cotangent;
    let SphereContext {
        mesh, weights, fields, ..
    } = ctx;

    let mut baseline = dirichlet_energy(mesh, weights, mode);
    let mut accepted = baseline;
    snapshot_positions(mesh, &mut fields.best_position);

    let mut alpha = options.initial_alpha;
    while alpha < options.max_alpha {
        displace_along_search(mesh, fields, alpha);
        let energy = dirichlet_energy(mesh, weights, mode);
        if energy < baseline {
            snapshot_positions(mesh, &mut fields.best_position);
            accepted = energy;
            if options.track_best_energy {
                baseline = energy;
            }
        }
        alpha *= 2.0;
    }

    mesh.set_positions(&fields.best_position);
    accepted
}

/// One conjugate-gradient step from freshly computed tangential gradients:
/// update the search directions, line search along them, then remember the
/// tangential gradients for the next ratio.
///
/// Returns the energy after the step.
pub fn conjugate_gradient_step(ctx: &mut SphereContext, options: &HarmonicOptions) -> f64 {
    update_search_directions(&mut ctx.fields);
    let energy = line_search(ctx, options);
    let fields = &mut ctx.fields;
    fields.previous_tangential_gradient.clone_from(&fields.tangential_gradient);
    energy
}

/// Run the harmonic map on an embedding that is already on the unit sphere,
/// usually the output of the Tutte map.
///
/// A plain gradient step of `options.step_size` seeds the iteration; the
/// previous tangential gradients and the search directions both start as the
/// tangential gradients after it. Each iteration then recomputes the
/// gradients and takes a [`conjugate_gradient_step`]. The loop stops like
/// the Tutte map, on an energy decrease of at most `options.energy_threshold`.
///
/// # Errors
/// [`MeshError::InvalidParameter`] for bad options, or a re-centering error.
pub fn harmonic_map(
    ctx: &mut SphereContext,
    options: &HarmonicOptions,
    progress: &Progress,
) -> Result<MapReport> {
    options.validate()?;

    let mode = EnergyMode::Cotangent;
    let mut energies = vec![ctx.energy(mode)];

    ctx.compute_gradients(mode);
    ctx.apply_gradient_step(options.step_size);
    {
        let fields = &mut ctx.fields;
        fields.previous_tangential_gradient.clone_from(&fields.tangential_gradient);
        fields.search_direction.clone_from(&fields.tangential_gradient);
    }

    let mut previous = PREVIOUS_ENERGY_SENTINEL;
    let mut current = ctx.energy(mode);
    energies.push(current);
    let mut iteration = 0;

    log::debug!("harmonic map starting at energy {:.9}", current);

    let converged = loop {
        if !(previous - current > options.energy_threshold) {
            break true;
        }
        if iteration >= options.max_iterations {
            break false;
        }

        ctx.compute_gradients(mode);
        conjugate_gradient_step(ctx, options);
        if let Some(interval) = options.recenter_interval {
            if (iteration + 1) % interval == 0 {
                ctx.recenter_by_area()?;
            }
        }

        previous = current;
        current = ctx.energy(mode);
        record_iteration(Stage::Harmonic, iteration, previous, current, &mut energies, progress);
        iteration += 1;
    };

    if converged {
        log::info!("harmonic map converged after {} iterations, energy {:.9}", iteration, current);
    } else {
        log::warn!(
            "harmonic map stopped at the {} iteration ceiling, energy {:.9}",
            options.max_iterations,
            current
        );
    }

    Ok(MapReport {
        stage: Stage::Harmonic,
        iterations: iteration,
        energy: current,
        converged,
        energies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::spherical::{tutte_map, TutteOptions};
    use crate::mesh::{build_from_triangles, primitives, to_face_vertex, HalfEdgeMesh, VertexId};
    use nalgebra::{Point3, Vector3};

    fn projected(mesh: HalfEdgeMesh) -> SphereContext {
        let mut ctx = SphereContext::new(mesh).unwrap();
        ctx.project_to_unit_sphere().unwrap();
        ctx
    }

    fn perturbed_cube() -> HalfEdgeMesh {
        let (mut vertices, faces) = to_face_vertex(&primitives::cube().unwrap());
        vertices[0].x -= 0.1;
        vertices[6].y += 0.05;
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_regular_octahedron_converges_immediately() {
        let mut ctx = projected(primitives::octahedron().unwrap());
        let before = ctx.mesh().positions();

        let report = harmonic_map(&mut ctx, &HarmonicOptions::default(), &Progress::none()).unwrap();

        assert!(report.converged);
        assert!(report.iterations <= 2);
        for (v, p) in ctx.mesh().vertex_ids().zip(before) {
            assert!((ctx.mesh().position(v) - p).norm() < 1e-9);
        }
    }

    #[test]
    fn test_energy_monotone_after_seed() {
        let mut ctx = projected(perturbed_cube());
        let options = HarmonicOptions::default().with_max_iterations(200);

        let report = harmonic_map(&mut ctx, &options, &Progress::none()).unwrap();

        assert_eq!(report.energies.len(), report.iterations + 2);
        for pair in report.energies[1..].windows(2) {
            assert!(pair[1] <= pair[0], "energy rose from {} to {}", pair[0], pair[1]);
        }
        for v in ctx.mesh().vertex_ids() {
            assert!((ctx.mesh().position(v).coords.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_previous_gradient_gives_zero_beta() {
        let mut fields = VertexFields::new(2);
        fields.tangential_gradient[0] = Vector3::new(1.0, 0.0, 0.0);
        fields.tangential_gradient[1] = Vector3::new(0.0, 2.0, 0.0);
        fields.previous_tangential_gradient[1] = Vector3::new(0.0, 1.0, 0.0);
        fields.search_direction[0] = Vector3::new(5.0, 5.0, 5.0);
        fields.search_direction[1] = Vector3::new(0.0, 1.0, 0.0);

        update_search_directions(&mut fields);

        assert_eq!(fields.beta[0], 0.0);
        assert_eq!(fields.search_direction[0], Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(fields.beta[1], 4.0);
        assert_eq!(fields.search_direction[1], Vector3::new(0.0, 2.0, 0.0));
        assert!(fields.search_direction.iter().all(|d| d.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_line_search_never_raises_energy() {
        let mut ctx = projected(perturbed_cube());
        ctx.compute_gradients(EnergyMode::Cotangent);
        let start = ctx.energy(EnergyMode::Cotangent);
        let before = ctx.mesh().positions();

        // Uphill direction: no trial can improve
        let uphill = ctx.fields.tangential_gradient.clone();
        ctx.fields.search_direction = uphill;
        let energy = line_search(&mut ctx, &HarmonicOptions::default());
        assert_eq!(energy, start);
        assert_eq!(ctx.mesh().positions(), before);

        // Downhill direction improves
        ctx.fields.search_direction = ctx.fields.tangential_gradient.iter().map(|t| -t).collect();
        let energy = line_search(&mut ctx, &HarmonicOptions::default());
        assert!(energy < start);
        assert_eq!(energy, ctx.energy(EnergyMode::Cotangent));
    }

    /// Vertex 0 moved to +x on a regular tetrahedron. Its energy term is
    /// lowest at -z, and the search path swings from +x toward (-1, 0, -1),
    /// so the later trials overshoot the minimum while staying below the start.
    fn overshooting_search() -> SphereContext {
        let mut ctx = projected(primitives::tetrahedron().unwrap());
        ctx.mesh.set_position(VertexId::new(0), Point3::new(1.0, 0.0, 0.0));
        ctx.fields.search_direction = vec![Vector3::zeros(); ctx.mesh.num_vertices()];
        ctx.fields.search_direction[0] = Vector3::new(-300.0, 0.0, -300.0);
        ctx
    }

    #[test]
    fn test_fixed_baseline_keeps_last_improving_trial() {
        let options = HarmonicOptions::default();
        assert!(!options.track_best_energy);

        let start_ctx = overshooting_search();
        let start = start_ctx.energy(EnergyMode::Cotangent);

        let mut replay = start_ctx.clone();
        let mut trials = Vec::new();
        let mut alpha = options.initial_alpha;
        while alpha < options.max_alpha {
            displace_along_search(&mut replay.mesh, &replay.fields, alpha);
            trials.push(replay.energy(EnergyMode::Cotangent));
            alpha *= 2.0;
        }
        let minimum = trials.iter().copied().fold(f64::INFINITY, f64::min);
        let last_improving = *trials.iter().rev().find(|&&e| e < start).unwrap();
        assert!(minimum < *trials.last().unwrap());

        let mut fixed = start_ctx.clone();
        let fixed_energy = line_search(&mut fixed, &options);
        assert_eq!(fixed_energy, last_improving);
        assert_eq!(fixed_energy, fixed.energy(EnergyMode::Cotangent));
        assert!(fixed_energy < start);

        let mut tracked = start_ctx.clone();
        let tracked_energy = line_search(&mut tracked, &options.with_track_best_energy(true));
        assert_eq!(tracked_energy, minimum);
        assert_eq!(tracked_energy, tracked.energy(EnergyMode::Cotangent));
        assert!(fixed_energy > tracked_energy);
    }

    #[test]
    fn test_after_tutte() {
        let mut ctx = projected(perturbed_cube());
        let tutte = tutte_map(&mut ctx, &TutteOptions::default().with_max_iterations(2000), &Progress::none()).unwrap();
        let report = harmonic_map(
            &mut ctx,
            &HarmonicOptions::default().with_max_iterations(2000),
            &Progress::none(),
        )
        .unwrap();

        assert_eq!(report.stage, Stage::Harmonic);
        assert!(tutte.iterations > 0);
        for v in ctx.mesh().vertex_ids() {
            let p: Point3<f64> = *ctx.mesh().position(v);
            assert!((p.coords.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_options() {
        let mut ctx = projected(primitives::tetrahedron().unwrap());
        let bad = [
            HarmonicOptions::default().with_step_size(-1.0),
            HarmonicOptions::default().with_alpha_range(0.0, 1e-2),
            HarmonicOptions::default().with_alpha_range(1e-2, 1e-3),
            HarmonicOptions::default().with_recenter_interval(0),
        ];
        for options in bad {
            let result = harmonic_map(&mut ctx, &options, &Progress::none());
            assert!(matches!(result, Err(MeshError::InvalidParameter { .. })));
        }
    }
}
