//! Spheremap CLI - spherical parameterization of closed genus-0 meshes.
//!
//! Usage: spheremap [OPTIONS] <INPUT> <OUTPUT_PREFIX>
//!
//! Writes `<OUTPUT_PREFIX>Star.obj`, `<OUTPUT_PREFIX>Tuette.obj`, and
//! `<OUTPUT_PREFIX>Harmonic.obj`. Set `RUST_LOG=debug` for per-iteration
//! energies.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use spheremap::algo::spherical::{
    spherical_parameterization, HarmonicOptions, MapReport, SphericalOptions, TutteOptions,
};
use spheremap::algo::Progress;
use spheremap::io::{self, Format};
use spheremap::mesh::HalfEdgeMesh;

#[derive(Parser)]
#[command(name = "spheremap")]
#[command(author, version, about = "Map a closed genus-0 mesh onto the unit sphere", long_about = None)]
struct Cli {
    /// Input mesh file (.obj or .ply)
    input: PathBuf,

    /// Prefix of the three output files
    output_prefix: String,

    /// Step size of the plain gradient steps
    #[arg(long, default_value = "1e-2")]
    step_size: f64,

    /// Stop a stage once the energy drops by at most this much
    #[arg(long, default_value = "1e-5")]
    threshold: f64,

    /// Iteration ceiling of the Tutte stage
    #[arg(long, default_value = "1000000")]
    tutte_max_iterations: usize,

    /// Iteration ceiling of the harmonic stage
    #[arg(long, default_value = "100000")]
    harmonic_max_iterations: usize,

    /// Re-center on the area-weighted center of mass every N iterations
    #[arg(long, value_name = "N")]
    recenter_every: Option<usize>,

    /// Compare line search trials against the best energy found so far
    #[arg(long)]
    track_best_energy: bool,

    /// Stop after the Tutte stage
    #[arg(long)]
    skip_harmonic: bool,

    /// Format of the checkpoint files
    #[arg(long, value_enum, default_value = "obj")]
    format: OutputFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Wavefront OBJ
    Obj,
    /// ASCII PLY
    Ply,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Obj => Format::Obj,
            OutputFormat::Ply => Format::Ply,
        }
    }
}

impl Cli {
    fn options(&self) -> SphericalOptions {
        let mut tutte = TutteOptions::default()
            .with_step_size(self.step_size)
            .with_energy_threshold(self.threshold)
            .with_max_iterations(self.tutte_max_iterations);
        let mut harmonic = HarmonicOptions::default()
            .with_step_size(self.step_size)
            .with_energy_threshold(self.threshold)
            .with_max_iterations(self.harmonic_max_iterations)
            .with_track_best_energy(self.track_best_energy);
        if let Some(n) = self.recenter_every {
            tutte = tutte.with_recenter_interval(n);
            harmonic = harmonic.with_recenter_interval(n);
        }

        let options = SphericalOptions::default().with_tutte(tutte).with_harmonic(harmonic);
        if self.skip_harmonic {
            options.skip_harmonic()
        } else {
            options
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = cli.options();
    let format = Format::from(cli.format);

    let start = Instant::now();
    let mesh: HalfEdgeMesh = io::load(&cli.input)?;
    log::info!(
        "Loaded {}: {} vertices, {} edges, {} faces",
        cli.input.display(),
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces()
    );

    let progress = create_progress();
    let prefix = &cli.output_prefix;
    let (_, report) = spherical_parameterization(mesh, &options, &progress, |stage, mesh| {
        let path = format!("{}{}.{}", prefix, stage.file_suffix(), format.extension());
        io::save(mesh, &path)?;
        log::info!("Wrote {}", path);
        Ok(())
    })?;

    log_report(&report.tutte);
    if let Some(harmonic) = &report.harmonic {
        log_report(harmonic);
    }
    log::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}

/// Log every update the library hands out.
fn create_progress() -> Progress {
    Progress::new(|update| {
        log::info!(
            "[{}] iteration {}: energy {:.9}, difference {:.3e}",
            update.stage,
            update.iteration,
            update.energy,
            update.energy_delta
        );
    })
}

fn log_report(report: &MapReport) {
    match report.ensure_converged() {
        Ok(()) => log::info!(
            "{} map: {} iterations, energy {:.9} (started at {:.9})",
            report.stage,
            report.iterations,
            report.energy,
            report.initial_energy()
        ),
        Err(e) => log::warn!("{}; the {} checkpoint holds the last iterate", e, report.stage),
    }
}
