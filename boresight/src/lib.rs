//! Closed-loop correction of spacecraft pointing errors.
//!
//! Measured right ascension, declination and roll errors are fed to three
//! independent PID controllers. The resulting corrections can optionally be
//! applied as torques to a rigid-body attitude model while a heliocentric orbit
//! angle is propagated alongside.

pub mod config;
pub mod input;
pub mod simulation;

use std::io::Write;

use boresight_plots::{PlotErrors, Plotter, Series};
use boresight_result::{ResultErrors, ResultWriter, SimResult};
use nalgebra::Vector3;
use thiserror::Error;

pub use config::{ConfigErrors, DynamicsConfig, SimulationConfig, SpacecraftConfig};
pub use input::{InputErrors, LoadedErrors, PointingError, load_errors, read_errors};
pub use simulation::{Simulation, SimulationErrors, SimulationOutput, StepRecord, simulate};

pub const SERIES_LABELS: [&str; 3] = ["RA control", "DEC control", "Roll control"];

#[derive(Debug, Error)]
pub enum BoresightErrors {
    #[error("{0}")]
    Config(#[from] ConfigErrors),
    #[error("{0}")]
    Input(#[from] InputErrors),
    #[error("{0}")]
    Result(#[from] ResultErrors),
    #[error("{0}")]
    Simulation(#[from] SimulationErrors),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlotOutcome {
    Rendered,
    /// No plotting capability was supplied.
    Unavailable,
    /// Rendering was attempted and failed; the results were still written.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub final_correction: Option<Vector3<f64>>,
    pub final_attitude: Option<Vector3<f64>>,
    pub final_orbit_angle: Option<f64>,
    pub plot: PlotOutcome,
}

/// Simulates, writes one CSV record per step to `output`, then hands the
/// correction histories to `plotter` if there is one.
///
/// Plotting happens after the results are flushed and its failure is only
/// logged, so the written results never depend on the plotter.
pub fn run<W: Write>(
    errors: &[PointingError],
    config: &SimulationConfig,
    output: W,
    plotter: Option<&dyn Plotter>,
) -> Result<RunSummary, BoresightErrors> {
    let result = simulate(errors, config)?;

    let mut results = ResultWriter::new(output, &result.headers())?;
    result.write_result(&mut results)?;
    results.flush()?;

    let plot = match plotter {
        Some(plotter) => match render_corrections(plotter, &result) {
            Ok(()) => PlotOutcome::Rendered,
            Err(e) => {
                tracing::warn!("plot generation failed: {}", e);
                PlotOutcome::Failed(e.to_string())
            }
        },
        None => {
            tracing::info!("plotting not available; skipping plot generation");
            PlotOutcome::Unavailable
        }
    };

    let dynamics = result.dynamics.as_ref();
    Ok(RunSummary {
        steps: result.len(),
        final_correction: result.corrections.last().copied(),
        final_attitude: dynamics.and_then(|d| d.attitudes.last().copied()),
        final_orbit_angle: dynamics.and_then(|d| d.orbit_angles.last().copied()),
        plot,
    })
}

pub fn render_corrections(
    plotter: &dyn Plotter,
    result: &SimulationOutput,
) -> Result<(), PlotErrors> {
    let [ra, dec, roll] = result.correction_series();
    plotter.render(&[
        Series::new(SERIES_LABELS[0], &ra),
        Series::new(SERIES_LABELS[1], &dec),
        Series::new(SERIES_LABELS[2], &roll),
    ])
}
