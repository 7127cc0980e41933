use std::io::Write;

use aerospace::orbit::{OrbitErrors, OrbitPropagator};
use boresight_result::{ResultErrors, ResultWriter, SimResult};
use control::AxisControllers;
use nalgebra::Vector3;
use rigid_body::{RigidBody, RigidBodyErrors};
use thiserror::Error;

use crate::{
    config::{ConfigErrors, DynamicsConfig, SimulationConfig},
    input::PointingError,
};

#[derive(Debug, Error)]
pub enum SimulationErrors {
    #[error("{0}")]
    Config(#[from] ConfigErrors),
    #[error("{0}")]
    Orbit(#[from] OrbitErrors),
    #[error("{0}")]
    RigidBody(#[from] RigidBodyErrors),
}

const CORRECTION_HEADERS: [&str; 4] = ["step", "RA_correction", "DEC_correction", "Roll_correction"];
const DYNAMICS_HEADERS: [&str; 4] = ["RA", "DEC", "Roll", "orbit_deg"];

/// Outputs of a single step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepRecord {
    /// Controller output per axis, applied as torque when dynamics are on.
    pub correction: Vector3<f64>,
    pub attitude: Option<Vector3<f64>>,
    pub orbit_angle: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicsOutput {
    pub attitudes: Vec<Vector3<f64>>,
    pub orbit_angles: Vec<f64>,
}

/// Parallel per-step sequences, each as long as the input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationOutput {
    pub corrections: Vec<Vector3<f64>>,
    pub dynamics: Option<DynamicsOutput>,
}

impl SimulationOutput {
    fn with_capacity(n: usize, dynamics: bool) -> Self {
        Self {
            corrections: Vec::with_capacity(n),
            dynamics: dynamics.then(|| DynamicsOutput {
                attitudes: Vec::with_capacity(n),
                orbit_angles: Vec::with_capacity(n),
            }),
        }
    }

    fn push(&mut self, record: StepRecord) {
        self.corrections.push(record.correction);
        if let Some(dynamics) = &mut self.dynamics {
            if let (Some(attitude), Some(angle)) = (record.attitude, record.orbit_angle) {
                dynamics.attitudes.push(attitude);
                dynamics.orbit_angles.push(angle);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    /// Correction history of each axis, in RA, DEC, Roll order.
    pub fn correction_series(&self) -> [Vec<f64>; 3] {
        let mut series: [Vec<f64>; 3] = Default::default();
        for (axis, s) in series.iter_mut().enumerate() {
            *s = self.corrections.iter().map(|c| c[axis]).collect();
        }
        series
    }
}

impl SimResult for SimulationOutput {
    fn headers(&self) -> Vec<&'static str> {
        let mut headers = CORRECTION_HEADERS.to_vec();
        if self.dynamics.is_some() {
            headers.extend(DYNAMICS_HEADERS);
        }
        headers
    }

    fn write_result<W: Write>(&self, results: &mut ResultWriter<W>) -> Result<(), ResultErrors> {
        for (i, c) in self.corrections.iter().enumerate() {
            let mut record = vec![
                i.to_string(),
                c[0].to_string(),
                c[1].to_string(),
                c[2].to_string(),
            ];
            if let Some(dynamics) = &self.dynamics {
                let a = dynamics.attitudes[i];
                record.extend([
                    a[0].to_string(),
                    a[1].to_string(),
                    a[2].to_string(),
                    dynamics.orbit_angles[i].to_string(),
                ]);
            }
            results.write_record(&record)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Dynamics {
    body: RigidBody,
    orbit: OrbitPropagator,
}

impl Dynamics {
    fn new(config: &DynamicsConfig) -> Result<Self, SimulationErrors> {
        Ok(Self {
            body: RigidBody::cube(config.spacecraft.mass, config.spacecraft.side_length)?,
            orbit: OrbitPropagator::new(&config.orbit)?,
        })
    }
}

/// Three axis controllers, optionally driving the spacecraft attitude and
/// orbit. Steps must be taken in sample order.
#[derive(Debug)]
pub struct Simulation {
    controllers: AxisControllers,
    dynamics: Option<Dynamics>,
    dt: f64,
    step_days: f64,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationErrors> {
        config.validate()?;
        let dynamics = match &config.dynamics {
            Some(dynamics) => Some(Dynamics::new(dynamics)?),
            None => None,
        };
        Ok(Self {
            controllers: AxisControllers::new(config.gains),
            dynamics,
            dt: config.dt,
            step_days: config.step_days,
        })
    }

    pub fn has_dynamics(&self) -> bool {
        self.dynamics.is_some()
    }

    pub fn controllers(&self) -> &AxisControllers {
        &self.controllers
    }

    pub fn step(&mut self, error: &PointingError) -> StepRecord {
        let torque = self.controllers.update(&error.vector(), self.dt);
        match &mut self.dynamics {
            Some(dynamics) => {
                dynamics.body.step(&torque, self.dt);
                let angle = dynamics.orbit.advance(self.step_days);
                StepRecord {
                    correction: torque,
                    attitude: Some(dynamics.body.attitude()),
                    orbit_angle: Some(angle),
                }
            }
            None => StepRecord {
                correction: torque,
                attitude: None,
                orbit_angle: None,
            },
        }
    }

    pub fn run(mut self, errors: &[PointingError]) -> SimulationOutput {
        let mut output = SimulationOutput::with_capacity(errors.len(), self.has_dynamics());
        for error in errors {
            let record = self.step(error);
            output.push(record);
        }
        output
    }
}

/// Runs the controllers (and dynamics, when configured) over `errors` in order.
///
/// Fails before any step is taken if the config does not validate, which
/// includes a zero `dt`.
pub fn simulate(
    errors: &[PointingError],
    config: &SimulationConfig,
) -> Result<SimulationOutput, SimulationErrors> {
    let simulation = Simulation::new(config)?;
    tracing::debug!(
        "simulating {} steps (dynamics {})",
        errors.len(),
        if simulation.has_dynamics() { "on" } else { "off" }
    );
    Ok(simulation.run(errors))
}
