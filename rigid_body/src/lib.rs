use mass_properties::{MassProperties, MassPropertiesErrors};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RigidBodyErrors {
    #[error("{0}")]
    MassPropertiesErrors(#[from] MassPropertiesErrors),
}

/// Attitude (rad) and body rates (rad/s) about the three principal axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    pub attitude: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
}

/// Rigid body with a diagonal inertia tensor.
///
/// Each axis is integrated on its own: torque about one axis never moves
/// another. Attitude angles are not wrapped.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RigidBody {
    mass_properties: MassProperties,
    pub state: RigidBodyState,
}

impl RigidBody {
    pub fn new(mass_properties: MassProperties) -> Self {
        Self {
            mass_properties,
            state: RigidBodyState::default(),
        }
    }

    /// Uniform cube of the given mass (kg) and side length (m), at rest.
    pub fn cube(mass: f64, side_length: f64) -> Result<Self, RigidBodyErrors> {
        Ok(Self::new(MassProperties::cube(mass, side_length)?))
    }

    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass_properties
    }

    /// Advances the state by one Euler step under `torque` (N·m).
    ///
    /// The rate is updated first and the new rate drives the attitude update.
    pub fn step(&mut self, torque: &Vector3<f64>, dt: f64) {
        let inertia = self.mass_properties.inertia.vector();
        for axis in 0..3 {
            let alpha = torque[axis] / inertia[axis];
            self.state.angular_velocity[axis] += alpha * dt;
            self.state.attitude[axis] += self.state.angular_velocity[axis] * dt;
        }
    }

    pub fn attitude(&self) -> Vector3<f64> {
        self.state.attitude
    }

    pub fn angular_velocity(&self) -> Vector3<f64> {
        self.state.angular_velocity
    }
}
