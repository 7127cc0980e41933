use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MassPropertiesErrors {
    #[error("Ixx cant be less than or equal to  zero")]
    IxxLessThanOrEqualToZero,
    #[error("Iyy cant be less than or equal to zero")]
    IyyLessThanOrEqualToZero,
    #[error("Izz cant be less than or equal to zero")]
    IzzLessThanOrEqualToZero,
    #[error("mass cannot be less than or equal to zero")]
    MassLessThanOrEqualToZero,
    #[error("side length cannot be less than or equal to zero")]
    SideLengthLessThanOrEqualToZero,
}

/// Principal moments of inertia. Products of inertia are zero, so the axes
/// are decoupled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inertia {
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
}

impl Inertia {
    pub fn new(ixx: f64, iyy: f64, izz: f64) -> Result<Self, MassPropertiesErrors> {
        if !ixx.is_finite() || ixx <= 0.0 {
            return Err(MassPropertiesErrors::IxxLessThanOrEqualToZero);
        }
        if !iyy.is_finite() || iyy <= 0.0 {
            return Err(MassPropertiesErrors::IyyLessThanOrEqualToZero);
        }
        if !izz.is_finite() || izz <= 0.0 {
            return Err(MassPropertiesErrors::IzzLessThanOrEqualToZero);
        }
        Ok(Self { ixx, iyy, izz })
    }

    /// Inertia of a thin uniform cube, `m * s^2 / 6` about every axis.
    pub fn cube(mass: f64, side_length: f64) -> Result<Self, MassPropertiesErrors> {
        let i = mass * side_length.powi(2) / 6.0;
        Self::new(i, i, i)
    }

    pub fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.ixx, self.iyy, self.izz)
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::from_diagonal(&self.vector())
    }
}

/// Represents the mass properties of a rigid body
/// Mass, Inertia
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub mass: f64,
    pub inertia: Inertia,
}

impl MassProperties {
    pub fn new(mass: f64, inertia: Inertia) -> Result<Self, MassPropertiesErrors> {
        if !mass.is_finite() || mass <= f64::EPSILON {
            return Err(MassPropertiesErrors::MassLessThanOrEqualToZero);
        }
        Ok(MassProperties { mass, inertia })
    }

    pub fn cube(mass: f64, side_length: f64) -> Result<Self, MassPropertiesErrors> {
        if !side_length.is_finite() || side_length <= f64::EPSILON {
            return Err(MassPropertiesErrors::SideLengthLessThanOrEqualToZero);
        }
        if !mass.is_finite() || mass <= f64::EPSILON {
            return Err(MassPropertiesErrors::MassLessThanOrEqualToZero);
        }
        Self::new(mass, Inertia::cube(mass, side_length)?)
    }
}
