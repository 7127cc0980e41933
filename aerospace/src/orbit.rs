use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum OrbitErrors {
    #[error("orbital period must be positive and finite, got {0} days")]
    InvalidPeriod(f64),
}

/// Represents a heliocentric orbit by its mean elements.
///
/// Only the period drives propagation; the semi-major axis and eccentricity
/// describe the orbit for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeliocentricOrbit {
    /// Semi-major axis of the orbit (in AU).
    pub semi_major_axis: f64,
    /// Eccentricity of the orbit (dimensionless).
    pub eccentricity: f64,
    /// Orbital period (in days).
    pub period_days: f64,
}

impl Default for HeliocentricOrbit {
    /// STEREO-A
    fn default() -> Self {
        Self {
            semi_major_axis: 0.97,
            eccentricity: 0.01,
            period_days: 347.0,
        }
    }
}

impl HeliocentricOrbit {
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        period_days: f64,
    ) -> Result<Self, OrbitErrors> {
        let orbit = Self {
            semi_major_axis,
            eccentricity,
            period_days,
        };
        orbit.validate()?;
        Ok(orbit)
    }

    pub fn validate(&self) -> Result<(), OrbitErrors> {
        if !self.period_days.is_finite() || self.period_days <= 0.0 {
            return Err(OrbitErrors::InvalidPeriod(self.period_days));
        }
        Ok(())
    }

    /// Mean motion (in deg/day).
    pub fn mean_motion(&self) -> f64 {
        360.0 / self.period_days
    }
}

/// Advances the orbit angle at a constant mean motion.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OrbitPropagator {
    mean_motion: f64,
    /// Orbit angle (in degrees), always in [0, 360).
    angle: f64,
}

impl OrbitPropagator {
    pub fn new(orbit: &HeliocentricOrbit) -> Result<Self, OrbitErrors> {
        orbit.validate()?;
        Ok(Self {
            mean_motion: orbit.mean_motion(),
            angle: 0.0,
        })
    }

    /// Advances by `step_days` and returns the wrapped orbit angle.
    pub fn advance(&mut self, step_days: f64) -> f64 {
        let angle = (self.angle + self.mean_motion * step_days).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        self.angle = if angle >= 360.0 { 0.0 } else { angle };
        self.angle
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }
}
