use std::{fs::File, path::Path};

use aerospace::orbit::{HeliocentricOrbit, OrbitErrors};
use control::PidGains;
use rigid_body::{RigidBody, RigidBodyErrors};
use ron::ser::{PrettyConfig, to_string_pretty};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigErrors {
    #[error("dt must be nonzero")]
    ZeroTimeStep,
    #[error("dt must be finite, got {0}")]
    NonFiniteTimeStep(f64),
    #[error("step_days must be finite, got {0}")]
    NonFiniteStepDays(f64),
    #[error("gains must be finite, got kp={kp} ki={ki} kd={kd}")]
    NonFiniteGains { kp: f64, ki: f64, kd: f64 },
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Orbit(#[from] OrbitErrors),
    #[error("{0}")]
    RigidBody(#[from] RigidBodyErrors),
    #[error("{0}")]
    RonDe(#[from] ron::error::SpannedError),
    #[error("{0}")]
    RonSer(#[from] ron::Error),
}

/// Uniform cube approximation of the spacecraft bus.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpacecraftConfig {
    /// Mass (in kg).
    pub mass: f64,
    /// Cube side length (in m).
    pub side_length: f64,
}

impl Default for SpacecraftConfig {
    /// STEREO-A
    fn default() -> Self {
        Self {
            mass: 620.0,
            side_length: 1.1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicsConfig {
    pub spacecraft: SpacecraftConfig,
    pub orbit: HeliocentricOrbit,
}

/// Everything a run needs besides the error samples.
///
/// Missing fields in a config file fall back to the defaults. Setting
/// `dynamics: None` runs the controllers alone, without attitude or orbit
/// propagation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gains: PidGains,
    /// Controller and attitude integration step.
    pub dt: f64,
    /// Simulated time per step for orbit propagation (in days).
    pub step_days: f64,
    pub dynamics: Option<DynamicsConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gains: PidGains::default(),
            dt: 1.0,
            step_days: 0.02778,
            dynamics: Some(DynamicsConfig::default()),
        }
    }
}

impl SimulationConfig {
    /// Config with the given gains and no dynamics.
    pub fn controllers_only(gains: PidGains, dt: f64) -> Self {
        Self {
            gains,
            dt,
            dynamics: None,
            ..Default::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigErrors> {
        let file = File::open(path)?;
        let config: Self = ron::de::from_reader(file)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigErrors> {
        Ok(to_string_pretty(self, PrettyConfig::new())?)
    }

    pub fn validate(&self) -> Result<(), ConfigErrors> {
        if self.dt == 0.0 {
            return Err(ConfigErrors::ZeroTimeStep);
        }
        if !self.dt.is_finite() {
            return Err(ConfigErrors::NonFiniteTimeStep(self.dt));
        }
        let PidGains { kp, ki, kd } = self.gains;
        if !(kp.is_finite() && ki.is_finite() && kd.is_finite()) {
            return Err(ConfigErrors::NonFiniteGains { kp, ki, kd });
        }
        if let Some(dynamics) = &self.dynamics {
            if !self.step_days.is_finite() {
                return Err(ConfigErrors::NonFiniteStepDays(self.step_days));
            }
            RigidBody::cube(dynamics.spacecraft.mass, dynamics.spacecraft.side_length)?;
            dynamics.orbit.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gains, PidGains::new(1.0, 0.1, 0.05));
        assert!(config.dynamics.is_some());
    }

    #[test]
    fn test_zero_dt() {
        let config = SimulationConfig {
            dt: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigErrors::ZeroTimeStep)));
        let config = SimulationConfig {
            dt: -0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigErrors::ZeroTimeStep)));
    }

    #[test]
    fn test_non_finite() {
        let config = SimulationConfig {
            dt: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigErrors::NonFiniteTimeStep(_))
        ));
        let config = SimulationConfig {
            step_days: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigErrors::NonFiniteStepDays(_))
        ));
    }

    #[test]
    fn test_step_days_ignored_without_dynamics() {
        let mut config = SimulationConfig::controllers_only(PidGains::default(), 1.0);
        config.step_days = f64::NAN;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_spacecraft() {
        let mut config = SimulationConfig::default();
        if let Some(dynamics) = config.dynamics.as_mut() {
            dynamics.spacecraft.mass = 0.0;
        }
        assert!(matches!(config.validate(), Err(ConfigErrors::RigidBody(_))));
    }

    #[test]
    fn test_invalid_period() {
        let mut config = SimulationConfig::default();
        if let Some(dynamics) = config.dynamics.as_mut() {
            dynamics.orbit.period_days = 0.0;
        }
        assert!(matches!(config.validate(), Err(ConfigErrors::Orbit(_))));
    }

    #[test]
    fn test_ron_partial() {
        let config: SimulationConfig =
            ron::from_str("(gains: (kp: 2.0, ki: 0.0, kd: 0.5), dynamics: None)").unwrap();
        assert_eq!(config.gains, PidGains::new(2.0, 0.0, 0.5));
        assert_eq!(config.dt, 1.0);
        assert!(config.dynamics.is_none());
    }

    #[test]
    fn test_ron_round_trip() {
        let config = SimulationConfig::default();
        let s = config.to_ron_string().unwrap();
        let back: SimulationConfig = ron::from_str(&s).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_resource_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/stereo_a.ron");
        let config = SimulationConfig::from_file(&path).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }
}
