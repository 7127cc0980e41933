use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::pid::{Pid, PidGains};

/// One independent controller per pointing axis (right ascension, declination, roll).
///
/// All three start from the same gains but never share state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AxisControllers {
    pub ra: Pid,
    pub dec: Pid,
    pub roll: Pid,
}

impl AxisControllers {
    pub fn new(gains: PidGains) -> Self {
        Self {
            ra: Pid::new(gains),
            dec: Pid::new(gains),
            roll: Pid::new(gains),
        }
    }

    /// Updates each axis with its own component of `error` and returns the
    /// correction triple in the same axis order.
    pub fn update(&mut self, error: &Vector3<f64>, dt: f64) -> Vector3<f64> {
        Vector3::new(
            self.ra.update(error[0], dt),
            self.dec.update(error[1], dt),
            self.roll.update(error[2], dt),
        )
    }

    pub fn reset(&mut self) {
        self.ra.reset();
        self.dec.reset();
        self.roll.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_axes_independent() {
        let mut controllers = AxisControllers::new(PidGains::new(1.0, 0.5, 0.2));
        for k in 0..50 {
            let u = controllers.update(&Vector3::new(k as f64 * 0.1, 0.0, 0.0), 1.0);
            assert_eq!(u[1], 0.0);
            assert_eq!(u[2], 0.0);
        }
        assert_eq!(controllers.dec.integral(), 0.0);
        assert_eq!(controllers.roll.integral(), 0.0);
        assert!(controllers.ra.integral() > 0.0);
    }

    #[test]
    fn test_axes_match_single_controller() {
        let gains = PidGains::new(0.8, 0.1, 0.3);
        let errors = [
            Vector3::new(1.0, -2.0, 0.5),
            Vector3::new(0.5, -1.0, 0.25),
            Vector3::new(-0.25, 0.0, 1.5),
        ];

        let mut controllers = AxisControllers::new(gains);
        let mut single = Pid::new(gains);
        for e in &errors {
            let u = controllers.update(e, 0.5);
            assert_abs_diff_eq!(u[1], single.update(e[1], 0.5), epsilon = 1e-12);
        }
    }
}
