use serde::{Deserialize, Serialize};

/// Proportional, integral and derivative gains shared by every controlled axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.1,
            kd: 0.05,
        }
    }
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    pub integral: f64,
    pub prev_error: f64,
}

/// Discrete PID controller for a single axis.
///
/// The integral is never clamped and the output is never saturated, so a
/// persistent bias grows the integral term linearly for as long as it lasts.
/// The derivative on the first update is taken against a previous error of zero.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Pid {
    gains: PidGains,
    pub state: PidState,
}

impl Pid {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            state: PidState::default(),
        }
    }

    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    /// Returns the correction for a single error sample and advances the state.
    ///
    /// `dt` must be nonzero. A zero step divides by zero in the derivative term
    /// and the returned correction is not finite.
    pub fn update(&mut self, error: f64, dt: f64) -> f64 {
        self.state.integral += error * dt;
        let derivative = (error - self.state.prev_error) / dt;
        self.state.prev_error = error;

        self.gains.kp * error + self.gains.ki * self.state.integral + self.gains.kd * derivative
    }

    pub fn integral(&self) -> f64 {
        self.state.integral
    }

    pub fn previous_error(&self) -> f64 {
        self.state.prev_error
    }

    pub fn reset(&mut self) {
        self.state = PidState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_first_update() {
        let (kp, ki, kd) = (1.3, 0.4, 0.25);
        let e = 2.5;
        let dt = 0.5;
        let mut pid = Pid::new(PidGains::new(kp, ki, kd));
        let u = pid.update(e, dt);
        assert_abs_diff_eq!(u, kp * e + ki * e * dt + kd * e / dt, epsilon = 1e-12);
    }

    #[test]
    fn test_integral_constant_error() {
        let mut pid = Pid::new(PidGains::new(0.0, 1.0, 0.0));
        let mut u = 0.0;
        for _ in 0..5 {
            u = pid.update(2.0, 1.0);
        }
        assert_abs_diff_eq!(u, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pid.integral(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_integral_unclamped_long_run() {
        let e = 0.75;
        let dt = 0.1;
        let mut pid = Pid::new(PidGains::new(0.0, 1.0, 0.0));
        for n in 1..=100_000 {
            let u = pid.update(e, dt);
            if n % 10_000 == 0 {
                assert_abs_diff_eq!(u, n as f64 * e * dt, epsilon = 1e-6);
            }
        }
        // well past the point any anti-windup limit would have kicked in
        assert!(pid.integral() > 7_000.0);
    }

    #[test]
    fn test_derivative_equal_errors() {
        let mut pid = Pid::new(PidGains::new(0.0, 0.0, 1.0));
        pid.update(3.0, 1.0);
        let u = pid.update(3.0, 1.0);
        assert_abs_diff_eq!(u, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_change() {
        let dt = 0.25;
        let mut pid = Pid::new(PidGains::new(0.0, 0.0, 1.0));
        pid.update(1.0, dt);
        let u = pid.update(4.0, dt);
        assert_abs_diff_eq!(u, (4.0 - 1.0) / dt, epsilon = 1e-12);
        assert_abs_diff_eq!(pid.previous_error(), 4.0);
    }

    #[test]
    fn test_zero_dt_not_finite() {
        let mut pid = Pid::new(PidGains::new(1.0, 1.0, 1.0));
        let u = pid.update(1.0, 0.0);
        assert!(!u.is_finite());
    }

    #[test]
    fn test_reset() {
        let mut pid = Pid::new(PidGains::default());
        pid.update(1.0, 1.0);
        pid.update(-2.0, 1.0);
        pid.reset();
        assert_eq!(pid.state, PidState::default());
        assert_eq!(pid.gains(), &PidGains::default());
    }
}
