//! The single PI control law reused by every cascade stage.

/// Proportional-integral controller with a clamped integrator and a
/// clamped output.
///
/// The accumulator is clamped to the output window before it is summed
/// with the proportional term, so a saturated stage cannot wind up.
/// One instance per cascade stage; the integral is the only memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pi {
    pub kp: f32,
    pub ki: f32,
    /// Lower bound for both the accumulator and the output
    pub out_min: f32,
    /// Upper bound for both the accumulator and the output
    pub out_max: f32,
    pub integral: f32,
}

impl Pi {
    pub fn new(kp: f32, ki: f32, out_min: f32, out_max: f32) -> Self {
        Pi {
            kp,
            ki,
            out_min,
            out_max,
            integral: 0.,
        }
    }

    pub fn update(&mut self, error: f32, dt: f32) -> f32 {
        self.integral = (self.integral + self.ki * error * dt).clamp(self.out_min, self.out_max);
        (self.kp * error + self.integral).clamp(self.out_min, self.out_max)
    }

    /// Overwrites the accumulator without clamping. Callers must pass a
    /// value inside the output window.
    pub fn reset(&mut self, integral: f32) {
        self.integral = integral;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libm::fabsf;

    #[test]
    fn zero_gains_always_zero() {
        let mut pi = Pi::new(0., 0., -10., 10.);
        for _ in 0..10 {
            let u = pi.update(5., 0.001);
            assert_eq!(u, 0.);
            assert_eq!(pi.integral, 0.);
        }
    }

    #[test]
    fn pure_proportional() {
        let mut pi = Pi::new(2., 0., -100., 100.);
        assert_eq!(pi.update(1., 0.001), 2.);
        assert_eq!(pi.update(-3., 0.001), -6.);
        assert_eq!(pi.integral, 0.);
    }

    #[test]
    fn pure_integral_accumulation() {
        let mut pi = Pi::new(0., 10., -100., 100.);
        let dt = 0.001;
        let steps = 1000;
        for _ in 0..steps {
            pi.update(1., dt);
        }
        let expected = 10. * dt * steps as f32;
        assert!(fabsf(pi.integral - expected) < 1e-3);
        assert!(fabsf(pi.update(0., dt) - expected) < 1e-3);
    }

    #[test]
    fn output_clamps_to_bounds() {
        let mut pi = Pi::new(50., 0., -10., 10.);
        assert_eq!(pi.update(1., 0.001), 10.);
        assert_eq!(pi.update(-1., 0.001), -10.);
        assert_eq!(pi.integral, 0.);
    }

    #[test]
    fn integral_clamps_within_bounds() {
        let mut pi = Pi::new(0., 1000., -5., 5.);
        for _ in 0..1000 {
            pi.update(1., 0.001);
        }
        assert!(pi.integral <= 5. + 1e-5);
        assert!(pi.integral >= -5. - 1e-5);
    }

    #[test]
    fn saturated_output_stays_bounded() {
        let mut pi = Pi::new(10., 1000., -5., 5.);
        let mut last = 0.;
        for _ in 0..1000 {
            last = pi.update(1., 0.001);
            assert!(last <= 5. + 1e-5);
            assert!(last >= -5. - 1e-5);
        }
        assert!(fabsf(last - 5.) < 1e-3);
    }

    #[test]
    fn reset_sets_integral_directly() {
        let mut pi = Pi::new(1., 10., -10., 10.);
        pi.update(1., 0.1);
        assert!(pi.integral != 0.);
        pi.reset(3.);
        assert_eq!(pi.integral, 3.);
        assert_eq!(pi.update(0., 0.1), 3.);
    }
}
