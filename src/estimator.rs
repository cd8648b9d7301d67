//! Speed estimation by differentiating the wrapped rotor angle.

use crate::lowpass::LowPass;
use crate::math::wrap_pi;

#[derive(Debug, Clone, Copy)]
pub struct EstimatorConfig {
    /// Low-pass coefficient applied to the raw derivative, [0..1]
    pub alpha: f32,
}

/// Differentiator state. The `initialized` flag suppresses the velocity
/// spike a first sample against an undefined previous angle would cause.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeedEstimator {
    theta_prev: f32,
    w_raw: f32,
    lp: LowPass,
    initialized: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpeedEstimate {
    /// Radians per second, unfiltered
    pub raw: f32,
    /// Radians per second, low-passed
    pub filtered: f32,
}

impl SpeedEstimator {
    pub fn update(&mut self, cfg: &EstimatorConfig, theta_meas: f32, dt: f32) -> SpeedEstimate {
        if dt <= 0. {
            return SpeedEstimate {
                raw: self.w_raw,
                filtered: self.lp.output(),
            };
        }

        if !self.initialized {
            self.theta_prev = theta_meas;
            self.w_raw = 0.;
            self.lp.seed(0.);
            self.initialized = true;
            return SpeedEstimate::default();
        }

        // Wrapping the difference handles the 0/2π seam.
        let w = wrap_pi(theta_meas - self.theta_prev) / dt;
        self.theta_prev = theta_meas;
        self.w_raw = w;

        SpeedEstimate {
            raw: w,
            filtered: self.lp.update(cfg.alpha, w),
        }
    }
}
