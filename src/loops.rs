//! Outer cascade stages: position error to a velocity command, velocity
//! error to a torque-current command.

use crate::math::wrap_pi;
use crate::pi::Pi;

#[derive(Debug, Clone, Copy)]
pub struct PositionLoopConfig {
    /// Radians per second
    pub w_min: f32,
    /// Radians per second
    pub w_max: f32,
}

/// Regulates on the shortest wrapped angular error, so a setpoint just
/// across the 0/2π seam commands a small correction, not a full turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionLoop {
    pub pi: Pi,
}

impl PositionLoop {
    pub fn update(
        &mut self,
        cfg: &PositionLoopConfig,
        theta_meas: f32,
        theta_setpoint: f32,
        dt: f32,
    ) -> f32 {
        let err = wrap_pi(theta_setpoint - theta_meas);
        self.pi.update(err, dt).clamp(cfg.w_min, cfg.w_max)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpeedLoopConfig {
    /// Amps
    pub iq_min: f32,
    /// Amps
    pub iq_max: f32,
}

/// Velocity error is linear, no wrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeedLoop {
    pub pi: Pi,
}

impl SpeedLoop {
    pub fn update(&mut self, cfg: &SpeedLoopConfig, w_meas: f32, w_setpoint: f32, dt: f32) -> f32 {
        let err = w_setpoint - w_meas;
        self.pi.update(err, dt).clamp(cfg.iq_min, cfg.iq_max)
    }
}
