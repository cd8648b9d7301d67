//! Command clamps with per-tick status reporting.

#[derive(Debug, Clone, Copy)]
pub struct LimitConfig {
    /// Amps
    pub iq_min: f32,
    /// Amps
    pub iq_max: f32,
    /// Radians per second
    pub w_min: f32,
    /// Radians per second
    pub w_max: f32,
}

/// Clamp status for the current tick. The flags are overwritten on every
/// apply call, never accumulated, so telemetry reflects only the tick
/// that produced it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Limiter {
    pub iq_limited: bool,
    pub w_limited: bool,
}

impl Limiter {
    pub fn apply_iq(&mut self, cfg: &LimitConfig, iq_cmd: f32) -> f32 {
        let iq = iq_cmd.clamp(cfg.iq_min, cfg.iq_max);
        self.iq_limited = iq != iq_cmd;
        if self.iq_limited {
            log::debug!("Torque-current limiter triggered: {} -> {}", iq_cmd, iq);
        }
        iq
    }

    pub fn apply_vel(&mut self, cfg: &LimitConfig, w_cmd: f32) -> f32 {
        let w = w_cmd.clamp(cfg.w_min, cfg.w_max);
        self.w_limited = w != w_cmd;
        if self.w_limited {
            log::debug!("Velocity limiter triggered: {} -> {}", w_cmd, w);
        }
        w
    }

    pub fn clear(&mut self) {
        self.iq_limited = false;
        self.w_limited = false;
    }
}
