//! Mode-dispatched orchestration of the full cascade, one call per
//! control tick.

use crate::estimator::{EstimatorConfig, SpeedEstimator};
use crate::foc::{Foc, FocConfig};
use crate::limits::{LimitConfig, Limiter};
use crate::loops::{PositionLoop, PositionLoopConfig, SpeedLoop, SpeedLoopConfig};
use crate::math::{Dq, ThreePhase};
use crate::modulation::{modulate, PhaseDuties};
use crate::trajectory::{Trajectory, TrajectoryConfig};

/// Control mode, supplied externally on every tick.
///
/// Switching modes does not reset any controller or planner memory. A
/// caller that wants a clean handover must reset the relevant sub-state
/// itself before the first tick in the new mode; otherwise stale
/// integrators or a stale trajectory can command a torque or velocity
/// discontinuity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMode {
    Idle,
    /// Open-loop torque demand; position and speed loops are bypassed
    CurrentIq,
    Velocity,
    Position,
}

#[derive(Debug, Clone, Copy)]
pub struct AxisConfig {
    pub traj: TrajectoryConfig,
    pub pos: PositionLoopConfig,
    pub spd: SpeedLoopConfig,
    pub foc: FocConfig,
    pub est: EstimatorConfig,
    pub lim: LimitConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct AxisInput {
    pub mode: AxisMode,
    /// Radians, mechanical rotor angle
    pub theta_meas: f32,
    /// Amps, measured phase currents
    pub i_abc: ThreePhase,
    /// Radians
    pub theta_target: f32,
    /// Radians per second
    pub w_target: f32,
    /// Amps
    pub iq_target: f32,
    /// Volts
    pub v_bus: f32,
    /// Radians, electrical angle for the FOC transforms
    pub theta_elec: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AxisStatus {
    pub iq_limited: bool,
    pub vel_limited: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AxisOutput {
    pub duties: PhaseDuties,
    /// Measured dq current, telemetry
    pub i_dq: Dq,
    /// Torque-current command actually applied
    pub iq_cmd: f32,
    /// Velocity command actually applied
    pub w_cmd: f32,
    /// Angular reference actually applied
    pub theta_ref: f32,
    pub status: AxisStatus,
}

/// The whole per-axis controller memory: exactly one instance per
/// physical axis, threaded by exclusive reference into every tick.
///
/// `new` yields the rest state with zero gains everywhere; install the
/// tuned [`Pi`](crate::pi::Pi) instances before the first tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Axis {
    pub traj: Trajectory,
    pub pos: PositionLoop,
    pub spd: SpeedLoop,
    pub foc: Foc,
    pub est: SpeedEstimator,
    pub limiter: Limiter,
}

impl Axis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, cfg: &AxisConfig, input: &AxisInput, dt: f32) -> AxisOutput {
        let mut out = AxisOutput::default();

        if input.v_bus <= 0. || dt <= 0. {
            log::debug!("Axis tick skipped, v_bus: {}, dt: {}", input.v_bus, dt);
            return out;
        }

        log::trace!("Axis tick, mode: {:?}, dt: {}", input.mode, dt);

        // Runs in every mode so the estimator memory stays current even
        // while velocity feedback is unused.
        let est = self.est.update(&cfg.est, input.theta_meas, dt);
        let w_meas = est.filtered;

        self.limiter.clear();

        let mut theta_ref = input.theta_target;
        let mut w_cmd = 0.;

        let iq_cmd = match input.mode {
            AxisMode::Idle => return out,
            AxisMode::CurrentIq => input.iq_target,
            AxisMode::Velocity => {
                w_cmd = input.w_target;
                self.spd.update(&cfg.spd, w_meas, input.w_target, dt)
            }
            AxisMode::Position => {
                let point = self.traj.step(&cfg.traj, input.theta_target, dt);
                theta_ref = point.pos_ref;

                let w_raw = self.pos.update(&cfg.pos, input.theta_meas, theta_ref, dt);
                w_cmd = self.limiter.apply_vel(&cfg.lim, w_raw);

                self.spd.update(&cfg.spd, w_meas, w_cmd, dt)
            }
        };

        let iq_cmd = self.limiter.apply_iq(&cfg.lim, iq_cmd);

        // d axis is held at zero: no flux-weakening term.
        let foc_out = self.foc.update(
            &cfg.foc,
            input.i_abc,
            input.theta_elec,
            Dq { d: 0., q: iq_cmd },
            input.v_bus,
            dt,
        );

        let mod_out = modulate(foc_out.v_ab, input.v_bus);

        out.duties = mod_out.duties;
        out.i_dq = foc_out.i_dq;
        out.iq_cmd = iq_cmd;
        out.w_cmd = w_cmd;
        out.theta_ref = theta_ref;
        out.status = AxisStatus {
            iq_limited: self.limiter.iq_limited,
            vel_limited: self.limiter.w_limited,
        };
        out
    }
}
