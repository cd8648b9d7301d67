//! Inner current loop and the frame transforms bridging phase-current
//! measurements to a stationary-frame voltage command.

use crate::math::{clarke, inv_park, park, AlphaBeta, Dq, ThreePhase};
use crate::pi::Pi;

#[derive(Debug, Clone, Copy)]
pub struct FocConfig {
    /// Fraction of the bus voltage usable by the dq voltage vector;
    /// the remainder is modulation headroom
    pub mod_radius: f32,
}

/// Independent PI controllers on the d and q current axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Foc {
    pub id_pi: Pi,
    pub iq_pi: Pi,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FocOutput {
    /// Stationary-frame voltage command
    pub v_ab: AlphaBeta,
    /// Measured current in the rotating frame, for telemetry
    pub i_dq: Dq,
}

impl Foc {
    /// dq voltage command from the dq current error, saturated to the
    /// circle of radius `mod_radius * v_bus`.
    ///
    /// With no usable bus the integrators are frozen rather than wound
    /// up: neither PI runs.
    pub fn current_loop(
        &mut self,
        cfg: &FocConfig,
        i_meas: Dq,
        i_setpoint: Dq,
        v_bus: f32,
        dt: f32,
    ) -> Dq {
        if v_bus <= 0. || cfg.mod_radius <= 0. {
            return Dq::default();
        }

        let vd = self.id_pi.update(i_setpoint.d - i_meas.d, dt);
        let vq = self.iq_pi.update(i_setpoint.q - i_meas.q, dt);

        Dq { d: vd, q: vq }.saturate(cfg.mod_radius * v_bus)
    }

    /// Full FOC pass: Clarke and Park at the supplied electrical angle,
    /// current loop, inverse Park back to the stationary frame. The
    /// electrical angle comes from the sensor path, never from here.
    pub fn update(
        &mut self,
        cfg: &FocConfig,
        i_abc: ThreePhase,
        theta_elec: f32,
        i_setpoint: Dq,
        v_bus: f32,
        dt: f32,
    ) -> FocOutput {
        let i_dq = park(clarke(i_abc), theta_elec);
        let v_dq = self.current_loop(cfg, i_dq, i_setpoint, v_bus, dt);

        FocOutput {
            v_ab: inv_park(v_dq, theta_elec),
            i_dq,
        }
    }
}
