//! Drives the axis cascade against the PMSM plant model, closing the
//! loop the way the firmware's control interrupt would.

use foc_axis::axis::{Axis, AxisConfig, AxisInput, AxisMode};
use foc_axis::estimator::EstimatorConfig;
use foc_axis::foc::FocConfig;
use foc_axis::limits::LimitConfig;
use foc_axis::loops::{PositionLoopConfig, SpeedLoopConfig};
use foc_axis::math::{wrap_pi, ThreePhase};
use foc_axis::pi::Pi;
use foc_axis::plant::{Pmsm, PmsmInput, PmsmParams};
use foc_axis::trajectory::TrajectoryConfig;

struct Rig {
    axis: Axis,
    cfg: AxisConfig,
    motor: Pmsm,
    params: PmsmParams,
    v_bus: f32,
}

impl Rig {
    fn new() -> Self {
        let cfg = AxisConfig {
            traj: TrajectoryConfig {
                max_vel: 1.,
                max_acc: 2.,
            },
            pos: PositionLoopConfig {
                w_min: -50.,
                w_max: 50.,
            },
            spd: SpeedLoopConfig {
                iq_min: -50.,
                iq_max: 50.,
            },
            foc: FocConfig { mod_radius: 0.8 },
            est: EstimatorConfig { alpha: 0.2 },
            lim: LimitConfig {
                iq_min: -50.,
                iq_max: 50.,
                w_min: -50.,
                w_max: 50.,
            },
        };

        let mut axis = Axis::new();
        axis.pos.pi = Pi::new(2., 0., -200., 200.);
        axis.spd.pi = Pi::new(1., 0., -200., 200.);
        axis.foc.id_pi = Pi::new(1., 0., -200., 200.);
        axis.foc.iq_pi = Pi::new(1., 0., -200., 200.);

        let params = PmsmParams {
            rs: 0.1,
            ls: 0.001,
            flux: 0.05,
            pole_pairs: 4.,
            inertia: 0.00001,
            damping: 0.01,
        };

        Rig {
            axis,
            cfg,
            motor: Pmsm::default(),
            params,
            v_bus: 24.,
        }
    }

    fn mechanical_angle(&self) -> f32 {
        wrap_pi(self.motor.theta_e / self.params.pole_pairs)
    }

    fn step(&mut self, dt: f32, mode: AxisMode, theta_target: f32, w_target: f32, iq_target: f32) {
        let theta_e = self.motor.theta_e;

        let input = AxisInput {
            mode,
            theta_meas: self.mechanical_angle(),
            i_abc: ThreePhase {
                a: self.motor.ia,
                b: self.motor.ib,
                c: self.motor.ic,
            },
            theta_target,
            w_target,
            iq_target,
            v_bus: self.v_bus,
            theta_elec: theta_e,
        };

        let out = self.axis.tick(&self.cfg, &input, dt);

        let half_bus = 0.5 * self.v_bus;
        let motor_in = PmsmInput {
            v_abc: ThreePhase {
                a: -out.duties.a * half_bus,
                b: -out.duties.b * half_bus,
                c: -out.duties.c * half_bus,
            },
            load_torque: 0.,
        };
        self.motor.step(&self.params, &motor_in, dt);
    }
}

#[test]
fn position_step_reduces_angular_error() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rig = Rig::new();
    let dt = 0.0005;
    let theta_target = 1.0_f32;
    let err0 = theta_target - rig.mechanical_angle();

    for _ in 0..20000 {
        rig.step(dt, AxisMode::Position, theta_target, 0., 0.);
    }

    let err_final = theta_target - rig.mechanical_angle();
    assert!(err_final.abs() < err0.abs());
}

#[test]
fn velocity_mode_spins_the_rotor_forward() {
    let mut rig = Rig::new();
    let dt = 0.0005;

    for _ in 0..20000 {
        rig.step(dt, AxisMode::Velocity, 0., 10., 0.);
    }

    assert!(rig.motor.omega_m > 1.);
}

#[test]
fn idle_mode_leaves_the_rotor_at_rest() {
    let mut rig = Rig::new();
    let dt = 0.0005;

    for _ in 0..2000 {
        rig.step(dt, AxisMode::Idle, 0., 0., 0.);
    }

    assert!(rig.motor.omega_m.abs() < 1e-3);
    assert!(rig.motor.ia.abs() < 1e-3);
}
