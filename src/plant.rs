//! PMSM plant model for closing the loop in simulation and tests.
//!
//! Not part of the control path: integrates the motor's electrical and
//! mechanical equations with fixed-step RK4 so the axis cascade can be
//! exercised against realistic current and angle feedback.

use core::f32::consts::PI;

use libm::{cosf, sinf};

use crate::math::{wrap_2pi, ThreePhase, SQRT3};

#[derive(Debug, Clone, Copy)]
pub struct PmsmParams {
    /// Ohms, stator phase resistance
    pub rs: f32,
    /// Henries, stator phase inductance
    pub ls: f32,
    /// Webers, permanent-magnet flux linkage
    pub flux: f32,
    pub pole_pairs: f32,
    /// Kilogram meters-squared
    pub inertia: f32,
    /// Newton meter seconds, viscous damping
    pub damping: f32,
}

/// Electromechanical state, advanced by [`Pmsm::step`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Pmsm {
    pub ia: f32,
    pub ib: f32,
    pub ic: f32,
    /// Radians per second, mechanical
    pub omega_m: f32,
    /// Radians, electrical, kept in [0, 2π)
    pub theta_e: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PmsmInput {
    /// Volts, applied phase voltages
    pub v_abc: ThreePhase,
    /// Newton meters
    pub load_torque: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PmsmOutput {
    pub i_abc: ThreePhase,
    pub omega_m: f32,
    pub theta_e: f32,
    /// Newton meters, electromagnetic torque after the step
    pub torque: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Deriv {
    dia: f32,
    dib: f32,
    dic: f32,
    domega_m: f32,
    dtheta_e: f32,
}

fn torque(x: &Pmsm, p: &PmsmParams) -> f32 {
    let i_alpha = (2. / 3.) * (x.ia - 0.5 * x.ib - 0.5 * x.ic);
    let i_beta = (2. / 3.) * (SQRT3 * 0.5) * (x.ib - x.ic);

    let psi_alpha = p.ls * i_alpha + p.flux * cosf(x.theta_e);
    let psi_beta = p.ls * i_beta + p.flux * sinf(x.theta_e);

    1.5 * p.pole_pairs * (psi_alpha * i_beta - psi_beta * i_alpha)
}

fn rhs(x: &Pmsm, p: &PmsmParams, input: &PmsmInput) -> Deriv {
    let omega_e = p.pole_pairs * x.omega_m;

    Deriv {
        dia: (input.v_abc.a - p.rs * x.ia + p.flux * omega_e * sinf(x.theta_e)) / p.ls,
        dib: (input.v_abc.b - p.rs * x.ib + p.flux * omega_e * sinf(x.theta_e - 2. * PI / 3.))
            / p.ls,
        dic: (input.v_abc.c - p.rs * x.ic + p.flux * omega_e * sinf(x.theta_e + 2. * PI / 3.))
            / p.ls,
        domega_m: (torque(x, p) - input.load_torque - p.damping * x.omega_m) / p.inertia,
        dtheta_e: omega_e,
    }
}

fn advance(x: &Pmsm, k: &Deriv, step: f32) -> Pmsm {
    Pmsm {
        ia: x.ia + step * k.dia,
        ib: x.ib + step * k.dib,
        ic: x.ic + step * k.dic,
        omega_m: x.omega_m + step * k.domega_m,
        theta_e: x.theta_e + step * k.dtheta_e,
    }
}

impl Pmsm {
    /// Classic fourth-order Runge-Kutta step over the coupled phase and
    /// mechanical equations. A non-positive `dt` holds the state and
    /// reports zero torque.
    pub fn step(&mut self, params: &PmsmParams, input: &PmsmInput, dt: f32) -> PmsmOutput {
        if dt <= 0. {
            return PmsmOutput {
                i_abc: ThreePhase {
                    a: self.ia,
                    b: self.ib,
                    c: self.ic,
                },
                omega_m: self.omega_m,
                theta_e: self.theta_e,
                torque: 0.,
            };
        }

        let x = *self;
        let k1 = rhs(&x, params, input);
        let k2 = rhs(&advance(&x, &k1, 0.5 * dt), params, input);
        let k3 = rhs(&advance(&x, &k2, 0.5 * dt), params, input);
        let k4 = rhs(&advance(&x, &k3, dt), params, input);

        let inv6 = 1. / 6.;
        let k = Deriv {
            dia: (k1.dia + 2. * k2.dia + 2. * k3.dia + k4.dia) * inv6,
            dib: (k1.dib + 2. * k2.dib + 2. * k3.dib + k4.dib) * inv6,
            dic: (k1.dic + 2. * k2.dic + 2. * k3.dic + k4.dic) * inv6,
            domega_m: (k1.domega_m + 2. * k2.domega_m + 2. * k3.domega_m + k4.domega_m) * inv6,
            dtheta_e: (k1.dtheta_e + 2. * k2.dtheta_e + 2. * k3.dtheta_e + k4.dtheta_e) * inv6,
        };

        let mut x = advance(&x, &k, dt);
        x.theta_e = wrap_2pi(x.theta_e);
        *self = x;

        PmsmOutput {
            i_abc: ThreePhase {
                a: x.ia,
                b: x.ib,
                c: x.ic,
            },
            omega_m: x.omega_m,
            theta_e: x.theta_e,
            torque: torque(&x, params),
        }
    }
}
