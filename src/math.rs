//! Angle wrapping and the Clarke/Park frame transforms shared by the
//! whole cascade.

use core::f32::consts::PI;

use libm::{cosf, floorf, sinf, sqrtf};

pub const TWO_PI: f32 = 2. * PI;

pub(crate) const SQRT3: f32 = 1.732_050_8;
const INV_SQRT3: f32 = 1. / SQRT3;

/// Three-phase quantities (currents or voltages), amps or volts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreePhase {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

/// Stationary two-axis orthogonal frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaBeta {
    pub alpha: f32,
    pub beta: f32,
}

/// Rotor-aligned rotating frame: d follows the flux, q produces torque.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dq {
    pub d: f32,
    pub q: f32,
}

/// Maps an angle into [0, 2π).
pub fn wrap_2pi(angle: f32) -> f32 {
    let wrapped = angle - floorf(angle / TWO_PI) * TWO_PI;
    if wrapped < 0. {
        wrapped + TWO_PI
    } else {
        wrapped
    }
}

/// Maps an angle into [-π, π), the shortest signed representation.
pub fn wrap_pi(angle: f32) -> f32 {
    let wrapped = wrap_2pi(angle);
    if wrapped >= PI {
        wrapped - TWO_PI
    } else {
        wrapped
    }
}

/// Clarke transform. Assumes the phases sum to zero.
pub fn clarke(i: ThreePhase) -> AlphaBeta {
    AlphaBeta {
        alpha: i.a,
        beta: (i.a + 2. * i.b) * INV_SQRT3,
    }
}

pub fn inv_clarke(v: AlphaBeta) -> ThreePhase {
    ThreePhase {
        a: v.alpha,
        b: (-v.alpha + SQRT3 * v.beta) * 0.5,
        c: (-v.alpha - SQRT3 * v.beta) * 0.5,
    }
}

/// Rotates a stationary-frame vector into the frame spinning at `theta`.
pub fn park(v: AlphaBeta, theta: f32) -> Dq {
    let s = sinf(theta);
    let c = cosf(theta);
    Dq {
        d: c * v.alpha + s * v.beta,
        q: -s * v.alpha + c * v.beta,
    }
}

pub fn inv_park(v: Dq, theta: f32) -> AlphaBeta {
    let s = sinf(theta);
    let c = cosf(theta);
    AlphaBeta {
        alpha: c * v.d - s * v.q,
        beta: s * v.d + c * v.q,
    }
}

impl AlphaBeta {
    pub fn magnitude(self) -> f32 {
        sqrtf(self.alpha * self.alpha + self.beta * self.beta)
    }

    /// Uniformly rescales to `max_mag` when the magnitude exceeds it,
    /// preserving direction. A non-positive limit disables the clamp.
    pub fn saturate(self, max_mag: f32) -> Self {
        let m = self.magnitude();
        if max_mag > 0. && m > max_mag {
            let scale = max_mag / m;
            AlphaBeta {
                alpha: self.alpha * scale,
                beta: self.beta * scale,
            }
        } else {
            self
        }
    }
}

impl Dq {
    pub fn magnitude(self) -> f32 {
        sqrtf(self.d * self.d + self.q * self.q)
    }

    /// Uniformly rescales to `max_mag` when the magnitude exceeds it,
    /// preserving direction. A non-positive limit disables the clamp.
    pub fn saturate(self, max_mag: f32) -> Self {
        let m = self.magnitude();
        if max_mag > 0. && m > max_mag {
            let scale = max_mag / m;
            Dq {
                d: self.d * scale,
                q: self.q * scale,
            }
        } else {
            self
        }
    }
}
