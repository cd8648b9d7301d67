//! Converts the stationary-frame voltage command into three bounded
//! phase-duty fractions.

use libm::fabsf;

use crate::math::{inv_clarke, AlphaBeta};

/// Duty fractions per phase, [-1..1]
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseDuties {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModulationOutput {
    pub duties: PhaseDuties,
    /// True when the commanded vector exceeded the linear range and the
    /// duties were rescaled to fit
    pub saturated: bool,
}

/// Inverse-Clarke modulation with common-mode injection.
///
/// Each raw phase voltage is normalized by half the bus voltage, then
/// shifted by the zero-sequence offset `-(max + min) / 2`, which extends
/// the linear range past plain per-phase clamping. An over-range vector
/// is uniformly rescaled so the largest duty magnitude is exactly one.
pub fn modulate(v_ab: AlphaBeta, v_bus: f32) -> ModulationOutput {
    if v_bus <= 0. {
        log::debug!("Modulation skipped, bus voltage: {}", v_bus);
        return ModulationOutput::default();
    }

    let v_abc = inv_clarke(v_ab);
    let half_bus = 0.5 * v_bus;

    let mut a = v_abc.a / half_bus;
    let mut b = v_abc.b / half_bus;
    let mut c = v_abc.c / half_bus;

    let z = -0.5 * (a.max(b).max(c) + a.min(b).min(c));
    a += z;
    b += z;
    c += z;

    let max_abs = fabsf(a).max(fabsf(b)).max(fabsf(c));
    let saturated = max_abs > 1.;
    if saturated {
        log::warn!("Modulation saturated, duty magnitude: {}", max_abs);
        let scale = 1. / max_abs;
        a *= scale;
        b *= scale;
        c *= scale;
    }

    ModulationOutput {
        duties: PhaseDuties {
            a: a.clamp(-1., 1.),
            b: b.clamp(-1., 1.),
            c: c.clamp(-1., 1.),
        },
        saturated,
    }
}
