//! Crystallinity closure: solid fraction as a smooth function of
//! temperature, plus the per-step pointwise field update.
//!
//! The tracked scalar is the SOLID fraction: 1 for cold crystallized rock,
//! 0 for fresh melt, falling through 0.5 at the calibration midpoint. The
//! rate stored by [`update_phase`] is a first-order backward difference
//! against the previous update, not an analytic derivative - it inherits
//! whatever time step the run uses, which is exactly what the latent-heat
//! source term in the energy balance needs.

use crate::constants::{PHASE_MIDPOINT_TEMP_C, PHASE_WIDTH_C};
use crate::field::CrustFields;

/// Solid (crystallized) fraction at a temperature, in [0, 1].
///
/// Logistic in temperature: saturates to 1 well below the midpoint and to
/// 0 well above it. Defined for every finite input.
pub fn solid_fraction(temp_c: f64) -> f64 {
    1.0 / (1.0 + ((temp_c - PHASE_MIDPOINT_TEMP_C) / PHASE_WIDTH_C).exp())
}

/// Melt-fraction view of the same closure, `1 - solid_fraction`.
pub fn melt_fraction(temp_c: f64) -> f64 {
    1.0 - solid_fraction(temp_c)
}

/// Pointwise phase update over the whole field store.
///
/// For every cell: evaluate the closure at the current temperature, form
/// the backward-difference rate against the stored previous fraction, then
/// overwrite both the fraction and the previous fraction with the new
/// value. The rate must be formed before the previous fraction is
/// overwritten; calling twice with an unchanged temperature therefore
/// leaves a zero rate on the second call.
pub fn update_phase(fields: &mut CrustFields, dt_s: f64) {
    debug_assert!(dt_s > 0.0, "phase update needs a positive time step");

    let temps = fields.temp_c.as_slice();
    let solid = fields.solid_frac.as_mut_slice();
    let prev = fields.solid_frac_prev.as_mut_slice();
    let rate = fields.solid_frac_rate_per_s.as_mut_slice();

    for idx in 0..temps.len() {
        let frac = solid_fraction(temps[idx]);
        rate[idx] = (frac - prev[idx]) / dt_s;
        prev[idx] = frac;
        solid[idx] = frac;
    }
}
