//! Explicit finite-difference heat diffusion with phase-blended
//! conductivity and latent-heat release.
//!
//! One step runs in three passes over the field store:
//! 1. blend the effective cell conductivity from the solid fraction,
//! 2. average it onto the staggered faces (arithmetic mean - the cell
//!    values are already a phase blend, so faces never sit between
//!    different materials),
//! 3. form the face fluxes and update the interior cells into the scratch
//!    temperature buffer.
//!
//! The stencil reads only the current buffer and writes only the scratch
//! buffer. Boundary rows and columns are left for the boundary post-pass.
//!
//! Stability: the explicit scheme requires
//! `dt <= min(dx², dz²) / κ / STABILITY_SAFETY_FACTOR` with κ the solid
//! diffusivity. [`stable_timestep_s`] computes the bound; a run with a
//! larger step is rejected at construction, never integrated.

use crate::constants::STABILITY_SAFETY_FACTOR;
use crate::error::SimError;
use crate::field::CrustFields;
use crate::grid::Grid;
use crate::material::MaterialProfile;

/// Blend the effective cell conductivity between the solid-rock and melt
/// endpoints, weighted by the solid fraction:
/// `K = Φ·k_solid + (1-Φ)·k_melt`.
pub fn blend_effective_conductivity(fields: &mut CrustFields, profile: &MaterialProfile) {
    let solid = fields.solid_frac.as_slice();
    let cond = fields.conductivity_w_m_k.as_mut_slice();
    for idx in 0..solid.len() {
        cond[idx] = solid[idx] * profile.conductivity_solid_w_m_k
            + (1.0 - solid[idx]) * profile.conductivity_melt_w_m_k;
    }
}

/// Average cell-centered conductivity onto the x and z faces.
pub fn average_face_conductivities(fields: &mut CrustFields) {
    let CrustFields {
        conductivity_w_m_k,
        kx_w_m_k,
        kz_w_m_k,
        ..
    } = fields;

    let nx = conductivity_w_m_k.nx();
    let nz = conductivity_w_m_k.nz();

    for k in 0..nz {
        for i in 0..nx - 1 {
            let mean = 0.5 * (conductivity_w_m_k.get(i, k) + conductivity_w_m_k.get(i + 1, k));
            kx_w_m_k.set(i, k, mean);
        }
    }
    for k in 0..nz - 1 {
        for i in 0..nx {
            let mean = 0.5 * (conductivity_w_m_k.get(i, k) + conductivity_w_m_k.get(i, k + 1));
            kz_w_m_k.set(i, k, mean);
        }
    }
}

/// One explicit step: face fluxes from the current temperature, then the
/// interior update into the scratch buffer.
///
/// `T_next = T - dt/(ρ·cp) · [∇·q - L·ρ·dΦ/dt]`
///
/// Crystallization (a rising solid fraction) has a positive rate and so
/// releases latent heat; melting absorbs it. Only interior cells are
/// written - callers reset the scratch buffer beforehand and apply
/// boundary conditions afterward.
pub fn diffusion_step(fields: &mut CrustFields, grid: &Grid, profile: &MaterialProfile, dt_s: f64) {
    let CrustFields {
        temp_c,
        temp_next_c,
        density_kg_m3,
        specific_heat_j_per_kg_k,
        solid_frac_rate_per_s,
        kx_w_m_k,
        kz_w_m_k,
        qx_w_m2,
        qz_w_m2,
        ..
    } = fields;

    let nx = grid.nx;
    let nz = grid.nz;
    let dx = grid.dx_m;
    let dz = grid.dz_m;

    // Face fluxes, centered differences on the face-to-cell spacing
    for k in 0..nz {
        for i in 0..nx - 1 {
            let gradient = (temp_c.get(i + 1, k) - temp_c.get(i, k)) / dx;
            qx_w_m2.set(i, k, -kx_w_m_k.get(i, k) * gradient);
        }
    }
    for k in 0..nz - 1 {
        for i in 0..nx {
            let gradient = (temp_c.get(i, k + 1) - temp_c.get(i, k)) / dz;
            qz_w_m2.set(i, k, -kz_w_m_k.get(i, k) * gradient);
        }
    }

    // Interior update
    for k in 1..nz - 1 {
        for i in 1..nx - 1 {
            let divergence = (qx_w_m2.get(i, k) - qx_w_m2.get(i - 1, k)) / dx
                + (qz_w_m2.get(i, k) - qz_w_m2.get(i, k - 1)) / dz;
            let density = density_kg_m3.get(i, k);
            let latent = profile.latent_heat_fusion_j_per_kg
                * density
                * solid_frac_rate_per_s.get(i, k);
            let rho_cp = density * specific_heat_j_per_kg_k.get(i, k);
            let updated = temp_c.get(i, k) - dt_s / rho_cp * (divergence - latent);
            temp_next_c.set(i, k, updated);
        }
    }
}

/// Largest stable time step for this grid and material, in seconds.
pub fn stable_timestep_s(grid: &Grid, profile: &MaterialProfile) -> f64 {
    let min_spacing_sq = (grid.dx_m * grid.dx_m).min(grid.dz_m * grid.dz_m);
    min_spacing_sq / profile.diffusivity_solid_m2_s() / STABILITY_SAFETY_FACTOR
}

/// Validate a caller-supplied time step against the stability bound.
///
/// # Errors
/// `SimError::StabilityViolation` when the step exceeds the bound, and
/// `SimError::Configuration` when it is not a positive finite number.
pub fn check_timestep(dt_s: f64, grid: &Grid, profile: &MaterialProfile) -> Result<(), SimError> {
    if !(dt_s > 0.0) || !dt_s.is_finite() {
        return Err(SimError::Configuration {
            reason: format!("dt_s must be a positive finite number (got {dt_s})"),
        });
    }
    let max_dt_s = stable_timestep_s(grid, profile);
    if dt_s > max_dt_s {
        return Err(SimError::StabilityViolation { dt_s, max_dt_s });
    }
    Ok(())
}
