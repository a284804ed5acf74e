//! Per-cell field storage for the simulation.
//!
//! [`ScalarField2D`] is a flat, row-major `Vec<f64>` with an explicit
//! shape; [`CrustFields`] owns every named field of a run, including the
//! double-buffered temperature pair. The stepper always reads the current
//! temperature buffer and writes the scratch buffer - the two are
//! exchanged with an O(1) ownership swap after each step, never copied.

use crate::grid::Grid;
use crate::material::MaterialProfile;
use crate::phase_fraction::solid_fraction;

/// A 2D scalar field stored as a flat row-major vector.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ScalarField2D {
    nx: usize,
    nz: usize,
    data: Vec<f64>,
}

impl ScalarField2D {
    /// Zero-initialized field with the given shape.
    pub fn new(nx: usize, nz: usize) -> Self {
        Self {
            nx,
            nz,
            data: vec![0.0; nx * nz],
        }
    }

    /// Field with every cell set to `value`.
    pub fn with_value(nx: usize, nz: usize, value: f64) -> Self {
        Self {
            nx,
            nz,
            data: vec![value; nx * nz],
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    /// Flat index of `(i, k)`.
    pub fn idx(&self, i: usize, k: usize) -> usize {
        debug_assert!(i < self.nx && k < self.nz, "field index out of bounds");
        k * self.nx + i
    }

    pub fn get(&self, i: usize, k: usize) -> f64 {
        self.data[self.idx(i, k)]
    }

    pub fn set(&mut self, i: usize, k: usize, value: f64) {
        let idx = self.idx(i, k);
        self.data[idx] = value;
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Copy every cell from another field of the same shape.
    pub fn copy_from(&mut self, other: &ScalarField2D) {
        assert!(
            self.nx == other.nx && self.nz == other.nz,
            "field shapes must match to copy"
        );
        self.data.copy_from_slice(&other.data);
    }

    pub fn min_value(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            0.0
        } else {
            self.data.iter().sum::<f64>() / self.data.len() as f64
        }
    }
}

/// Every per-cell and per-face array of one simulation run.
///
/// Cell-centered fields share the grid shape `(nx, nz)`. Conductivities
/// and fluxes on cell faces use the staggered shapes `(nx-1, nz)` for
/// x faces and `(nx, nz-1)` for z faces.
#[derive(Clone, Debug)]
pub struct CrustFields {
    /// Current temperature, read by the stencil
    pub temp_c: ScalarField2D,
    /// Scratch temperature, written by the stencil
    pub temp_next_c: ScalarField2D,
    pub density_kg_m3: ScalarField2D,
    pub specific_heat_j_per_kg_k: ScalarField2D,
    /// Solid (crystallized) fraction, 1 = fully solid rock, 0 = melt
    pub solid_frac: ScalarField2D,
    /// Solid fraction from the previous phase update
    pub solid_frac_prev: ScalarField2D,
    /// Backward-difference rate of the solid fraction, per second
    pub solid_frac_rate_per_s: ScalarField2D,
    /// Phase-blended effective conductivity at cell centers
    pub conductivity_w_m_k: ScalarField2D,
    /// Conductivity averaged onto x faces, shape `(nx-1, nz)`
    pub kx_w_m_k: ScalarField2D,
    /// Conductivity averaged onto z faces, shape `(nx, nz-1)`
    pub kz_w_m_k: ScalarField2D,
    /// Heat flux through x faces
    pub qx_w_m2: ScalarField2D,
    /// Heat flux through z faces
    pub qz_w_m2: ScalarField2D,
}

impl CrustFields {
    /// Allocate all arrays sized for the grid, zero-initialized. The
    /// driver is expected to establish the initial condition and then
    /// call [`CrustFields::sync_phase_with_temperature`].
    pub fn new(grid: &Grid) -> Self {
        let (nx, nz) = (grid.nx, grid.nz);
        Self {
            temp_c: ScalarField2D::new(nx, nz),
            temp_next_c: ScalarField2D::new(nx, nz),
            density_kg_m3: ScalarField2D::new(nx, nz),
            specific_heat_j_per_kg_k: ScalarField2D::new(nx, nz),
            solid_frac: ScalarField2D::new(nx, nz),
            solid_frac_prev: ScalarField2D::new(nx, nz),
            solid_frac_rate_per_s: ScalarField2D::new(nx, nz),
            conductivity_w_m_k: ScalarField2D::new(nx, nz),
            kx_w_m_k: ScalarField2D::new(nx - 1, nz),
            kz_w_m_k: ScalarField2D::new(nx, nz - 1),
            qx_w_m2: ScalarField2D::new(nx - 1, nz),
            qz_w_m2: ScalarField2D::new(nx, nz - 1),
        }
    }

    /// Fill density, heat capacity, and cell conductivity from a material
    /// profile. Conductivity starts at the solid value; the per-step blend
    /// reworks it from the phase field.
    pub fn fill_material(&mut self, profile: &MaterialProfile) {
        self.density_kg_m3.fill(profile.density_kg_m3);
        self.specific_heat_j_per_kg_k
            .fill(profile.specific_heat_j_per_kg_k);
        self.conductivity_w_m_k.fill(profile.conductivity_solid_w_m_k);
    }

    /// Recompute the solid-fraction triple directly from the current
    /// temperature: fraction and previous fraction agree, rate is zero.
    /// Call after writing an initial condition or emplacing material so
    /// the next phase update sees no artificial transient.
    pub fn sync_phase_with_temperature(&mut self) {
        let temps = self.temp_c.as_slice();
        let solid = self.solid_frac.as_mut_slice();
        let prev = self.solid_frac_prev.as_mut_slice();
        let rate = self.solid_frac_rate_per_s.as_mut_slice();
        for idx in 0..temps.len() {
            let frac = solid_fraction(temps[idx]);
            solid[idx] = frac;
            prev[idx] = frac;
            rate[idx] = 0.0;
        }
    }

    /// Reset the scratch buffer to the current temperature so a step that
    /// skips some cells (boundaries, partial op pipelines) still commits a
    /// complete field.
    pub fn reset_next_temperature(&mut self) {
        self.temp_next_c.copy_from(&self.temp_c);
    }

    /// Exchange the current and scratch temperature buffers in O(1).
    pub fn swap_temperature(&mut self) {
        std::mem::swap(&mut self.temp_c, &mut self.temp_next_c);
    }
}
