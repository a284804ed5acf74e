//! Rectangular 2D simulation grid.
//!
//! The grid is immutable once constructed: cell counts, physical spacing,
//! and cell-center coordinates are all fixed for the lifetime of a run.
//! The x axis runs across the section; the z axis is depth, increasing
//! downward from the surface.

use crate::error::SimError;

/// Minimum cells per axis - the 5-point stencil needs one neighbor on
/// each side of an interior cell.
pub const MIN_CELLS_PER_AXIS: usize = 3;

#[derive(Clone, Debug, serde::Serialize)]
pub struct Grid {
    /// Cell count across the section
    pub nx: usize,
    /// Cell count down the section
    pub nz: usize,
    /// Horizontal cell spacing in meters
    pub dx_m: f64,
    /// Vertical cell spacing in meters
    pub dz_m: f64,
    /// Cell-center x coordinates, length `nx`
    pub x_m: Vec<f64>,
    /// Cell-center depths, length `nz`, positive downward
    pub z_m: Vec<f64>,
}

impl Grid {
    /// Build a grid, validating dimensions and spacing.
    ///
    /// # Errors
    /// `SimError::Configuration` when either axis has fewer than
    /// [`MIN_CELLS_PER_AXIS`] cells or a spacing is not strictly positive.
    pub fn new(nx: usize, nz: usize, dx_m: f64, dz_m: f64) -> Result<Grid, SimError> {
        if nx < MIN_CELLS_PER_AXIS {
            return Err(SimError::Configuration {
                reason: format!("nx must be at least {MIN_CELLS_PER_AXIS} (got {nx})"),
            });
        }
        if nz < MIN_CELLS_PER_AXIS {
            return Err(SimError::Configuration {
                reason: format!("nz must be at least {MIN_CELLS_PER_AXIS} (got {nz})"),
            });
        }
        if !(dx_m > 0.0) || !dx_m.is_finite() {
            return Err(SimError::Configuration {
                reason: format!("dx_m must be a positive finite number (got {dx_m})"),
            });
        }
        if !(dz_m > 0.0) || !dz_m.is_finite() {
            return Err(SimError::Configuration {
                reason: format!("dz_m must be a positive finite number (got {dz_m})"),
            });
        }

        let x_m = (0..nx).map(|i| (i as f64 + 0.5) * dx_m).collect();
        let z_m = (0..nz).map(|k| (k as f64 + 0.5) * dz_m).collect();

        Ok(Grid {
            nx,
            nz,
            dx_m,
            dz_m,
            x_m,
            z_m,
        })
    }

    /// Flat row-major index of cell `(i, k)`.
    pub fn idx(&self, i: usize, k: usize) -> usize {
        debug_assert!(i < self.nx && k < self.nz, "cell index out of bounds");
        k * self.nx + i
    }

    /// Total cell count.
    pub fn cell_count(&self) -> usize {
        self.nx * self.nz
    }

    /// Physical width of the domain in meters.
    pub fn width_m(&self) -> f64 {
        self.nx as f64 * self.dx_m
    }

    /// Physical depth of the domain in meters.
    pub fn depth_m(&self) -> f64 {
        self.nz as f64 * self.dz_m
    }

    /// In-plane area of one cell in square meters.
    pub fn cell_area_m2(&self) -> f64 {
        self.dx_m * self.dz_m
    }

    /// Whether a physical point lies inside the domain.
    pub fn contains_point(&self, x_m: f64, z_m: f64) -> bool {
        x_m >= 0.0 && x_m < self.width_m() && z_m >= 0.0 && z_m < self.depth_m()
    }

    /// Cell whose footprint contains the given physical point, or `None`
    /// when the point falls outside the domain.
    pub fn nearest_cell(&self, x_m: f64, z_m: f64) -> Option<(usize, usize)> {
        if !self.contains_point(x_m, z_m) {
            return None;
        }
        let i = ((x_m / self.dx_m) as usize).min(self.nx - 1);
        let k = ((z_m / self.dz_m) as usize).min(self.nz - 1);
        Some((i, k))
    }
}
