//! Dike geometry: the value object describing one intrusion event and its
//! rasterization onto the grid.
//!
//! Shapes are a closed set - a tilted rectangle (planar sheet) or a
//! tilted lens (elliptical cross-section, the shape an elastically opened
//! crack takes). The point test runs in the dike's local frame: rotate
//! the offset from the center by the negative tilt, then test against the
//! axis-aligned half extents.

use crate::grid::Grid;
use glam::{DMat2, DVec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DikeShape {
    /// Planar sheet with sharp tips
    Rectangular,
    /// Elliptical cross-section, thickest at the center
    Lens,
}

/// One intrusion event. Created by the intrusion engine, consumed by
/// rasterization, and retained only inside step records.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dike {
    pub shape: DikeShape,
    /// Extent along the dike plane, in meters
    pub width_m: f64,
    /// Opening across the dike plane, in meters
    pub thickness_m: f64,
    pub center_x_m: f64,
    pub center_z_m: f64,
    /// Rotation of the dike plane from the x axis, radians
    pub tilt_rad: f64,
    /// Emplacement temperature of the magma
    pub temp_c: f64,
}

impl Dike {
    /// Whether a physical point falls inside the dike body.
    pub fn contains(&self, x_m: f64, z_m: f64) -> bool {
        let offset = DVec2::new(x_m - self.center_x_m, z_m - self.center_z_m);
        let local = DMat2::from_angle(-self.tilt_rad) * offset;
        let half_width = 0.5 * self.width_m;
        let half_thickness = 0.5 * self.thickness_m;

        match self.shape {
            DikeShape::Rectangular => {
                local.x.abs() <= half_width && local.y.abs() <= half_thickness
            }
            DikeShape::Lens => {
                let u = local.x / half_width;
                let v = local.y / half_thickness;
                u * u + v * v <= 1.0
            }
        }
    }

    /// Grid cells whose centers fall inside the dike, clipped to the
    /// domain. A dike straddling the boundary covers only its in-domain
    /// part; one placed wholly outside covers nothing.
    pub fn rasterize(&self, grid: &Grid) -> Vec<(usize, usize)> {
        // Bounding half-extent that holds the shape at any tilt
        let reach_m = 0.5 * (self.width_m * self.width_m + self.thickness_m * self.thickness_m).sqrt();

        let i_min = (((self.center_x_m - reach_m) / grid.dx_m).floor().max(0.0)) as usize;
        let i_max = ((self.center_x_m + reach_m) / grid.dx_m).ceil().max(0.0) as usize;
        let k_min = (((self.center_z_m - reach_m) / grid.dz_m).floor().max(0.0)) as usize;
        let k_max = ((self.center_z_m + reach_m) / grid.dz_m).ceil().max(0.0) as usize;

        let mut covered = Vec::new();
        for k in k_min..=k_max.min(grid.nz - 1) {
            for i in i_min..=i_max.min(grid.nx - 1) {
                if self.contains(grid.x_m[i], grid.z_m[k]) {
                    covered.push((i, k));
                }
            }
        }
        covered
    }

    /// Analytic cross-section area in square meters.
    pub fn area_m2(&self) -> f64 {
        match self.shape {
            DikeShape::Rectangular => self.width_m * self.thickness_m,
            DikeShape::Lens => std::f64::consts::FRAC_PI_4 * self.width_m * self.thickness_m,
        }
    }
}
