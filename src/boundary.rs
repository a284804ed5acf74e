//! Thermal boundary conditions applied as a post-pass over the scratch
//! temperature buffer.
//!
//! Each edge carries its own condition: a fixed (Dirichlet) temperature
//! or an insulating zero-gradient copy of the adjacent interior line.
//! The lateral edges are written first and the top/bottom rows last, so
//! corner cells take the values of the Dirichlet rows.

use crate::field::ScalarField2D;
use crate::grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BoundaryCondition {
    /// Dirichlet: the edge line is pinned to this temperature
    FixedTemp(f64),
    /// Zero-gradient: the edge line copies the adjacent interior line
    Insulating,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Boundaries {
    pub top: BoundaryCondition,
    pub bottom: BoundaryCondition,
    pub left: BoundaryCondition,
    pub right: BoundaryCondition,
}

impl Boundaries {
    /// The standard crustal-section set: fixed surface temperature on
    /// top, a geotherm-derived fixed temperature at the bottom row's
    /// depth, insulated sides.
    pub fn standard(grid: &Grid, surface_temp_c: f64, gradient_c_per_km: f64) -> Self {
        let bottom_depth_km = grid.z_m[grid.nz - 1] / 1000.0;
        Boundaries {
            top: BoundaryCondition::FixedTemp(surface_temp_c),
            bottom: BoundaryCondition::FixedTemp(surface_temp_c + gradient_c_per_km * bottom_depth_km),
            left: BoundaryCondition::Insulating,
            right: BoundaryCondition::Insulating,
        }
    }

    /// All four edges insulating.
    pub fn insulated() -> Self {
        Boundaries {
            top: BoundaryCondition::Insulating,
            bottom: BoundaryCondition::Insulating,
            left: BoundaryCondition::Insulating,
            right: BoundaryCondition::Insulating,
        }
    }

    /// Overwrite the boundary lines of a temperature buffer.
    pub fn apply(&self, temp: &mut ScalarField2D) {
        let nx = temp.nx();
        let nz = temp.nz();

        // Lateral columns first
        for k in 0..nz {
            let left_value = match self.left {
                BoundaryCondition::FixedTemp(value) => value,
                BoundaryCondition::Insulating => temp.get(1, k),
            };
            temp.set(0, k, left_value);

            let right_value = match self.right {
                BoundaryCondition::FixedTemp(value) => value,
                BoundaryCondition::Insulating => temp.get(nx - 2, k),
            };
            temp.set(nx - 1, k, right_value);
        }

        // Top and bottom rows last so corners land on the row values
        for i in 0..nx {
            let top_value = match self.top {
                BoundaryCondition::FixedTemp(value) => value,
                BoundaryCondition::Insulating => temp.get(i, 1),
            };
            temp.set(i, 0, top_value);

            let bottom_value = match self.bottom {
                BoundaryCondition::FixedTemp(value) => value,
                BoundaryCondition::Insulating => temp.get(i, nz - 2),
            };
            temp.set(i, nz - 1, bottom_value);
        }
    }
}
