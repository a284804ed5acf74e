//! Diffusion operator: conductivity blend, face averaging, the explicit
//! stencil step into the scratch buffer, then the boundary post-pass.

use crate::boundary::Boundaries;
use crate::diffusion::{average_face_conductivities, blend_effective_conductivity, diffusion_step};
use crate::grid::Grid;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::simulation::Simulation;

pub struct ThermalDiffusionOp {
    pub boundaries: Boundaries,
}

impl ThermalDiffusionOp {
    pub fn with_boundaries(boundaries: Boundaries) -> Self {
        Self { boundaries }
    }

    /// The standard crustal set: fixed surface and geotherm-derived
    /// bottom temperature, insulated sides.
    pub fn standard(grid: &Grid, surface_temp_c: f64, gradient_c_per_km: f64) -> Self {
        Self {
            boundaries: Boundaries::standard(grid, surface_temp_c, gradient_c_per_km),
        }
    }

    pub fn handle(grid: &Grid, surface_temp_c: f64, gradient_c_per_km: f64) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::standard(grid, surface_temp_c, gradient_c_per_km)))
    }
}

impl SimOp for ThermalDiffusionOp {
    fn name(&self) -> &str {
        "ThermalDiffusion"
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        let profile = sim.host_profile();
        let dt_s = sim.clock.dt_s;

        blend_effective_conductivity(&mut sim.fields, profile);
        average_face_conductivities(&mut sim.fields);
        diffusion_step(&mut sim.fields, &sim.grid, profile, dt_s);
        self.boundaries.apply(&mut sim.fields.temp_next_c);
    }
}
