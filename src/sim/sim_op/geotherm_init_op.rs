//! Initial-condition operator: fills the field store with the host
//! material and a linear geotherm before the first step.

use crate::constants::{GEOTHERMAL_GRADIENT_C_PER_KM, SURFACE_TEMP_C};
use crate::diffusion::blend_effective_conductivity;
use crate::math_utils::lerp;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::simulation::Simulation;

pub struct GeothermInitOp {
    pub surface_temp_c: f64,
    pub gradient_c_per_km: f64,
}

impl GeothermInitOp {
    pub fn new(surface_temp_c: f64, gradient_c_per_km: f64) -> Self {
        Self {
            surface_temp_c,
            gradient_c_per_km,
        }
    }

    pub fn handle(surface_temp_c: f64, gradient_c_per_km: f64) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new(surface_temp_c, gradient_c_per_km)))
    }
}

impl Default for GeothermInitOp {
    fn default() -> Self {
        Self::new(SURFACE_TEMP_C, GEOTHERMAL_GRADIENT_C_PER_KM)
    }
}

impl SimOp for GeothermInitOp {
    fn name(&self) -> &str {
        "GeothermInit"
    }

    fn init_sim(&mut self, sim: &mut Simulation) {
        let profile = sim.host_profile();
        sim.fields.fill_material(profile);

        let bottom_depth_km = sim.grid.z_m[sim.grid.nz - 1] / 1000.0;
        let bottom_temp_c = self.surface_temp_c + self.gradient_c_per_km * bottom_depth_km;
        for k in 0..sim.grid.nz {
            let ratio = if sim.grid.nz > 1 {
                k as f64 / (sim.grid.nz - 1) as f64
            } else {
                0.0
            };
            let temp_c = lerp(self.surface_temp_c, bottom_temp_c, ratio);
            for i in 0..sim.grid.nx {
                sim.fields.temp_c.set(i, k, temp_c);
            }
        }

        sim.fields.reset_next_temperature();
        sim.fields.sync_phase_with_temperature();
        blend_effective_conductivity(&mut sim.fields, profile);
    }
}
