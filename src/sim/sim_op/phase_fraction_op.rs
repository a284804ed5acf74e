//! Phase operator: runs the pointwise crystallinity update, producing the
//! rate field the diffusion step turns into latent heat.

use crate::phase_fraction::update_phase;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::simulation::Simulation;

#[derive(Default)]
pub struct PhaseFractionOp;

impl PhaseFractionOp {
    pub fn new() -> Self {
        Self
    }

    pub fn handle() -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new()))
    }
}

impl SimOp for PhaseFractionOp {
    fn name(&self) -> &str {
        "PhaseFraction"
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        update_phase(&mut sim.fields, sim.clock.dt_s);
    }
}
