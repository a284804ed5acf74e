//! Tracer operator: refreshes every marker against the freshly stepped
//! scratch temperature, before the buffers swap.

use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::simulation::Simulation;

#[derive(Default)]
pub struct TracerUpdateOp;

impl TracerUpdateOp {
    pub fn new() -> Self {
        Self
    }

    pub fn handle() -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new()))
    }
}

impl SimOp for TracerUpdateOp {
    fn name(&self) -> &str {
        "TracerUpdate"
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        sim.tracers
            .update(&sim.fields.temp_next_c, &sim.fields.solid_frac, &sim.grid);
    }
}
