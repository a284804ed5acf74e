//! Intrusion operator: queries the engine each step and, when a dike
//! fires, emplaces it, seeds its tracer batch, and accumulates the
//! inserted volume on the simulation.

use crate::error::SimError;
use crate::grid::Grid;
use crate::intrusion::{inject, IntrusionEngine, IntrusionParams};
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::simulation::Simulation;

pub struct DikeIntrusionOp {
    pub engine: IntrusionEngine,
    tracers_per_dike: usize,
}

impl DikeIntrusionOp {
    /// # Errors
    /// Propagates parameter validation failures from the engine.
    pub fn new(params: IntrusionParams, grid: &Grid) -> Result<Self, SimError> {
        let tracers_per_dike = params.tracers_per_dike;
        let engine = IntrusionEngine::new(params, grid)?;
        Ok(Self {
            engine,
            tracers_per_dike,
        })
    }

    /// # Errors
    /// Propagates parameter validation failures from the engine.
    pub fn handle(params: IntrusionParams, grid: &Grid) -> Result<SimOpHandle, SimError> {
        Ok(SimOpHandle::new(Box::new(Self::new(params, grid)?)))
    }
}

impl SimOp for DikeIntrusionOp {
    fn name(&self) -> &str {
        "DikeIntrusion"
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        let Some(dike) = self.engine.maybe_inject(sim.clock.time_s, &sim.grid) else {
            return;
        };

        let volume_m3 = inject(&mut sim.fields, &sim.grid, &dike);
        sim.injected_volume_m3 += volume_m3;
        sim.tracers
            .insert_batch(&dike, self.tracers_per_dike, self.engine.rng_mut(), &sim.grid);
        sim.last_intrusion = Some(dike);
    }
}
