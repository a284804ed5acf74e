// Simulation operators, executed in registration order every step
pub mod dike_intrusion_op;
pub mod geotherm_init_op;
pub mod phase_fraction_op;
pub mod progress_reporting_op;
pub mod thermal_diffusion_op;
pub mod tracer_update_op;

// Re-export the operators for easier access
pub use dike_intrusion_op::DikeIntrusionOp;
pub use geotherm_init_op::GeothermInitOp;
pub use phase_fraction_op::PhaseFractionOp;
pub use progress_reporting_op::ProgressReportingOp;
pub use thermal_diffusion_op::ThermalDiffusionOp;
pub use tracer_update_op::TracerUpdateOp;

use crate::sim::simulation::Simulation;

pub trait SimOp {
    /// The name of this operator (for identification and reporting)
    fn name(&self) -> &str;

    /// Called once before the first step
    fn init_sim(&mut self, _sim: &mut Simulation) {
        // Default implementation does nothing
    }

    /// Called every simulation step
    fn update_sim(&mut self, _sim: &mut Simulation) {
        // Default implementation does nothing
    }

    /// Called once after the last step
    fn after_sim(&mut self, _sim: &mut Simulation) {
        // Default implementation does nothing
    }
}

pub struct SimOpHandle {
    pub op: Box<dyn SimOp>,
}

impl SimOpHandle {
    pub fn new(op: Box<dyn SimOp>) -> Self {
        SimOpHandle { op }
    }
}
