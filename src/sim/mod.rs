pub mod sim_op;
pub mod simulation;

pub use sim_op::{SimOp, SimOpHandle};
pub use simulation::{FieldSnapshot, SimClock, SimProps, Simulation, StepRecord, TracerSnapshot};
