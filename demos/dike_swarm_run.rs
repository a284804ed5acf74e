/// Full dike-swarm experiment: a 1 km x 1 km crustal section intruded
/// every kyr for 20 kyr, with progress reporting and a JSON snapshot of
/// the final field and tracer state written to the working directory.
use dike_swarm_rust::dike::DikeShape;
use dike_swarm_rust::grid::Grid;
use dike_swarm_rust::intrusion::IntrusionParams;
use dike_swarm_rust::material::MaterialKind;
use dike_swarm_rust::sim::sim_op::{
    DikeIntrusionOp, GeothermInitOp, PhaseFractionOp, ProgressReportingOp, ThermalDiffusionOp,
    TracerUpdateOp,
};
use dike_swarm_rust::sim::{SimOpHandle, SimProps, Simulation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let grid = Grid::new(40, 40, 25.0, 25.0)?;

    let intrusion = IntrusionParams {
        interval_kyr: 1.0,
        width_m: 300.0,
        thickness_m: 40.0,
        temp_c: 1150.0,
        shape: DikeShape::Lens,
        center_margin_frac: 0.25,
        max_tilt_rad: 0.5,
        tracers_per_dike: 50,
        seed: 1,
    };

    let props = SimProps {
        name: "DikeSwarm",
        host_material: MaterialKind::Granitic,
        max_time_kyr: 20.0,
        dt_s: None,
        ops: vec![
            GeothermInitOp::handle(0.0, 30.0),
            DikeIntrusionOp::handle(intrusion, &grid)?,
            PhaseFractionOp::handle(),
            ThermalDiffusionOp::handle(&grid, 0.0, 30.0),
            TracerUpdateOp::handle(),
            SimOpHandle::new(Box::new(ProgressReportingOp::new())),
        ],
        debug: true,
        grid,
    };

    let mut sim = Simulation::new(props)?;
    sim.run();

    // Dump the final state for external plotting
    let field_json = serde_json::to_string(&sim.field_snapshot())?;
    std::fs::write("dike_swarm_field.json", field_json)?;
    let tracer_json = serde_json::to_string(&sim.tracer_snapshot())?;
    std::fs::write("dike_swarm_tracers.json", tracer_json)?;
    println!(
        "wrote dike_swarm_field.json and dike_swarm_tracers.json ({} tracers)",
        sim.tracers.len()
    );

    Ok(())
}
