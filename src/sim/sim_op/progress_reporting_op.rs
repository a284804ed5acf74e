//! Console progress reporting, gated to percent milestones of the run.
//! Optional - the numerical pipeline never depends on it.

use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::simulation::Simulation;
use colored::Colorize;

pub struct ProgressReportingOp {
    pub report_frequency_percent: f64,
    last_milestone: i32,
}

impl ProgressReportingOp {
    pub fn new() -> Self {
        Self {
            report_frequency_percent: 10.0, // Report every 10% of the run
            last_milestone: -1,
        }
    }

    pub fn with_frequency(report_frequency_percent: f64) -> Self {
        Self {
            report_frequency_percent,
            last_milestone: -1,
        }
    }

    pub fn handle() -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new()))
    }

    fn milestone(&self, sim: &Simulation) -> i32 {
        if sim.sim_steps == 0 {
            return 0;
        }
        let progress_percent = (sim.step as f64 / sim.sim_steps as f64) * 100.0;
        (progress_percent / self.report_frequency_percent).floor() as i32
    }

    fn report(&self, sim: &Simulation, label: &str) {
        let temp = &sim.fields.temp_c;
        let molten_cells = sim
            .fields
            .solid_frac
            .as_slice()
            .iter()
            .filter(|&&frac| frac < 0.5)
            .count();
        let fired = sim
            .step_records()
            .iter()
            .filter(|record| record.dike.is_some())
            .count();

        println!(
            "{} {:>5} | {:>9.2} kyr | T {:>7.1}/{:>7.1}/{:>7.1} °C | {:>4} molten cells | {:>3} dikes | {:>10.0} m³",
            label.cyan().bold(),
            sim.step,
            sim.clock.time_kyr(),
            temp.min_value(),
            temp.mean(),
            temp.max_value(),
            molten_cells,
            fired,
            sim.injected_volume_m3
        );
    }
}

impl Default for ProgressReportingOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp for ProgressReportingOp {
    fn name(&self) -> &str {
        "ProgressReporting"
    }

    fn init_sim(&mut self, sim: &mut Simulation) {
        println!(
            "{} {} | {} x {} cells | dt = {:.3e} s | {} steps",
            "▶".green().bold(),
            sim.name.bold(),
            sim.grid.nx,
            sim.grid.nz,
            sim.clock.dt_s,
            sim.sim_steps
        );
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        let milestone = self.milestone(sim);
        if milestone > self.last_milestone {
            self.last_milestone = milestone;
            self.report(sim, "step");
        }
    }

    fn after_sim(&mut self, sim: &mut Simulation) {
        self.report(sim, "done");
        println!(
            "{} injected {:.0} m³ over {:.2} kyr ({:.2} m³/yr) | {} tracers",
            "✔".green().bold(),
            sim.injected_volume_m3,
            sim.clock.time_kyr(),
            sim.injection_rate_m3_per_yr(),
            sim.tracers.len()
        );
    }
}
