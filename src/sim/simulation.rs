//! The simulation driver: owns the grid, field store, tracer arena, and
//! clock, and runs the operator pipeline for a precomputed number of
//! steps.
//!
//! Each step: reset the scratch buffer, run every operator in
//! registration order (intrusion, phase, diffusion, boundary, tracers -
//! the standard pipeline), push a step record, swap the temperature
//! buffers, advance the clock. The step count is fixed up front from the
//! run length and the (stability-derived) time step, so the loop has no
//! mid-run stopping-condition drift.

use crate::constants::{SECONDS_PER_YEAR, YEARS_PER_KYR};
use crate::diffusion::{check_timestep, stable_timestep_s};
use crate::dike::Dike;
use crate::error::SimError;
use crate::field::CrustFields;
use crate::grid::Grid;
use crate::material::{profile, MaterialKind, MaterialProfile};
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::tracers::TracerField;

/// Elapsed run time and the fixed step size.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct SimClock {
    /// Elapsed physical time in seconds
    pub time_s: f64,
    /// Fixed step size in seconds
    pub dt_s: f64,
}

impl SimClock {
    pub fn new(dt_s: f64) -> Self {
        Self { time_s: 0.0, dt_s }
    }

    pub fn time_yr(&self) -> f64 {
        self.time_s / SECONDS_PER_YEAR
    }

    pub fn time_kyr(&self) -> f64 {
        self.time_yr() / YEARS_PER_KYR
    }

    pub fn advance(&mut self) {
        self.time_s += self.dt_s;
    }
}

/// Run configuration, in the style of a props object: the caller builds
/// the grid and the operator pipeline, the constructor validates.
pub struct SimProps {
    pub name: &'static str,
    pub grid: Grid,
    pub host_material: MaterialKind,
    /// Total run length in kyr
    pub max_time_kyr: f64,
    /// Fixed step size; `None` derives the largest stable step
    pub dt_s: Option<f64>,
    pub ops: Vec<SimOpHandle>,
    pub debug: bool,
}

/// One entry of the per-step log: what happened, when, and the running
/// injected-volume total. Plain data, serializable, owned by the driver.
#[derive(Clone, Debug, serde::Serialize)]
pub struct StepRecord {
    pub step: i32,
    pub time_yr: f64,
    pub time_kyr: f64,
    /// The dike that fired this step, if any
    pub dike: Option<Dike>,
    /// Cumulative injected volume after this step
    pub injected_volume_m3: f64,
}

/// Read-only copy of the current field state.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FieldSnapshot {
    pub nx: usize,
    pub nz: usize,
    pub x_m: Vec<f64>,
    pub z_m: Vec<f64>,
    pub temp_c: Vec<f64>,
    pub solid_frac: Vec<f64>,
    pub melt_frac: Vec<f64>,
}

/// Read-only copy of the active tracer population.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TracerSnapshot {
    pub x_m: Vec<f64>,
    pub z_m: Vec<f64>,
    pub temp_c: Vec<f64>,
    pub solid_frac: Vec<f64>,
}

pub struct Simulation {
    pub name: String,
    pub grid: Grid,
    pub fields: CrustFields,
    pub tracers: TracerField,
    pub clock: SimClock,
    pub host_material: MaterialKind,
    pub step: i32,
    pub sim_steps: i32,
    pub injected_volume_m3: f64,
    /// Dike emplaced during the current step, consumed by the record
    pub last_intrusion: Option<Dike>,
    pub debug: bool,
    pub ops: Vec<Box<dyn SimOp>>,
    records: Vec<StepRecord>,
}

impl Simulation {
    /// Validate the configuration and allocate the run state.
    ///
    /// The time step is taken from the props when supplied (and checked
    /// against the explicit-scheme stability bound) or derived from the
    /// bound directly. The step count is `ceil(max_time / dt)`.
    ///
    /// # Errors
    /// `Configuration` for a negative run length, `StabilityViolation`
    /// for an over-bound step size.
    pub fn new(props: SimProps) -> Result<Simulation, SimError> {
        if !(props.max_time_kyr >= 0.0) || !props.max_time_kyr.is_finite() {
            return Err(SimError::Configuration {
                reason: format!(
                    "max_time_kyr must be a non-negative finite number (got {})",
                    props.max_time_kyr
                ),
            });
        }

        let host = profile(props.host_material);
        let dt_s = match props.dt_s {
            Some(dt_s) => {
                check_timestep(dt_s, &props.grid, host)?;
                dt_s
            }
            None => stable_timestep_s(&props.grid, host),
        };

        let max_time_s = props.max_time_kyr * YEARS_PER_KYR * SECONDS_PER_YEAR;
        let sim_steps = (max_time_s / dt_s).ceil() as i32;

        let mut fields = CrustFields::new(&props.grid);
        fields.fill_material(host);
        fields.sync_phase_with_temperature();

        let ops = props.ops.into_iter().map(|handle| handle.op).collect();

        Ok(Simulation {
            name: props.name.to_string(),
            fields,
            tracers: TracerField::new(),
            clock: SimClock::new(dt_s),
            host_material: props.host_material,
            step: 0,
            sim_steps,
            injected_volume_m3: 0.0,
            last_intrusion: None,
            debug: props.debug,
            ops,
            records: Vec::new(),
            grid: props.grid,
        })
    }

    pub fn host_profile(&self) -> &'static MaterialProfile {
        profile(self.host_material)
    }

    /// Run the whole simulation: operator init hooks, the fixed step
    /// loop, then the after hooks.
    pub fn run(&mut self) {
        self.simulate_init();
        for _ in 0..self.sim_steps {
            self.step_once();
        }
        self.simulate_end();
    }

    /// One step of the standard cycle: scratch reset, operator pass,
    /// record, buffer swap, clock advance.
    pub fn step_once(&mut self) {
        self.fields.reset_next_temperature();
        self.last_intrusion = None;

        let mut ops = std::mem::take(&mut self.ops);
        for op in ops.iter_mut() {
            op.update_sim(self);
        }
        self.ops = ops;

        self.fields.swap_temperature();
        self.clock.advance();
        self.step += 1;

        let record = StepRecord {
            step: self.step,
            time_yr: self.clock.time_yr(),
            time_kyr: self.clock.time_kyr(),
            dike: self.last_intrusion,
            injected_volume_m3: self.injected_volume_m3,
        };
        self.records.push(record);
    }

    /// Run a single step with caller-supplied operators (for tests).
    pub fn step_with_ops(&mut self, ops: &mut [&mut dyn SimOp]) {
        self.fields.reset_next_temperature();
        self.last_intrusion = None;

        for op in ops.iter_mut() {
            op.update_sim(self);
        }

        self.fields.swap_temperature();
        self.clock.advance();
        self.step += 1;
    }

    fn simulate_init(&mut self) {
        let mut ops = std::mem::take(&mut self.ops);
        for op in ops.iter_mut() {
            op.init_sim(self);
        }
        self.ops = ops;
    }

    fn simulate_end(&mut self) {
        let mut ops = std::mem::take(&mut self.ops);
        for op in ops.iter_mut() {
            op.after_sim(self);
        }
        self.ops = ops;
    }

    /// The per-step log so far.
    pub fn step_records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn injected_volume_m3(&self) -> f64 {
        self.injected_volume_m3
    }

    /// Injection rate averaged over the elapsed run time.
    pub fn injection_rate_m3_per_yr(&self) -> f64 {
        let elapsed_yr = self.clock.time_yr();
        if elapsed_yr > 0.0 {
            self.injected_volume_m3 / elapsed_yr
        } else {
            0.0
        }
    }

    /// Copy of the current temperature and phase state.
    pub fn field_snapshot(&self) -> FieldSnapshot {
        let temp_c = self.fields.temp_c.as_slice().to_vec();
        let solid_frac: Vec<f64> = self.fields.solid_frac.as_slice().to_vec();
        let melt_frac = solid_frac.iter().map(|&frac| 1.0 - frac).collect();
        FieldSnapshot {
            nx: self.grid.nx,
            nz: self.grid.nz,
            x_m: self.grid.x_m.clone(),
            z_m: self.grid.z_m.clone(),
            temp_c,
            solid_frac,
            melt_frac,
        }
    }

    /// Copy of the active tracer population.
    pub fn tracer_snapshot(&self) -> TracerSnapshot {
        let mut snapshot = TracerSnapshot {
            x_m: Vec::with_capacity(self.tracers.len()),
            z_m: Vec::with_capacity(self.tracers.len()),
            temp_c: Vec::with_capacity(self.tracers.len()),
            solid_frac: Vec::with_capacity(self.tracers.len()),
        };
        for tracer in self.tracers.iter_active() {
            snapshot.x_m.push(tracer.x_m);
            snapshot.z_m.push(tracer.z_m);
            snapshot.temp_c.push(tracer.temp_c);
            snapshot.solid_frac.push(tracer.solid_frac);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn bare_props(max_time_kyr: f64, dt_s: Option<f64>) -> SimProps {
        SimProps {
            name: "test",
            grid: Grid::new(10, 10, 10.0, 10.0).unwrap(),
            host_material: MaterialKind::Granitic,
            max_time_kyr,
            dt_s,
            ops: vec![],
            debug: false,
        }
    }

    #[test]
    fn test_new_derives_stable_timestep() {
        let sim = Simulation::new(bare_props(1.0, None)).unwrap();
        let bound = stable_timestep_s(&sim.grid, sim.host_profile());
        assert_eq!(sim.clock.dt_s, bound);
        assert_eq!(
            sim.sim_steps,
            (1.0 * YEARS_PER_KYR * SECONDS_PER_YEAR / bound).ceil() as i32
        );
    }

    #[test]
    fn test_new_rejects_unstable_timestep() {
        let grid = Grid::new(10, 10, 10.0, 10.0).unwrap();
        let bound = stable_timestep_s(&grid, profile(MaterialKind::Granitic));
        let result = Simulation::new(bare_props(1.0, Some(bound * 2.0)));
        assert!(matches!(result, Err(SimError::StabilityViolation { .. })));
    }

    #[test]
    fn test_new_rejects_negative_run_length() {
        let result = Simulation::new(bare_props(-1.0, None));
        assert!(matches!(result, Err(SimError::Configuration { .. })));
    }

    #[test]
    fn test_run_executes_fixed_step_count() {
        let mut sim = Simulation::new(bare_props(0.01, None)).unwrap();
        let expected = sim.sim_steps;
        sim.run();
        assert_eq!(sim.step, expected);
        assert_eq!(sim.step_records().len(), expected as usize);
    }

    #[test]
    fn test_clock_advances_by_dt() {
        let mut sim = Simulation::new(bare_props(1.0, None)).unwrap();
        let dt_s = sim.clock.dt_s;
        sim.step_once();
        sim.step_once();
        assert_eq!(sim.clock.time_s, 2.0 * dt_s);
        assert_eq!(sim.step_records()[1].step, 2);
    }

    #[test]
    fn test_injection_rate_with_zero_elapsed_time() {
        let sim = Simulation::new(bare_props(1.0, None)).unwrap();
        assert_eq!(sim.injection_rate_m3_per_yr(), 0.0);
    }

    #[test]
    fn test_snapshots_copy_state() {
        let mut sim = Simulation::new(bare_props(0.0, None)).unwrap();
        sim.fields.temp_c.fill(300.0);
        sim.fields.sync_phase_with_temperature();

        let snapshot = sim.field_snapshot();
        assert_eq!(snapshot.temp_c.len(), 100);
        assert_eq!(snapshot.temp_c[0], 300.0);
        assert!(snapshot.solid_frac[0] > 0.999);
        assert!(snapshot.melt_frac[0] < 0.001);

        // Mutating the simulation does not touch the snapshot
        sim.fields.temp_c.fill(900.0);
        assert_eq!(snapshot.temp_c[0], 300.0);
    }
}
