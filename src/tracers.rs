//! Lagrangian marker particles recording local thermal history.
//!
//! Tracers live in a grow-only arena: a contiguous buffer whose slot
//! indices are assigned monotonically and never reused or reordered, so
//! an index handed out at insertion stays valid for the whole run. A
//! batch of tracers is seeded into every dike at emplacement; each step
//! they re-sample the field at their (fixed) position by nearest-cell
//! lookup.

use crate::dike::Dike;
use crate::field::ScalarField2D;
use crate::grid::Grid;
use crate::phase_fraction::solid_fraction;
use rand::rngs::StdRng;
use rand::Rng;

/// Position sampling tries this many rejection draws per tracer before
/// falling back to the dike center.
const MAX_PLACEMENT_ATTEMPTS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Tracer {
    pub x_m: f64,
    pub z_m: f64,
    /// Last sampled temperature
    pub temp_c: f64,
    /// Last sampled solid fraction
    pub solid_frac: f64,
    /// Real marker, as opposed to a placeholder slot
    pub active: bool,
}

/// Index-stable growable tracer storage.
#[derive(Clone, Debug, Default)]
pub struct TracerField {
    slots: Vec<Tracer>,
}

impl TracerField {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Total slots ever allocated.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|t| t.active).count()
    }

    pub fn get(&self, index: usize) -> Option<&Tracer> {
        self.slots.get(index)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Tracer> {
        self.slots.iter().filter(|t| t.active)
    }

    /// Seed one batch of tracers inside a dike footprint, tagged with the
    /// dike's emplacement temperature. Positions are rejection-sampled
    /// uniformly over the dike's bounding box from the shared sequential
    /// generator, clamped into the domain. Returns the half-open slot
    /// range of the new batch.
    pub fn insert_batch(
        &mut self,
        dike: &Dike,
        count: usize,
        rng: &mut StdRng,
        grid: &Grid,
    ) -> (usize, usize) {
        let start = self.slots.len();
        let reach_m = 0.5 * (dike.width_m * dike.width_m + dike.thickness_m * dike.thickness_m).sqrt();
        let melt_solid_frac = solid_fraction(dike.temp_c);

        for _ in 0..count {
            let mut x_m = dike.center_x_m;
            let mut z_m = dike.center_z_m;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let try_x = rng.random_range(dike.center_x_m - reach_m..dike.center_x_m + reach_m);
                let try_z = rng.random_range(dike.center_z_m - reach_m..dike.center_z_m + reach_m);
                if dike.contains(try_x, try_z) {
                    x_m = try_x;
                    z_m = try_z;
                    break;
                }
            }

            // Keep markers inside the domain even for clipped dikes
            let half_dx = 0.5 * grid.dx_m;
            let half_dz = 0.5 * grid.dz_m;
            x_m = x_m.clamp(half_dx, grid.width_m() - half_dx);
            z_m = z_m.clamp(half_dz, grid.depth_m() - half_dz);

            self.slots.push(Tracer {
                x_m,
                z_m,
                temp_c: dike.temp_c,
                solid_frac: melt_solid_frac,
                active: true,
            });
        }

        (start, self.slots.len())
    }

    /// Refresh every active tracer's temperature and phase snapshot by
    /// nearest-cell sampling. Callers pass the freshly stepped scratch
    /// temperature so markers see the same state the next step starts
    /// from.
    pub fn update(&mut self, temp: &ScalarField2D, solid: &ScalarField2D, grid: &Grid) {
        for tracer in self.slots.iter_mut().filter(|t| t.active) {
            if let Some((i, k)) = grid.nearest_cell(tracer.x_m, tracer.z_m) {
                tracer.temp_c = temp.get(i, k);
                tracer.solid_frac = solid.get(i, k);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dike::DikeShape;
    use rand::SeedableRng;

    fn test_grid() -> Grid {
        Grid::new(50, 50, 10.0, 10.0).unwrap()
    }

    fn test_dike() -> Dike {
        Dike {
            shape: DikeShape::Lens,
            width_m: 200.0,
            thickness_m: 40.0,
            center_x_m: 250.0,
            center_z_m: 250.0,
            tilt_rad: 0.2,
            temp_c: 1150.0,
        }
    }

    #[test]
    fn test_batch_count_and_slot_ranges() {
        let grid = test_grid();
        let mut rng = StdRng::seed_from_u64(7);
        let mut tracers = TracerField::new();

        let (a_start, a_end) = tracers.insert_batch(&test_dike(), 50, &mut rng, &grid);
        let (b_start, b_end) = tracers.insert_batch(&test_dike(), 50, &mut rng, &grid);

        assert_eq!((a_start, a_end), (0, 50));
        assert_eq!((b_start, b_end), (50, 100));
        assert_eq!(tracers.len(), 100);
        assert_eq!(tracers.active_count(), 100);
    }

    #[test]
    fn test_indices_stay_valid_across_growth() {
        let grid = test_grid();
        let mut rng = StdRng::seed_from_u64(7);
        let mut tracers = TracerField::new();

        tracers.insert_batch(&test_dike(), 10, &mut rng, &grid);
        let remembered = *tracers.get(3).unwrap();

        // Grow the arena far past its original capacity
        for _ in 0..40 {
            tracers.insert_batch(&test_dike(), 25, &mut rng, &grid);
        }

        assert_eq!(*tracers.get(3).unwrap(), remembered);
        assert_eq!(tracers.len(), 10 + 40 * 25);
    }

    #[test]
    fn test_positions_fall_inside_the_dike() {
        let grid = test_grid();
        let dike = test_dike();
        let mut rng = StdRng::seed_from_u64(42);
        let mut tracers = TracerField::new();

        tracers.insert_batch(&dike, 200, &mut rng, &grid);

        let inside = tracers
            .iter_active()
            .filter(|t| dike.contains(t.x_m, t.z_m))
            .count();
        // Rejection sampling occasionally exhausts its attempts and falls
        // back to the center, which is also inside
        assert_eq!(inside, 200);
    }

    #[test]
    fn test_fresh_batch_reports_melt_state() {
        let grid = test_grid();
        let mut rng = StdRng::seed_from_u64(3);
        let mut tracers = TracerField::new();

        tracers.insert_batch(&test_dike(), 5, &mut rng, &grid);

        for tracer in tracers.iter_active() {
            assert_eq!(tracer.temp_c, 1150.0);
            assert!(tracer.solid_frac < 0.2);
        }
    }

    #[test]
    fn test_update_samples_nearest_cell() {
        let grid = test_grid();
        let mut rng = StdRng::seed_from_u64(11);
        let mut tracers = TracerField::new();
        tracers.insert_batch(&test_dike(), 20, &mut rng, &grid);

        let mut temp = ScalarField2D::new(grid.nx, grid.nz);
        let mut solid = ScalarField2D::new(grid.nx, grid.nz);
        for k in 0..grid.nz {
            for i in 0..grid.nx {
                temp.set(i, k, (i * 1000 + k) as f64);
                solid.set(i, k, (k as f64) / grid.nz as f64);
            }
        }

        tracers.update(&temp, &solid, &grid);

        for tracer in tracers.iter_active() {
            let (i, k) = grid.nearest_cell(tracer.x_m, tracer.z_m).unwrap();
            assert_eq!(tracer.temp_c, temp.get(i, k));
            assert_eq!(tracer.solid_frac, solid.get(i, k));
        }
    }

    #[test]
    fn test_same_seed_same_positions() {
        let grid = test_grid();
        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        let mut tracers_a = TracerField::new();
        let mut tracers_b = TracerField::new();

        tracers_a.insert_batch(&test_dike(), 30, &mut rng_a, &grid);
        tracers_b.insert_batch(&test_dike(), 30, &mut rng_b, &grid);

        for idx in 0..30 {
            assert_eq!(tracers_a.get(idx), tracers_b.get(idx));
        }
    }
}
