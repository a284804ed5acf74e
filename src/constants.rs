// Physical constants for the crustal intrusion simulation.
// All field math runs in SI units (meters, seconds) with temperature in °C;
// the phase-fraction calibration below is stated in the same unit.

pub const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;
pub const YEARS_PER_KYR: f64 = 1_000.0;
pub const TO_KELVIN: f64 = 273.15;

// Host rock defaults (granitic upper crust)
pub const HOST_ROCK_DENSITY_KG_M3: f64 = 2700.0;
pub const HOST_ROCK_SPECIFIC_HEAT_J_PER_KG_K: f64 = 1000.0;
pub const HOST_ROCK_CONDUCTIVITY_W_M_K: f64 = 2.5;

// Molten basalt filling a fresh dike
pub const MAGMA_DENSITY_KG_M3: f64 = 2750.0;
pub const MAGMA_SPECIFIC_HEAT_J_PER_KG_K: f64 = 1100.0;
pub const MAGMA_CONDUCTIVITY_W_M_K: f64 = 1.6;
pub const LATENT_HEAT_FUSION_J_PER_KG: f64 = 300_000.0;

// Crystallinity closure calibration: temperature where the rock is half
// crystallized, and the width of the logistic ramp around it.
// Constraint: the lagged latent source is non-amplifying only while
// L / (cp * 4 * width) stays below 1; these values keep it near 0.75.
pub const PHASE_MIDPOINT_TEMP_C: f64 = 1000.0;
pub const PHASE_WIDTH_C: f64 = 100.0;

// Default thermal boundary state
pub const SURFACE_TEMP_C: f64 = 0.0;
pub const GEOTHERMAL_GRADIENT_C_PER_KM: f64 = 30.0;

// Default intrusion event settings
pub const DIKE_TEMP_C: f64 = 1150.0;

// Out-of-plane depth assigned to one grid cell when converting a rasterized
// dike footprint into an inserted volume.
pub const DIKE_UNIT_DEPTH_M: f64 = 1.0;

// Margin applied to the explicit-scheme stability bound when the time step
// is derived automatically. Violating the bound makes the stencil diverge,
// so the derived dt sits well inside it.
pub const STABILITY_SAFETY_FACTOR: f64 = 20.0;
