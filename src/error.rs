//! Error types for simulation construction and validation.
//!
//! Every variant is produced while a run is being configured; the per-step
//! loop itself is a closed numerical procedure with no recoverable errors.
//! Nothing here is retried - an invalid configuration has no meaningful
//! partial result, so callers abort.

use std::error::Error;
use std::fmt;

/// Errors surfaced by grid, engine, and simulation constructors.
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// Grid dimensions below the stencil minimum, non-positive spacing,
    /// negative run length, or degenerate physical parameters.
    Configuration {
        /// Human-readable description of the rejected setting.
        reason: String,
    },
    /// The configured time step exceeds the explicit-scheme stability
    /// bound. Running anyway would grow temperature without bound, so the
    /// run is refused up front instead of diverging silently.
    StabilityViolation {
        /// The requested time step in seconds.
        dt_s: f64,
        /// The largest stable time step for this grid and material.
        max_dt_s: f64,
    },
    /// A dike placement region that falls outside the simulated domain.
    Geometry {
        /// Human-readable description of the rejected geometry.
        reason: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            Self::StabilityViolation { dt_s, max_dt_s } => {
                write!(
                    f,
                    "time step {dt_s:.3e} s exceeds the stability bound {max_dt_s:.3e} s"
                )
            }
            Self::Geometry { reason } => {
                write!(f, "invalid intrusion geometry: {reason}")
            }
        }
    }
}

impl Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_carry_detail() {
        let config = SimError::Configuration {
            reason: "nx must be at least 3 (got 2)".to_string(),
        };
        assert!(config.to_string().contains("nx must be at least 3"));

        let stability = SimError::StabilityViolation {
            dt_s: 2.0e7,
            max_dt_s: 5.4e6,
        };
        let text = stability.to_string();
        assert!(text.contains("stability bound"));
        assert!(text.contains("5.400e6"));

        let geometry = SimError::Geometry {
            reason: "placement margin leaves no interior region".to_string(),
        };
        assert!(geometry.to_string().contains("placement margin"));
    }

    #[test]
    fn test_error_trait_object() {
        let err: Box<dyn Error> = Box::new(SimError::Configuration {
            reason: "dx_m must be positive".to_string(),
        });
        assert!(err.source().is_none());
    }
}
