//! Configuration types for loading three-body scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`IntegratorConfig`] – physical constant and step-size control limits
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper, plus the initial step size
//!
//! # YAML format
//! The default scenario (Pythagorean-style start, all bodies at rest):
//!
//! ```yaml
//! integrator:
//!   gravitational_constant: 6.67e-11
//!   error_tolerance: 0.005      # max acceptable per-component error
//!   min_step_size: 1.0e-6
//!   max_step_size: 0.132
//! initial_step_size: 0.132
//! bodies:
//!   - m: 3.0e12
//!     x: [460.0, 180.0]
//!     v: [0.0, 0.0]
//!   - m: 4.0e12
//!     x: [580.0, 340.0]
//!     v: [0.0, 0.0]
//!   - m: 5.0e12
//!     x: [460.0, 340.0]
//!     v: [0.0, 0.0]
//! ```
//!
//! The integrator core never validates its inputs. Callers are expected to
//! run [`ScenarioConfig::validate`] before building a simulation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::{Body, NVec2, BODIES};

/// Errors raised while loading or validating a scenario
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Scenario file could not be read
    #[error("failed to read scenario {}: {source}", .path.display())]
    Io {
        /// File that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Scenario text is not valid YAML for [`ScenarioConfig`]
    #[error("invalid scenario YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Exactly three bodies are required
    #[error("expected 3 bodies, found {0}")]
    BodyCount(usize),

    /// A value that must be finite is NaN or infinite
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field
        field: String,
        /// Offending value
        value: f64,
    },

    /// A value that must be strictly positive is not
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field
        field: String,
        /// Offending value
        value: f64,
    },

    /// `min_step_size` exceeds `max_step_size`
    #[error("min_step_size {min} exceeds max_step_size {max}")]
    StepBounds {
        /// Configured minimum
        min: f64,
        /// Configured maximum
        max: f64,
    },
}

/// Process-wide integrator constants, read-only once a run starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Gravitational constant G
    #[serde(alias = "G")]
    pub gravitational_constant: f64,
    /// Maximum acceptable per-component local error (absolute)
    pub error_tolerance: f64,
    /// Step-size floor; reaching it forces acceptance
    pub min_step_size: f64,
    /// Step-size ceiling for growth after accepted steps
    pub max_step_size: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 6.67e-11, // SI
            error_tolerance: 0.005,
            min_step_size: 1e-6,
            max_step_size: 0.132,
        }
    }
}

impl IntegratorConfig {
    /// Check that every constant is finite, the tolerance and step bounds are
    /// positive, and `min_step_size <= max_step_size`.
    ///
    /// `G` may be zero (free motion) but not negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("gravitational_constant", self.gravitational_constant)?;
        if self.gravitational_constant < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "gravitational_constant".to_string(),
                value: self.gravitational_constant,
            });
        }
        positive("error_tolerance", self.error_tolerance)?;
        positive("min_step_size", self.min_step_size)?;
        positive("max_step_size", self.max_step_size)?;
        if self.min_step_size > self.max_step_size {
            return Err(ConfigError::StepBounds {
                min: self.min_step_size,
                max: self.max_step_size,
            });
        }
        Ok(())
    }
}

/// Initial state of one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Mass
    pub m: f64,
    /// Initial position `[x, y]`
    pub x: [f64; 2],
    /// Initial velocity `[vx, vy]`
    #[serde(default)]
    pub v: [f64; 2],
}

impl BodyConfig {
    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        positive(&format!("bodies[{index}].m"), self.m)?;
        for (axis, value) in ["x", "y"].iter().zip(self.x) {
            finite(&format!("bodies[{index}].x.{axis}"), value)?;
        }
        for (axis, value) in ["x", "y"].iter().zip(self.v) {
            finite(&format!("bodies[{index}].v.{axis}"), value)?;
        }
        Ok(())
    }

    /// Runtime body with zero initial acceleration
    pub fn to_body(&self) -> Body {
        Body::new(
            self.m,
            NVec2::new(self.x[0], self.x[1]),
            NVec2::new(self.v[0], self.v[1]),
        )
    }
}

/// Top-level scenario configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Integrator constants
    pub integrator: IntegratorConfig,
    /// Step size of the first attempt
    pub initial_step_size: f64,
    /// Initial conditions, exactly three entries
    pub bodies: Vec<BodyConfig>,
}

impl Default for ScenarioConfig {
    /// Three bodies at rest on a 3-4-5 triangle, masses 3:4:5
    fn default() -> Self {
        let body = |m: f64, x: f64, y: f64| BodyConfig {
            m,
            x: [x, y],
            v: [0.0, 0.0],
        };
        Self {
            integrator: IntegratorConfig::default(),
            initial_step_size: 0.132,
            bodies: vec![
                body(3e12, 500.0 - 40.0, 300.0 - 120.0),
                body(4e12, 500.0 + 80.0, 300.0 + 40.0),
                body(5e12, 500.0 - 40.0, 300.0 + 40.0),
            ],
        }
    }
}

impl ScenarioConfig {
    /// Parse a scenario from YAML text (not validated)
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a scenario file (not validated)
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Serialize back to YAML
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the whole scenario
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.integrator.validate()?;
        positive("initial_step_size", self.initial_step_size)?;
        if self.bodies.len() != BODIES {
            return Err(ConfigError::BodyCount(self.bodies.len()));
        }
        for (i, body) in self.bodies.iter().enumerate() {
            body.validate(i)?;
        }
        Ok(())
    }

    /// Runtime bodies in configuration order
    pub fn to_bodies(&self) -> Result<[Body; BODIES], ConfigError> {
        match self.bodies.as_slice() {
            [a, b, c] => Ok([a.to_body(), b.to_body(), c.to_body()]),
            other => Err(ConfigError::BodyCount(other.len())),
        }
    }
}

fn finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            field: field.to_string(),
            value,
        })
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            field: field.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_is_valid() {
        let scenario = ScenarioConfig::default();
        scenario.validate().unwrap();

        let bodies = scenario.to_bodies().unwrap();
        assert_eq!(bodies[0].x, NVec2::new(460.0, 180.0));
        assert_eq!(bodies[1].x, NVec2::new(580.0, 340.0));
        assert_eq!(bodies[2].x, NVec2::new(460.0, 340.0));
        assert_eq!(bodies[2].m, 5e12);
    }

    #[test]
    fn yaml_round_trip_preserves_scenario() {
        let scenario = ScenarioConfig::default();
        let text = scenario.to_yaml_string().unwrap();
        let parsed = ScenarioConfig::from_yaml_str(&text).unwrap();
        assert_eq!(parsed, scenario);
    }

    #[test]
    fn parses_partial_yaml_with_defaults() {
        let text = r#"
integrator:
  G: 1.0
  error_tolerance: 1.0e-9
bodies:
  - m: 1.0
    x: [-1.0, 0.0]
    v: [0.0, -0.5]
  - m: 1.0
    x: [1.0, 0.0]
    v: [0.0, 0.5]
  - m: 1.0
    x: [0.0, 50.0]
"#;
        let scenario = ScenarioConfig::from_yaml_str(text).unwrap();
        scenario.validate().unwrap();

        assert_eq!(scenario.integrator.gravitational_constant, 1.0);
        assert_eq!(scenario.integrator.error_tolerance, 1e-9);
        assert_eq!(scenario.integrator.max_step_size, 0.132);
        assert_eq!(scenario.initial_step_size, 0.132);
        assert_eq!(scenario.bodies[2].v, [0.0, 0.0]);
    }

    #[test]
    fn rejects_wrong_body_count() {
        let mut scenario = ScenarioConfig::default();
        scenario.bodies.pop();
        assert!(matches!(scenario.validate(), Err(ConfigError::BodyCount(2))));
        assert!(matches!(scenario.to_bodies(), Err(ConfigError::BodyCount(2))));
    }

    #[test]
    fn rejects_non_positive_mass_and_tolerance() {
        let mut scenario = ScenarioConfig::default();
        scenario.bodies[1].m = 0.0;
        match scenario.validate() {
            Err(ConfigError::NonPositive { field, .. }) => assert_eq!(field, "bodies[1].m"),
            other => panic!("unexpected: {:?}", other),
        }

        let mut scenario = ScenarioConfig::default();
        scenario.integrator.error_tolerance = -1.0;
        assert!(matches!(scenario.validate(), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn rejects_inverted_step_bounds() {
        let config = IntegratorConfig {
            min_step_size: 1.0,
            max_step_size: 0.5,
            ..IntegratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::StepBounds { .. })));
    }

    #[test]
    fn rejects_non_finite_position() {
        let mut scenario = ScenarioConfig::default();
        scenario.bodies[0].x[1] = f64::NAN;
        match scenario.validate() {
            Err(ConfigError::NonFinite { field, .. }) => assert_eq!(field, "bodies[0].x.y"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn zero_gravity_is_allowed() {
        let config = IntegratorConfig {
            gravitational_constant: 0.0,
            ..IntegratorConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ScenarioConfig::from_yaml_file("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }
}
