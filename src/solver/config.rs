//! Solver configuration.

use serde::{Deserialize, Serialize};

use super::schedule::{SpacingSchedule, StepSchedule};
use crate::cost::{ElbowCostParams, OffsetCostParams};
use crate::error::ConfigError;

/// Configuration for [`OffsetSolver`](super::OffsetSolver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OffsetSolverConfig {
    /// Maximum number of local-search steps.
    pub max_iterations: u32,

    /// Relative improvement below which a step counts as stagnant.
    pub stagnation_threshold: f64,

    /// Consecutive stagnant steps before stopping.
    pub stagnation_limit: u32,

    pub step_schedule: StepSchedule,

    /// Route nearly axis-aligned pairs with a U-bend detour.
    pub use_u_bends: bool,

    /// Push enclosing U-bends outward once after initialization.
    pub resolve_nesting: bool,

    /// Refine offsets by local search. When disabled the initial geometry is
    /// final and the first step finishes the solve.
    pub local_search: bool,

    pub cost: OffsetCostParams,
}

impl Default for OffsetSolverConfig {
    fn default() -> Self {
        Self::full()
    }
}

impl OffsetSolverConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct double-bend paths with no U-bends, no nesting fix and no local
    /// search.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            use_u_bends: false,
            resolve_nesting: false,
            local_search: false,
            ..Self::full()
        }
    }

    /// U-bends, nesting fix and local search.
    #[must_use]
    pub fn full() -> Self {
        Self {
            max_iterations: 200,
            stagnation_threshold: 0.001,
            stagnation_limit: 10,
            step_schedule: StepSchedule::Geometric {
                initial: 0.5,
                ratio: 0.98,
                floor: 1e-3,
            },
            use_u_bends: true,
            resolve_nesting: true,
            local_search: true,
            cost: OffsetCostParams::default(),
        }
    }

    #[must_use]
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_stagnation(mut self, threshold: f64, limit: u32) -> Self {
        self.stagnation_threshold = threshold;
        self.stagnation_limit = limit;
        self
    }

    #[must_use]
    pub fn with_step_schedule(mut self, schedule: StepSchedule) -> Self {
        self.step_schedule = schedule;
        self
    }

    #[must_use]
    pub fn with_u_bends(mut self, enable: bool) -> Self {
        self.use_u_bends = enable;
        self
    }

    #[must_use]
    pub fn with_nesting_fix(mut self, enable: bool) -> Self {
        self.resolve_nesting = enable;
        self
    }

    #[must_use]
    pub fn with_local_search(mut self, enable: bool) -> Self {
        self.local_search = enable;
        self
    }

    #[must_use]
    pub fn with_cost_params(mut self, cost: OffsetCostParams) -> Self {
        self.cost = cost;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_stagnation(self.stagnation_threshold, self.stagnation_limit)?;
        self.step_schedule.validate()?;
        let c = &self.cost;
        validate_non_negative(&[
            ("boundary_margin", c.boundary_margin),
            ("boundary_weight", c.boundary_weight),
            ("trace_hit_penalty", c.trace_hit_penalty),
            ("trace_weight", c.trace_weight),
            ("obstacle_hit_penalty", c.obstacle_hit_penalty),
            ("obstacle_weight", c.obstacle_weight),
        ])
    }
}

/// Configuration for [`ElbowSolver`](super::ElbowSolver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElbowSolverConfig {
    pub max_iterations: u32,
    pub stagnation_threshold: f64,
    pub stagnation_limit: u32,
    pub step_schedule: StepSchedule,
    pub spacing_schedule: SpacingSchedule,
    /// Elbows are kept at least this far inside the bounds.
    pub elbow_margin: f64,
    pub cost: ElbowCostParams,
}

impl Default for ElbowSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            stagnation_threshold: 0.001,
            stagnation_limit: 10,
            step_schedule: StepSchedule::Linear {
                initial: 0.1,
                floor: 0.001,
                horizon: 1000,
            },
            spacing_schedule: SpacingSchedule::default(),
            elbow_margin: 0.001,
            cost: ElbowCostParams::default(),
        }
    }
}

impl ElbowSolverConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_stagnation(mut self, threshold: f64, limit: u32) -> Self {
        self.stagnation_threshold = threshold;
        self.stagnation_limit = limit;
        self
    }

    #[must_use]
    pub fn with_step_schedule(mut self, schedule: StepSchedule) -> Self {
        self.step_schedule = schedule;
        self
    }

    #[must_use]
    pub fn with_spacing_schedule(mut self, schedule: SpacingSchedule) -> Self {
        self.spacing_schedule = schedule;
        self
    }

    /// Sets the elbow angle (degrees) below which the angle penalty applies.
    #[must_use]
    pub fn with_min_angle(mut self, degrees: f64) -> Self {
        self.cost.min_angle_deg = degrees;
        self
    }

    #[must_use]
    pub fn with_cost_params(mut self, cost: ElbowCostParams) -> Self {
        self.cost = cost;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_stagnation(self.stagnation_threshold, self.stagnation_limit)?;
        self.step_schedule.validate()?;
        self.spacing_schedule.validate()?;
        if !(0.0..=180.0).contains(&self.cost.min_angle_deg) {
            return Err(ConfigError::InvalidParameter(format!(
                "min_angle_deg must be within [0, 180], got {}",
                self.cost.min_angle_deg
            )));
        }
        let c = &self.cost;
        validate_non_negative(&[
            ("elbow_margin", self.elbow_margin),
            ("angle_weight", c.angle_weight),
            ("aversion_numerator", c.aversion_numerator),
            ("aversion_weight", c.aversion_weight),
            ("out_of_area_margin", c.out_of_area_margin),
            ("out_of_area_penalty", c.out_of_area_penalty),
            ("depth_weight", c.depth_weight),
            ("contact_tolerance_sq", c.contact_tolerance_sq),
            ("hit_penalty", c.hit_penalty),
            ("collision_weight", c.collision_weight),
        ])?;
        if !(c.aversion_softening.is_finite() && c.aversion_softening > 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "aversion_softening must be positive, got {}",
                c.aversion_softening
            )));
        }
        Ok(())
    }
}

fn validate_stagnation(threshold: f64, limit: u32) -> Result<(), ConfigError> {
    if !(threshold.is_finite() && threshold >= 0.0) {
        return Err(ConfigError::InvalidParameter(format!(
            "stagnation_threshold must be non-negative, got {threshold}"
        )));
    }
    if limit == 0 {
        return Err(ConfigError::InvalidParameter(
            "stagnation_limit must be at least 1".into(),
        ));
    }
    Ok(())
}

fn validate_non_negative(fields: &[(&str, f64)]) -> Result<(), ConfigError> {
    for &(name, value) in fields {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "{name} must be non-negative and finite, got {value}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        OffsetSolverConfig::full().validate().unwrap();
        OffsetSolverConfig::minimal().validate().unwrap();
        ElbowSolverConfig::default().validate().unwrap();
        assert_eq!(OffsetSolverConfig::default(), OffsetSolverConfig::full());
        assert!(!OffsetSolverConfig::minimal().local_search);
    }

    #[test]
    fn builder_sets_fields() {
        let config = OffsetSolverConfig::new()
            .with_max_iterations(50)
            .with_stagnation(0.01, 3)
            .with_u_bends(false);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.stagnation_limit, 3);
        assert!(!config.use_u_bends);

        let elbow = ElbowSolverConfig::new().with_min_angle(120.0);
        assert!((elbow.cost.min_angle_deg - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_limit = OffsetSolverConfig::new().with_stagnation(0.001, 0);
        assert!(zero_limit.validate().is_err());

        let negative_weight = OffsetSolverConfig::new().with_cost_params(OffsetCostParams {
            trace_weight: -1.0,
            ..OffsetCostParams::default()
        });
        let err = negative_weight.validate().unwrap_err();
        assert!(err.to_string().contains("trace_weight"));

        assert!(ElbowSolverConfig::new().with_min_angle(200.0).validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: OffsetSolverConfig =
            serde_json::from_str(r#"{ "maxIterations": 20, "useUBends": false }"#).unwrap();
        assert_eq!(config.max_iterations, 20);
        assert!(!config.use_u_bends);
        assert!(config.local_search);

        let elbow: ElbowSolverConfig = serde_json::from_str(
            r#"{ "stepSchedule": { "kind": "geometric", "initial": 0.2, "ratio": 0.9, "floor": 0.0 } }"#,
        )
        .unwrap();
        assert!(matches!(elbow.step_schedule, StepSchedule::Geometric { .. }));
    }
}
