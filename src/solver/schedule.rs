use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Step size of the local search as a function of the iteration index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StepSchedule {
    /// `max(floor, initial × ratio^iteration)`
    Geometric { initial: f64, ratio: f64, floor: f64 },
    /// `max(floor, initial × (1 - progress))`, `progress = min(1, iteration / horizon)`
    Linear { initial: f64, floor: f64, horizon: u32 },
}

impl StepSchedule {
    #[must_use]
    pub fn step_size(&self, iteration: u32) -> f64 {
        match *self {
            StepSchedule::Geometric {
                initial,
                ratio,
                floor,
            } => (initial * ratio.powf(f64::from(iteration))).max(floor),
            StepSchedule::Linear {
                initial,
                floor,
                horizon,
            } => (initial * (1.0 - progress(iteration, horizon))).max(floor),
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` for a non-positive initial step,
    /// a negative floor, or a geometric ratio outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (initial, floor) = match *self {
            StepSchedule::Geometric {
                initial,
                ratio,
                floor,
            } => {
                if !(ratio > 0.0 && ratio <= 1.0) {
                    return Err(ConfigError::InvalidParameter(format!(
                        "step ratio must be in (0, 1], got {ratio}"
                    )));
                }
                (initial, floor)
            }
            StepSchedule::Linear { initial, floor, .. } => (initial, floor),
        };
        if !(initial.is_finite() && initial > 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "initial step size must be positive and finite, got {initial}"
            )));
        }
        if !(floor.is_finite() && floor >= 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "step floor must be non-negative and finite, got {floor}"
            )));
        }
        Ok(())
    }
}

/// Relaxation of the trace-trace spacing over the first `horizon` iterations.
///
/// The multiplier moves linearly from `start_multiplier` to `end_multiplier`
/// and stays at `end_multiplier` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingSchedule {
    pub start_multiplier: f64,
    pub end_multiplier: f64,
    pub horizon: u32,
}

impl SpacingSchedule {
    /// A schedule that always uses the preferred spacing.
    #[must_use]
    pub fn constant() -> Self {
        Self {
            start_multiplier: 1.0,
            end_multiplier: 1.0,
            horizon: 0,
        }
    }

    #[must_use]
    pub fn multiplier(&self, iteration: u32) -> f64 {
        let t = progress(iteration, self.horizon);
        self.start_multiplier + (self.end_multiplier - self.start_multiplier) * t
    }

    #[must_use]
    pub fn effective_spacing(&self, base: f64, iteration: u32) -> f64 {
        base * self.multiplier(iteration)
    }

    /// Whether the multiplier has reached its final value.
    #[must_use]
    pub fn is_settled(&self, iteration: u32) -> bool {
        iteration >= self.horizon
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` if a multiplier is negative or
    /// not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("start_multiplier", self.start_multiplier),
            ("end_multiplier", self.end_multiplier),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidParameter(format!(
                    "spacing {name} must be non-negative and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SpacingSchedule {
    fn default() -> Self {
        Self {
            start_multiplier: 3.0,
            end_multiplier: 1.0,
            horizon: 1000,
        }
    }
}

fn progress(iteration: u32, horizon: u32) -> f64 {
    if horizon == 0 {
        1.0
    } else {
        (f64::from(iteration) / f64::from(horizon)).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn geometric_decay_with_floor() {
        let s = StepSchedule::Geometric {
            initial: 0.5,
            ratio: 0.98,
            floor: 1e-3,
        };
        assert_abs_diff_eq!(s.step_size(0), 0.5);
        assert_abs_diff_eq!(s.step_size(1), 0.49, epsilon = 1e-12);
        assert!(s.step_size(10) < s.step_size(9));
        assert_abs_diff_eq!(s.step_size(10_000), 1e-3);
    }

    #[test]
    fn linear_decay_reaches_floor_at_horizon() {
        let s = StepSchedule::Linear {
            initial: 0.1,
            floor: 0.001,
            horizon: 1000,
        };
        assert_abs_diff_eq!(s.step_size(0), 0.1);
        assert_abs_diff_eq!(s.step_size(500), 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(s.step_size(1000), 0.001);
        assert_abs_diff_eq!(s.step_size(5000), 0.001);
    }

    #[test]
    fn spacing_relaxes_from_three_to_one() {
        let s = SpacingSchedule::default();
        assert_abs_diff_eq!(s.effective_spacing(10.0, 0), 30.0);
        assert_abs_diff_eq!(s.effective_spacing(10.0, 500), 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.effective_spacing(10.0, 1000), 10.0);
        assert_abs_diff_eq!(s.effective_spacing(10.0, 2000), 10.0);
        assert!(!s.is_settled(999));
        assert!(s.is_settled(1000));
    }

    #[test]
    fn constant_spacing_is_settled_immediately() {
        let s = SpacingSchedule::constant();
        assert!(s.is_settled(0));
        assert_abs_diff_eq!(s.effective_spacing(7.0, 0), 7.0);
    }

    #[test]
    fn invalid_schedules_are_rejected() {
        let bad_ratio = StepSchedule::Geometric {
            initial: 0.5,
            ratio: 1.5,
            floor: 0.0,
        };
        assert!(bad_ratio.validate().is_err());
        let bad_initial = StepSchedule::Linear {
            initial: 0.0,
            floor: 0.0,
            horizon: 10,
        };
        assert!(bad_initial.validate().is_err());
        let bad_spacing = SpacingSchedule {
            start_multiplier: -1.0,
            ..SpacingSchedule::default()
        };
        assert!(bad_spacing.validate().is_err());
    }
}
