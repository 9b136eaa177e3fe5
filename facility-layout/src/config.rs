use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// Configuration for a full solver run.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct SolverConfig {
    /// Repulsion strength of the relaxation stage, must lie in (0, 1]
    pub alpha: f64,
    /// Bonus weight added to the dependency of every same-group pair, as a
    /// fraction of the largest dependency entry. If undefined, grouping is disabled.
    pub grouping_weight: Option<f64>,
    /// Which strategy solves the continuous relaxation stage
    pub relaxation_method: RelaxationMethod,
    /// Which of the successful restarts is reported
    pub selection_criterion: SelectionCriterion,
    /// Number of randomized restarts of the relax -> triangulate -> exact pipeline
    pub n_restarts: usize,
    /// Cap on the gap-closing repair loop after selection
    pub repair_iterations: usize,
    /// Seed for the PRNG. If undefined, the run is non-deterministic using entropy
    pub prng_seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            grouping_weight: None,
            relaxation_method: RelaxationMethod::GradientDescent,
            selection_criterion: SelectionCriterion::Cost,
            n_restarts: 10,
            repair_iterations: 5,
            prng_seed: Some(0),
        }
    }
}

impl SolverConfig {
    /// Rejects out-of-range parameters before any solving starts.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(LayoutError::Config(format!(
                "alpha must lie in (0, 1], got {}",
                self.alpha
            )));
        }
        if let Some(gw) = self.grouping_weight {
            if !(0.0..=1.0).contains(&gw) {
                return Err(LayoutError::Config(format!(
                    "grouping_weight must lie in [0, 1], got {gw}"
                )));
            }
        }
        if self.n_restarts == 0 {
            return Err(LayoutError::Config(
                "n_restarts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Strategy selector for the continuous relaxation stage.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationMethod {
    /// Unconstrained steepest descent with Armijo backtracking line search
    GradientDescent,
    /// Same objective and line search, with every step projected onto the
    /// facility containment box
    ProjectedGradient,
}

/// Criterion by which the best of the successful restarts is selected.
/// The optimization objective itself is always cost; this only affects which
/// of several already-optimal-for-their-relations solutions is reported.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCriterion {
    /// Minimum total weighted rectilinear distance
    Cost,
    /// Minimum occupied bounding area
    Area,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let mut config = SolverConfig::default();
        config.alpha = 0.0;
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.alpha = 1.5;
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.grouping_weight = Some(-0.1);
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.n_restarts = 0;
        assert!(config.validate().is_err());
    }
}
