use log::{info, warn};
use ordered_float::NotNan;
use rand::SeedableRng;
use rand::prelude::SmallRng;

use crate::LayoutError;
use crate::config::{SelectionCriterion, SolverConfig};
use crate::entities::{LayoutModel, Placement, RelationMatrices, Solution};
use crate::opt::exact::solve_exact;
use crate::opt::gap::close_gaps;
use crate::opt::relaxation::{RelaxationStrategy, strategy_for};
use crate::opt::triangulation::triangulate;

/// Outcome of a full multi-restart run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub solution: Solution,
    /// Continuous first-stage positions of the restart that produced the selected solution
    pub relaxed: Placement,
    /// Restarts that produced a feasible layout
    pub n_feasible: usize,
    pub n_restarts: usize,
}

/// Drives randomized restarts of the relax-triangulate-exact pipeline,
/// selects the best feasible result and repairs it with the gap-closing
/// heuristic.
pub struct LayoutOptimizer {
    pub model: LayoutModel,
    pub config: SolverConfig,
    /// SmallRng is a fast, non-cryptographic PRNG <https://rust-random.github.io/book/guide-rngs.html>
    pub rng: SmallRng,
    strategy: Box<dyn RelaxationStrategy>,
}

struct Restart {
    solution: Solution,
    relations: RelationMatrices,
    relaxed: Placement,
}

impl LayoutOptimizer {
    pub fn new(mut model: LayoutModel, config: SolverConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        if let Some(weight) = config.grouping_weight {
            if model.apply_grouping(weight) {
                info!("[CTRL] departments grouped, same-group dependencies raised");
            } else {
                info!("[CTRL] grouping requested but no department carries a group id, skipped");
            }
        }
        let rng = match config.prng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Ok(Self {
            model,
            config,
            rng,
            strategy: strategy_for(config.relaxation_method),
        })
    }

    /// Runs all restarts and the repair loop. Fails with
    /// [`LayoutError::NoSolutionFound`] when every restart is infeasible.
    pub fn solve(&mut self) -> Result<RunReport, LayoutError> {
        let restarts = self.run_restarts();
        let n_feasible = restarts.iter().flatten().count();
        info!(
            "[CTRL] {n_feasible}/{} restarts produced a feasible layout",
            self.config.n_restarts
        );

        let best = self
            .select_best(restarts)
            .ok_or(LayoutError::NoSolutionFound)?;

        let repaired = self.repair(best.solution, best.relations);
        let solution = undo_facility_rotation(repaired, &self.model);

        Ok(RunReport {
            solution,
            relaxed: best.relaxed,
            n_feasible,
            n_restarts: self.config.n_restarts,
        })
    }

    /// One entry per restart; `None` marks an infeasible one. Infeasibility is
    /// recovered here, it never aborts the run.
    fn run_restarts(&mut self) -> Vec<Option<Restart>> {
        let n_restarts = self.config.n_restarts;
        let mut restarts = Vec::with_capacity(n_restarts);
        for i in 0..n_restarts {
            // every other restart relaxes within the rotated facility; the
            // exact stage always starts from the original orientation and
            // owns the facility rotation through its own indicator
            let mut relax_model = self.model.clone();
            if i % 2 == 1 {
                relax_model.rotate_facility();
            }
            let relaxed = self
                .strategy
                .relax(&relax_model, self.config.alpha, &mut self.rng);
            let relations = triangulate(&relaxed);

            match solve_exact(&self.model, &relations) {
                Ok(exact) => {
                    let solution = Solution::new(exact.placement, exact.model, exact.objective);
                    info!(
                        "[CTRL] restart {}/{n_restarts}: feasible, objective {:.3}, bounding area {:.3}",
                        i + 1,
                        solution.objective,
                        solution.bounding.area
                    );
                    restarts.push(Some(Restart {
                        solution,
                        relations,
                        relaxed,
                    }));
                }
                Err(err) => {
                    info!("[CTRL] restart {}/{n_restarts}: {err}", i + 1);
                    restarts.push(None);
                }
            }
        }
        restarts
    }

    /// Minimum by the configured criterion over the successful restarts.
    /// The criterion only decides which of the already-optimal-for-their-relations
    /// solutions is reported; the solve objective is always cost.
    fn select_best(&self, restarts: Vec<Option<Restart>>) -> Option<Restart> {
        let criterion = self.config.selection_criterion;
        restarts.into_iter().flatten().min_by_key(|restart| {
            let value = match criterion {
                SelectionCriterion::Cost => restart.solution.objective,
                SelectionCriterion::Area => restart.solution.bounding.area,
            };
            NotNan::new(value).expect("solution metrics are finite")
        })
    }

    /// Bounded repair loop: tighten relations, re-solve, keep the new solution
    /// only when its objective strictly improves on the best so far. The
    /// heuristic's fixed point (no change) stops the loop early.
    fn repair(&self, selected: Solution, mut relations: RelationMatrices) -> Solution {
        let mut best = selected.clone();
        let mut current = selected;
        for pass in 0..self.config.repair_iterations {
            if !close_gaps(&current.placement, &current.model, &mut relations) {
                break;
            }
            info!("[CTRL] gap heuristic tightened relations in pass {pass}, re-solving");
            match solve_exact(&current.model, &relations) {
                Ok(exact) => {
                    let solution = Solution::new(exact.placement, exact.model, exact.objective);
                    if solution.objective < best.objective {
                        info!(
                            "[CTRL] repair improved objective {:.3} -> {:.3}",
                            best.objective, solution.objective
                        );
                        best = solution.clone();
                    }
                    current = solution;
                }
                Err(err) => {
                    // tightened relations are satisfied by the current layout,
                    // so this is not expected; keep the best solution found
                    warn!("[CTRL] re-solve after gap tightening failed: {err}");
                    break;
                }
            }
        }
        best
    }
}

/// Flips the layout back when the solved facility orientation differs from the
/// input orientation: coordinates are mirrored along the diagonal and all
/// dimensions swapped, so callers always receive coordinates in their own
/// facility frame.
fn undo_facility_rotation(mut solution: Solution, original: &LayoutModel) -> Solution {
    if solution.model.facility.width == original.facility.width
        && solution.model.facility.height == original.facility.height
    {
        return solution;
    }
    solution.model.rotate_facility();
    for dept in &mut solution.model.departments {
        dept.rotate();
    }
    for pos in &mut solution.placement.positions {
        std::mem::swap(&mut pos.x, &mut pos.y);
        pos.rotated = !pos.rotated;
    }
    Solution::new(solution.placement, solution.model, solution.objective)
}
