#[cfg(test)]
mod tests {
    use facility_layout::LayoutError;
    use facility_layout::config::{SelectionCriterion, SolverConfig};
    use facility_layout::entities::{Department, Facility, LayoutModel, RelationMatrices};
    use facility_layout::opt::controller::LayoutOptimizer;
    use facility_layout::opt::exact::solve_exact;
    use facility_layout::opt::gap::close_gaps;
    use facility_layout::opt::relaxation::{RelaxationStrategy, SteepestDescent};
    use facility_layout::opt::triangulation::triangulate;
    use facility_layout::util::assertions;

    use float_cmp::approx_eq;
    use ndarray::Array2;
    use rand::SeedableRng;
    use rand::prelude::SmallRng;
    use test_case::test_case;

    fn build_model(
        departments: &[(&str, f64, f64)],
        facility: (f64, f64),
        dependencies: &[(usize, usize, f64)],
    ) -> LayoutModel {
        let n = departments.len();
        let departments = departments
            .iter()
            .map(|&(name, w, h)| Department::new(name.to_string(), w, h, None).unwrap())
            .collect();
        let mut matrix = Array2::zeros((n, n));
        for &(i, j, c) in dependencies {
            matrix[[i, j]] = c;
        }
        LayoutModel::new(
            departments,
            Facility::new("plant".to_string(), facility.0, facility.1).unwrap(),
            matrix,
        )
        .unwrap()
    }

    fn config(n_restarts: usize) -> SolverConfig {
        SolverConfig {
            n_restarts,
            prng_seed: Some(0),
            ..SolverConfig::default()
        }
    }

    /// Two departments (4,2) and (2,4) with unit dependency in a roomy
    /// facility: the optimal distance is the minimal separation achievable in
    /// any orientation, which is exactly 2.
    #[test]
    fn scenario_two_departments_reach_minimal_separation() {
        let model = build_model(
            &[("a", 4.0, 2.0), ("b", 2.0, 4.0)],
            (20.0, 20.0),
            &[(0, 1, 1.0)],
        );
        let mut optimizer = LayoutOptimizer::new(model, config(4)).unwrap();
        let report = optimizer.solve().unwrap();

        assert_eq!(report.n_feasible, 4);
        assert!(approx_eq!(
            f64,
            report.solution.objective,
            2.0,
            epsilon = 1e-6
        ));
    }

    /// With an all-zero dependency matrix any feasible non-overlapping
    /// placement is optimal, so the reported objective must be 0.
    #[test]
    fn scenario_zero_dependencies_yield_zero_objective() {
        let model = build_model(
            &[("a", 2.0, 2.0), ("b", 3.0, 1.0), ("c", 1.0, 3.0)],
            (10.0, 10.0),
            &[],
        );
        let mut optimizer = LayoutOptimizer::new(model, config(3)).unwrap();
        let report = optimizer.solve().unwrap();

        assert!(approx_eq!(
            f64,
            report.solution.objective,
            0.0,
            epsilon = 1e-9
        ));
        // the layout must still be non-overlapping and contained
        let solution = &report.solution;
        assert!(assertions::placement_within_facility(
            &solution.placement,
            &solution.model,
            1e-6
        ));
    }

    /// Facility strictly smaller than any two departments side by side in
    /// every orientation: every restart is infeasible and the run terminates
    /// with NoSolutionFound.
    #[test]
    fn scenario_undersized_facility_fails_every_restart() {
        let model = build_model(
            &[("a", 4.0, 4.0), ("b", 4.0, 4.0)],
            (5.0, 5.0),
            &[(0, 1, 1.0)],
        );
        let mut optimizer = LayoutOptimizer::new(model, config(3)).unwrap();

        assert!(matches!(
            optimizer.solve(),
            Err(LayoutError::NoSolutionFound)
        ));
    }

    #[test]
    fn exact_stage_output_satisfies_its_own_relations() {
        let model = build_model(
            &[("a", 4.0, 2.0), ("b", 2.0, 4.0), ("c", 3.0, 3.0)],
            (20.0, 20.0),
            &[(0, 1, 1.0), (0, 2, 2.0), (1, 2, 0.5)],
        );
        let mut relations = RelationMatrices::empty(3);
        relations.alpha[[0, 1]] = true;
        relations.beta[[0, 2]] = true;
        relations.beta[[2, 1]] = true;

        let exact = solve_exact(&model, &relations).unwrap();

        assert!(assertions::placement_is_feasible(
            &exact.placement,
            &exact.model,
            &relations,
            1e-6
        ));
    }

    #[test]
    fn exact_stage_reports_infeasible_relations() {
        // both departments forced left of each other
        let model = build_model(
            &[("a", 4.0, 4.0), ("b", 4.0, 4.0)],
            (5.0, 5.0),
            &[(0, 1, 1.0)],
        );
        let mut relations = RelationMatrices::empty(2);
        relations.alpha[[0, 1]] = true;

        assert!(matches!(
            solve_exact(&model, &relations),
            Err(LayoutError::Infeasible(_))
        ));
    }

    #[test_case(0; "seed 0")]
    #[test_case(17; "seed 17")]
    #[test_case(42; "seed 42")]
    fn triangulation_is_deterministic_and_satisfies_the_invariant(seed: u64) {
        let model = build_model(
            &[
                ("a", 4.0, 2.0),
                ("b", 2.0, 4.0),
                ("c", 3.0, 3.0),
                ("d", 1.0, 5.0),
            ],
            (25.0, 25.0),
            &[(0, 1, 1.0), (1, 2, 3.0), (2, 3, 0.5)],
        );
        let mut rng = SmallRng::seed_from_u64(seed);
        let relaxed = SteepestDescent.relax(&model, 0.5, &mut rng);

        let relations = triangulate(&relaxed);
        assert!(relations.invariant_holds());
        assert_eq!(relations, triangulate(&relaxed));
    }

    /// Applying the gap heuristic twice in a row without an intervening
    /// re-solve must report no change on the second call.
    #[test]
    fn gap_heuristic_reaches_its_fixed_point_on_solved_layouts() {
        let model = build_model(
            &[("a", 4.0, 2.0), ("b", 2.0, 4.0), ("c", 3.0, 3.0)],
            (20.0, 20.0),
            &[(0, 1, 1.0), (1, 2, 2.0)],
        );
        let mut relations = RelationMatrices::empty(3);
        relations.alpha[[0, 1]] = true;
        relations.alpha[[1, 2]] = true;
        relations.beta[[0, 2]] = true;

        let exact = solve_exact(&model, &relations).unwrap();

        let _ = close_gaps(&exact.placement, &exact.model, &mut relations);
        assert!(!close_gaps(&exact.placement, &exact.model, &mut relations));
        assert!(relations.invariant_holds());
    }

    #[test]
    fn selection_by_area_picks_a_feasible_solution() {
        let model = build_model(
            &[("a", 4.0, 2.0), ("b", 2.0, 4.0), ("c", 2.0, 2.0)],
            (15.0, 15.0),
            &[(0, 1, 1.0), (1, 2, 1.0)],
        );
        let config = SolverConfig {
            selection_criterion: SelectionCriterion::Area,
            n_restarts: 3,
            prng_seed: Some(1),
            ..SolverConfig::default()
        };
        let mut optimizer = LayoutOptimizer::new(model, config).unwrap();
        let report = optimizer.solve().unwrap();

        let solution = &report.solution;
        assert!(solution.bounding.area > 0.0);
        assert!(assertions::placement_within_facility(
            &solution.placement,
            &solution.model,
            1e-6
        ));
    }
}
