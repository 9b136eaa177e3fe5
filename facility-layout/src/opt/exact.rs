use std::collections::HashMap;

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution as LpSolution, SolverModel, Variable,
    constraint, highs, variable,
};
use itertools::Itertools;
use log::debug;

use crate::LayoutError;
use crate::entities::{LayoutModel, PlacedDepartment, Placement, RelationMatrices};
use crate::util::assertions;

/// Result of the exact placement stage: the placement, the model with
/// department and facility dimensions rewritten to the orientations the solver
/// chose, and the achieved objective.
#[derive(Debug, Clone)]
pub struct ExactPlacement {
    pub placement: Placement,
    pub model: LayoutModel,
    pub objective: f64,
}

/// Computes exact center coordinates minimizing the total weighted rectilinear
/// distance `Σ_{i<j} c[i,j]·(|x_i−x_j| + |y_i−y_j|)`, subject to facility
/// containment, the non-overlap relations asserted by `relations`, and optional
/// 90° rotation of each department and of the facility.
///
/// The problem is formulated as a mixed-integer linear program and dispatched
/// to HiGHS. Absolute values are linearized through auxiliary non-negative
/// distance variables bounded below by both signed differences; non-overlap
/// uses a big-M equal to the facility's relevant extent, so only the asserted
/// relation of each pair is active. Any non-optimal terminal solver status maps
/// to [`LayoutError::Infeasible`]: the caller must treat it as "no layout
/// exists under these relations", not as a transient fault.
pub fn solve_exact(
    model: &LayoutModel,
    relations: &RelationMatrices,
) -> Result<ExactPlacement, LayoutError> {
    let n = model.n();
    debug_assert_eq!(relations.n(), n);

    let w_f = model.facility.width;
    let h_f = model.facility.height;
    let width = |i: usize| model.departments[i].width;
    let height = |i: usize| model.departments[i].height;

    let mut vars = ProblemVariables::new();

    // center coordinates, free within the facility-centered frame
    let x: Vec<Variable> = (0..n)
        .map(|i| vars.add(variable().name(format!("x_{i}"))))
        .collect();
    let y: Vec<Variable> = (0..n)
        .map(|i| vars.add(variable().name(format!("y_{i}"))))
        .collect();

    // rectilinear distance per pair, one variable per axis
    let mut d_x: HashMap<(usize, usize), Variable> = HashMap::new();
    let mut d_y: HashMap<(usize, usize), Variable> = HashMap::new();
    for (i, j) in (0..n).tuple_combinations() {
        d_x.insert((i, j), vars.add(variable().min(0.0).name(format!("dx_{i}_{j}"))));
        d_y.insert((i, j), vars.add(variable().min(0.0).name(format!("dy_{i}_{j}"))));
    }

    // rotation indicators: r = 1 keeps the input orientation, r = 0 rotates by 90°
    let r: Vec<Variable> = (0..n)
        .map(|i| vars.add(variable().binary().name(format!("r_{i}"))))
        .collect();
    let r_f = vars.add(variable().binary().name("r_f"));
    // effective facility extents under the chosen orientation
    let w_hat = vars.add(variable().min(0.0).name("w_f_hat"));
    let h_hat = vars.add(variable().min(0.0).name("h_f_hat"));

    // effective department extents: a linear blend of the two orientations
    let eff_w = |i: usize| -> Expression { (width(i) - height(i)) * r[i] + height(i) };
    let eff_h = |i: usize| -> Expression { (height(i) - width(i)) * r[i] + width(i) };

    let mut objective = Expression::from(0.0);
    for (i, j) in (0..n).tuple_combinations() {
        let c = model.dependencies[[i, j]];
        if c != 0.0 {
            objective += c * d_x[&(i, j)];
            objective += c * d_y[&(i, j)];
        }
    }

    debug!("[EXACT] formulating MILP: {n} departments, {} binaries", n + 1);

    let mut milp = vars.minimise(objective).using(highs);
    milp = milp.set_option("output_flag", false);

    // distance linearization: d >= both signed differences
    for (i, j) in (0..n).tuple_combinations() {
        let dx = d_x[&(i, j)];
        let dy = d_y[&(i, j)];
        milp = milp.with(constraint!(dx >= x[i] - x[j]));
        milp = milp.with(constraint!(dx >= x[j] - x[i]));
        milp = milp.with(constraint!(dy >= y[i] - y[j]));
        milp = milp.with(constraint!(dy >= y[j] - y[i]));
    }

    // containment: each department's effective extent stays inside the
    // effective facility extent (constraints scaled by 2 to avoid fractions)
    for i in 0..n {
        let ew = eff_w(i);
        milp = milp.with(constraint!(2.0 * x[i] + w_hat - ew >= 0.0));
        let ew = eff_w(i);
        milp = milp.with(constraint!(2.0 * x[i] - w_hat + ew <= 0.0));
        let eh = eff_h(i);
        milp = milp.with(constraint!(2.0 * y[i] + h_hat - eh >= 0.0));
        let eh = eff_h(i);
        milp = milp.with(constraint!(2.0 * y[i] - h_hat + eh <= 0.0));
    }

    // non-overlap: the asserted relation of each ordered pair is active, all
    // others are disabled by a big-M equal to the facility's relevant extent
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let alpha_slack = if relations.alpha[[i, j]] { 0.0 } else { 2.0 };
            let ew_i = eff_w(i);
            let ew_j = eff_w(j);
            milp = milp.with(constraint!(
                2.0 * x[i] + ew_i - 2.0 * x[j] + ew_j - alpha_slack * w_hat <= 0.0
            ));
            let beta_slack = if relations.beta[[i, j]] { 0.0 } else { 2.0 };
            let eh_i = eff_h(i);
            let eh_j = eff_h(j);
            milp = milp.with(constraint!(
                2.0 * y[i] + eh_i - 2.0 * y[j] + eh_j - beta_slack * h_hat <= 0.0
            ));
        }
    }

    // rotation consistency: facility extents are a blend of its two orientations
    let w_tie = (w_f - h_f) * r_f;
    milp = milp.with(constraint!(w_hat - w_tie == h_f));
    let h_tie = (h_f - w_f) * r_f;
    milp = milp.with(constraint!(h_hat - h_tie == w_f));

    let lp_solution = milp.solve().map_err(|err| match err {
        ResolutionError::Infeasible => LayoutError::Infeasible(
            "the relation matrices admit no placement inside the facility".to_string(),
        ),
        other => LayoutError::Infeasible(format!(
            "exact solver terminated without an optimal solution: {other}"
        )),
    })?;

    let facility_rotated = lp_solution.value(r_f) < 0.5;
    let mut solved_model = model.clone();
    if facility_rotated {
        solved_model.rotate_facility();
    }

    let mut positions = Vec::with_capacity(n);
    for (i, dept) in model.departments.iter().enumerate() {
        let rotated = lp_solution.value(r[i]) < 0.5;
        if rotated {
            solved_model.departments[i].rotate();
        }
        positions.push(PlacedDepartment {
            name: dept.name.clone(),
            x: lp_solution.value(x[i]),
            y: lp_solution.value(y[i]),
            rotated,
        });
    }
    let placement = Placement { positions };

    let objective: f64 = (0..n)
        .tuple_combinations()
        .map(|(i, j)| {
            let dx = (lp_solution.value(x[i]) - lp_solution.value(x[j])).abs();
            let dy = (lp_solution.value(y[i]) - lp_solution.value(y[j])).abs();
            model.dependencies[[i, j]] * (dx + dy)
        })
        .sum();

    debug!("[EXACT] optimal, objective {objective:.4}, facility rotated: {facility_rotated}");
    debug_assert!(assertions::placement_is_feasible(
        &placement,
        &solved_model,
        relations,
        1e-6
    ));

    Ok(ExactPlacement {
        placement,
        model: solved_model,
        objective,
    })
}
