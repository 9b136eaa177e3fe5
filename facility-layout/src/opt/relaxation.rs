use log::debug;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand::prelude::SmallRng;

use crate::config::RelaxationMethod;
use crate::entities::{LayoutModel, PlacedDepartment, Placement};

/// Floor for squared center distances in the energy and its gradient.
/// Two coinciding centers would otherwise divide by zero.
const MIN_SQ_DISTANCE: f64 = 1e-9;

const MAX_ITERS: usize = 10_000;
/// Termination tolerance on the absolute change of the gradient norm.
const GRAD_NORM_TOLERANCE: f64 = 1e-14;

const ARMIJO_INITIAL_STEP: f64 = 1.0;
const ARMIJO_SHRINK: f64 = 0.5;
const ARMIJO_C1: f64 = 1e-4;
/// Steps below this make no representable progress, the line search gives up shrinking.
const ARMIJO_MIN_STEP: f64 = 1e-30;

/// Strategy for the continuous relaxation stage: produces candidate center
/// positions, one per department, minimizing the attractor-repeller energy.
/// Non-overlap is not enforced here; start positions are randomized so outer
/// restarts reach distinct local optima.
pub trait RelaxationStrategy {
    fn relax(&self, model: &LayoutModel, alpha: f64, rng: &mut SmallRng) -> Placement;
}

/// Resolves the configured relaxation method to a strategy object.
pub fn strategy_for(method: RelaxationMethod) -> Box<dyn RelaxationStrategy> {
    match method {
        RelaxationMethod::GradientDescent => Box::new(SteepestDescent),
        RelaxationMethod::ProjectedGradient => Box::new(ProjectedDescent),
    }
}

/// Unconstrained steepest descent with Armijo backtracking line search.
pub struct SteepestDescent;

impl RelaxationStrategy for SteepestDescent {
    fn relax(&self, model: &LayoutModel, alpha: f64, rng: &mut SmallRng) -> Placement {
        run(model, alpha, rng, false)
    }
}

/// Same descent, with every iterate projected onto the facility containment box:
/// each center is clamped so the department's half-extent stays inside the facility.
pub struct ProjectedDescent;

impl RelaxationStrategy for ProjectedDescent {
    fn relax(&self, model: &LayoutModel, alpha: f64, rng: &mut SmallRng) -> Placement {
        run(model, alpha, rng, true)
    }
}

fn run(model: &LayoutModel, alpha: f64, rng: &mut SmallRng, project: bool) -> Placement {
    let theta_sq = theta_squared(model);
    let k = alpha * model.total_pair_cost();
    let start = random_start(model, rng);
    let pos = descend(start, model, &theta_sq, k, project);
    to_placement(&pos, model)
}

/// Minimum squared center distance for each pair to be non-overlapping:
/// `¼((w_i+w_j)² + (h_i+h_j)²)`.
fn theta_squared(model: &LayoutModel) -> Array2<f64> {
    let n = model.n();
    let mut theta = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            let w = model.departments[i].width + model.departments[j].width;
            let h = model.departments[i].height + model.departments[j].height;
            theta[[i, j]] = 0.25 * (w * w + h * h);
        }
    }
    theta
}

/// Positions are a flat vector `[x_0, .., x_{n-1}, y_0, .., y_{n-1}]`,
/// drawn uniformly within the facility's half-extents.
fn random_start(model: &LayoutModel, rng: &mut SmallRng) -> Array1<f64> {
    let n = model.n();
    let half_w = 0.5 * model.facility.width;
    let half_h = 0.5 * model.facility.height;
    let mut pos = Array1::zeros(2 * n);
    for i in 0..n {
        pos[i] = rng.random_range(-half_w..half_w);
        pos[n + i] = rng.random_range(-half_h..half_h);
    }
    pos
}

/// Attractor-repeller energy:
/// `Σ_{i<j} c[i,j]·D[i,j] + K·(θ²[i,j]/D[i,j] − 1)` with `D` the clamped
/// squared center distance. Attraction pulls dependent departments together,
/// repulsion penalizes pairs closer than their non-overlap threshold.
fn energy(pos: &Array1<f64>, model: &LayoutModel, theta_sq: &Array2<f64>, k: f64) -> f64 {
    let n = model.n();
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = pos[i] - pos[j];
            let dy = pos[n + i] - pos[n + j];
            let d = (dx * dx + dy * dy).max(MIN_SQ_DISTANCE);
            total += model.dependencies[[i, j]] * d + k * (theta_sq[[i, j]] / d - 1.0);
        }
    }
    total
}

fn energy_gradient(
    pos: &Array1<f64>,
    model: &LayoutModel,
    theta_sq: &Array2<f64>,
    k: f64,
) -> Array1<f64> {
    let n = model.n();
    let mut grad = Array1::zeros(2 * n);
    for t in 0..n {
        let mut gx = 0.0;
        let mut gy = 0.0;
        for j in 0..n {
            if j == t {
                continue;
            }
            let dx = pos[t] - pos[j];
            let dy = pos[n + t] - pos[n + j];
            let d = (dx * dx + dy * dy).max(MIN_SQ_DISTANCE);
            let pull = model.pair_cost(t, j);
            let push = k * theta_sq[[t, j]] / (d * d);
            gx += 2.0 * (pull - push) * dx;
            gy += 2.0 * (pull - push) * dy;
        }
        grad[t] = gx;
        grad[n + t] = gy;
    }
    grad
}

/// Backtracking line search: shrinks the step until the sufficient-decrease
/// condition holds. Returns the step length and the energy at the new point.
fn armijo_line_search(
    pos: &Array1<f64>,
    direction: &Array1<f64>,
    gradient: &Array1<f64>,
    f_current: f64,
    model: &LayoutModel,
    theta_sq: &Array2<f64>,
    k: f64,
) -> (f64, f64) {
    let derphi0 = gradient.dot(direction);
    let mut step = ARMIJO_INITIAL_STEP;
    let mut f_trial = energy(&(pos + &(direction * step)), model, theta_sq, k);
    while f_trial > f_current + ARMIJO_C1 * step * derphi0 {
        step *= ARMIJO_SHRINK;
        if step < ARMIJO_MIN_STEP {
            return (0.0, f_current);
        }
        f_trial = energy(&(pos + &(direction * step)), model, theta_sq, k);
    }
    (step, f_trial)
}

fn descend(
    start: Array1<f64>,
    model: &LayoutModel,
    theta_sq: &Array2<f64>,
    k: f64,
    project: bool,
) -> Array1<f64> {
    let mut pos = start;
    if project {
        project_into_facility(&mut pos, model);
    }
    let mut f = energy(&pos, model, theta_sq, k);
    let mut grad = energy_gradient(&pos, model, theta_sq, k);
    let mut grad_norm = grad.dot(&grad).sqrt();
    let mut norm_change = grad_norm;
    let mut iters = 0;

    debug!("[RELAX] start energy {f:.4}");

    while norm_change > GRAD_NORM_TOLERANCE && iters < MAX_ITERS {
        let prev_norm = grad_norm;
        let direction = grad.mapv(|g| -g);
        let (step, f_new) = armijo_line_search(&pos, &direction, &grad, f, model, theta_sq, k);
        pos += &(&direction * step);
        if project {
            project_into_facility(&mut pos, model);
            f = energy(&pos, model, theta_sq, k);
        } else {
            f = f_new;
        }
        grad = energy_gradient(&pos, model, theta_sq, k);
        grad_norm = grad.dot(&grad).sqrt();
        norm_change = (prev_norm - grad_norm).abs();
        iters += 1;
    }

    if iters == MAX_ITERS {
        debug!("[RELAX] iteration cap reached without convergence, energy {f:.4}");
    } else {
        debug!("[RELAX] converged after {iters} iterations, energy {f:.4}");
    }
    pos
}

fn project_into_facility(pos: &mut Array1<f64>, model: &LayoutModel) {
    let n = model.n();
    for (i, dept) in model.departments.iter().enumerate() {
        let x_bound = (0.5 * (model.facility.width - dept.width)).max(0.0);
        let y_bound = (0.5 * (model.facility.height - dept.height)).max(0.0);
        pos[i] = pos[i].clamp(-x_bound, x_bound);
        pos[n + i] = pos[n + i].clamp(-y_bound, y_bound);
    }
}

fn to_placement(pos: &Array1<f64>, model: &LayoutModel) -> Placement {
    let n = model.n();
    let positions = model
        .departments
        .iter()
        .enumerate()
        .map(|(i, dept)| PlacedDepartment {
            name: dept.name.clone(),
            x: pos[i],
            y: pos[n + i],
            rotated: false,
        })
        .collect();
    Placement { positions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Department, Facility};
    use ndarray::arr2;
    use rand::SeedableRng;

    fn test_model() -> LayoutModel {
        let departments = vec![
            Department::new("a".to_string(), 4.0, 2.0, None).unwrap(),
            Department::new("b".to_string(), 2.0, 4.0, None).unwrap(),
            Department::new("c".to_string(), 3.0, 3.0, None).unwrap(),
        ];
        let facility = Facility::new("plant".to_string(), 20.0, 20.0).unwrap();
        let dependencies = arr2(&[[0.0, 1.0, 2.0], [0.0, 0.0, 0.5], [0.0, 0.0, 0.0]]);
        LayoutModel::new(departments, facility, dependencies).unwrap()
    }

    #[test]
    fn descent_does_not_increase_energy() {
        let model = test_model();
        let theta_sq = theta_squared(&model);
        let k = 0.5 * model.total_pair_cost();
        let mut rng = SmallRng::seed_from_u64(7);

        let start = random_start(&model, &mut rng);
        let f_start = energy(&start, &model, &theta_sq, k);
        let end = descend(start, &model, &theta_sq, k, false);
        let f_end = energy(&end, &model, &theta_sq, k);

        assert!(f_end <= f_start);
    }

    #[test]
    fn energy_is_clamped_for_coinciding_centers() {
        let model = test_model();
        let theta_sq = theta_squared(&model);
        let pos = Array1::zeros(2 * model.n());
        let f = energy(&pos, &model, &theta_sq, 1.0);
        assert!(f.is_finite());
        let grad = energy_gradient(&pos, &model, &theta_sq, 1.0);
        assert!(grad.iter().all(|g| g.is_finite()));
    }

    #[test]
    fn projected_descent_keeps_departments_inside_the_facility() {
        let model = test_model();
        let mut rng = SmallRng::seed_from_u64(3);
        let placement = ProjectedDescent.relax(&model, 0.5, &mut rng);

        for dept in &model.departments {
            let pos = placement.get(&dept.name).unwrap();
            assert!(pos.x - dept.half_width() >= -0.5 * model.facility.width - 1e-9);
            assert!(pos.x + dept.half_width() <= 0.5 * model.facility.width + 1e-9);
            assert!(pos.y - dept.half_height() >= -0.5 * model.facility.height - 1e-9);
            assert!(pos.y + dept.half_height() <= 0.5 * model.facility.height + 1e-9);
        }
    }
}
