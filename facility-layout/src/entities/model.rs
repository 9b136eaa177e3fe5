use anyhow::{Result, ensure};
use itertools::Itertools;
use ndarray::Array2;

use crate::entities::{Department, Facility};

/// Immutable-by-convention geometry and cost model of a single run:
/// department dimensions, facility dimensions and the pairwise dependency matrix.
///
/// The controller clones this per restart, so no stage ever mutates the state
/// another stage is working on. The effective dependency of a pair `{i, j}` is
/// the upper-triangle entry `c[i, j]` with `i < j`; the loader is expected to
/// have folded the directed matrix accordingly. The diagonal is unused.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutModel {
    pub departments: Vec<Department>,
    pub facility: Facility,
    pub dependencies: Array2<f64>,
}

impl LayoutModel {
    pub fn new(
        departments: Vec<Department>,
        facility: Facility,
        dependencies: Array2<f64>,
    ) -> Result<Self> {
        let n = departments.len();
        ensure!(n > 0, "the model must contain at least one department");
        ensure!(
            dependencies.dim() == (n, n),
            "dependency matrix must be {n}x{n}, got {:?}",
            dependencies.dim()
        );
        ensure!(
            dependencies.iter().all(|&c| c >= 0.0 && c.is_finite()),
            "dependency entries must be finite and non-negative"
        );
        ensure!(
            departments.iter().map(|d| &d.name).all_unique(),
            "department names must be unique"
        );
        Ok(Self {
            departments,
            facility,
            dependencies,
        })
    }

    /// Number of departments.
    pub fn n(&self) -> usize {
        self.departments.len()
    }

    /// Effective cost of the unordered pair `{i, j}`: the upper-triangle entry.
    pub fn pair_cost(&self, i: usize, j: usize) -> f64 {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.dependencies[[lo, hi]]
    }

    /// Sum of all pair costs, the attraction total the repulsion is scaled against.
    pub fn total_pair_cost(&self) -> f64 {
        (0..self.n())
            .tuple_combinations()
            .map(|(i, j)| self.dependencies[[i, j]])
            .sum()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.departments.iter().position(|d| d.name == name)
    }

    /// Swaps the facility's width and height.
    pub fn rotate_facility(&mut self) {
        self.facility.rotate();
    }

    /// Adds `weight x max(c)` to the dependency of every same-group pair, so
    /// grouped departments are pulled together by both solver stages.
    /// Departments without a group id are assigned fresh singleton groups.
    ///
    /// Returns `false` (and leaves the model untouched) when no department
    /// carries a group id at all.
    pub fn apply_grouping(&mut self, weight: f64) -> bool {
        if self.departments.iter().all(|d| d.group.is_none()) {
            return false;
        }
        let bonus = weight * self.dependencies.iter().copied().fold(0.0, f64::max);

        let mut next_group = self
            .departments
            .iter()
            .filter_map(|d| d.group)
            .max()
            .unwrap_or(0)
            + 1;
        for dept in &mut self.departments {
            if dept.group.is_none() {
                dept.group = Some(next_group);
                next_group += 1;
            }
        }

        let n = self.n();
        for (i, j) in (0..n).tuple_combinations() {
            if self.departments[i].group == self.departments[j].group {
                self.dependencies[[i, j]] += bonus;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn dept(name: &str, group: Option<u32>) -> Department {
        Department::new(name.to_string(), 2.0, 3.0, group).unwrap()
    }

    fn model(groups: [Option<u32>; 3]) -> LayoutModel {
        LayoutModel::new(
            vec![
                dept("saw", groups[0]),
                dept("mill", groups[1]),
                dept("paint", groups[2]),
            ],
            Facility::new("plant".to_string(), 20.0, 20.0).unwrap(),
            arr2(&[[0.0, 4.0, 1.0], [0.0, 0.0, 2.0], [0.0, 0.0, 0.0]]),
        )
        .unwrap()
    }

    #[test]
    fn grouping_adds_bonus_to_same_group_pairs_only() {
        let mut m = model([Some(1), Some(1), None]);
        assert!(m.apply_grouping(0.5));

        // bonus = 0.5 * max(c) = 2.0, applied to the one grouped pair
        assert_eq!(m.dependencies[[0, 1]], 6.0);
        assert_eq!(m.dependencies[[0, 2]], 1.0);
        assert_eq!(m.dependencies[[1, 2]], 2.0);

        // the ungrouped department now carries its own fresh singleton group
        assert_eq!(m.departments[2].group, Some(2));
    }

    #[test]
    fn grouping_is_skipped_when_no_department_has_a_group() {
        let mut m = model([None, None, None]);
        let before = m.clone();
        assert!(!m.apply_grouping(0.5));
        assert_eq!(m, before);
    }

    #[test]
    fn pair_cost_reads_the_upper_triangle_for_both_orders() {
        let m = model([None, None, None]);
        assert_eq!(m.pair_cost(0, 1), 4.0);
        assert_eq!(m.pair_cost(1, 0), 4.0);
        assert_eq!(m.total_pair_cost(), 7.0);
    }
}
