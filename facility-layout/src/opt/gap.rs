use log::debug;

use crate::entities::{LayoutModel, Placement, RelationMatrices};

/// Locally tightens the relation matrices of a solved layout.
///
/// A pair held apart along its asserted axis may also be separated along the
/// orthogonal axis; re-asserting the orthogonal relation instead lets the next
/// exact solve close the slack along the original axis. A pair is flipped only
/// when the orthogonal edge gap is strictly smaller than the asserted one,
/// otherwise a tightened pair would flip straight back on the next pass and the
/// loop would never reach its fixed point. All comparisons are exact, no
/// tolerance is applied.
///
/// Returns whether any entry changed; `false` is the fixed point at which the
/// repair loop must stop. The invariant of `relations` is preserved: the new
/// relation replaces the old one, never joins it.
pub fn close_gaps(
    placement: &Placement,
    model: &LayoutModel,
    relations: &mut RelationMatrices,
) -> bool {
    let n = model.n();
    debug_assert_eq!(placement.len(), n);
    let mut changed = false;

    for i in 0..n {
        for j in (i + 1)..n {
            let a = placement.get(&model.departments[i].name).unwrap();
            let b = placement.get(&model.departments[j].name).unwrap();
            let (hw_i, hh_i) = (
                model.departments[i].half_width(),
                model.departments[i].half_height(),
            );
            let (hw_j, hh_j) = (
                model.departments[j].half_width(),
                model.departments[j].half_height(),
            );

            // edge gaps per direction, non-negative iff the extents are disjoint
            let gap_right = (b.x - hw_j) - (a.x + hw_i); // i left of j
            let gap_left = (a.x - hw_i) - (b.x + hw_j);
            let gap_above = (b.y - hh_j) - (a.y + hh_i); // i below j
            let gap_below = (a.y - hh_i) - (b.y + hh_j);
            let h_gap = gap_right.max(gap_left);
            let v_gap = gap_above.max(gap_below);

            if relations.alpha[[i, j]] || relations.alpha[[j, i]] {
                if v_gap >= 0.0 && v_gap < h_gap {
                    relations.alpha[[i, j]] = false;
                    relations.alpha[[j, i]] = false;
                    if gap_above >= 0.0 {
                        relations.beta[[i, j]] = true;
                    } else {
                        relations.beta[[j, i]] = true;
                    }
                    changed = true;
                }
            } else if h_gap >= 0.0 && h_gap < v_gap {
                relations.beta[[i, j]] = false;
                relations.beta[[j, i]] = false;
                if gap_right >= 0.0 {
                    relations.alpha[[i, j]] = true;
                } else {
                    relations.alpha[[j, i]] = true;
                }
                changed = true;
            }
        }
    }

    debug_assert!(relations.invariant_holds());
    if changed {
        debug!("[GAP] tightened relation matrices");
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Department, Facility, PlacedDepartment};
    use ndarray::arr2;

    fn two_department_model() -> LayoutModel {
        LayoutModel::new(
            vec![
                Department::new("a".to_string(), 2.0, 2.0, None).unwrap(),
                Department::new("b".to_string(), 2.0, 2.0, None).unwrap(),
            ],
            Facility::new("plant".to_string(), 20.0, 20.0).unwrap(),
            arr2(&[[0.0, 1.0], [0.0, 0.0]]),
        )
        .unwrap()
    }

    fn placement(a: (f64, f64), b: (f64, f64)) -> Placement {
        Placement {
            positions: vec![
                PlacedDepartment {
                    name: "a".to_string(),
                    x: a.0,
                    y: a.1,
                    rotated: false,
                },
                PlacedDepartment {
                    name: "b".to_string(),
                    x: b.0,
                    y: b.1,
                    rotated: false,
                },
            ],
        }
    }

    #[test]
    fn slack_horizontal_pair_is_tightened_to_vertical() {
        let model = two_department_model();
        // a left of b, but the vertical separation is the smaller gap
        let placement = placement((0.0, 0.0), (8.0, 2.5));
        let mut relations = RelationMatrices::empty(2);
        relations.alpha[[0, 1]] = true;

        assert!(close_gaps(&placement, &model, &mut relations));
        assert!(relations.beta[[0, 1]]);
        assert!(!relations.alpha[[0, 1]] && !relations.alpha[[1, 0]]);
        assert!(relations.invariant_holds());
    }

    #[test]
    fn second_pass_is_a_fixed_point() {
        let model = two_department_model();
        let placement = placement((0.0, 0.0), (8.0, 2.5));
        let mut relations = RelationMatrices::empty(2);
        relations.alpha[[0, 1]] = true;

        assert!(close_gaps(&placement, &model, &mut relations));
        assert!(!close_gaps(&placement, &model, &mut relations));
    }

    #[test]
    fn pair_without_orthogonal_separation_is_untouched() {
        let model = two_department_model();
        // vertically overlapping: only the asserted horizontal relation holds
        let placement = placement((0.0, 0.0), (8.0, 1.0));
        let mut relations = RelationMatrices::empty(2);
        relations.alpha[[0, 1]] = true;

        assert!(!close_gaps(&placement, &model, &mut relations));
        assert!(relations.alpha[[0, 1]]);
    }
}
