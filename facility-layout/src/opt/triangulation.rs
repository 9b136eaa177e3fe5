use crate::entities::{Placement, RelationMatrices};

/// Classifies every department pair into exactly one relative-position relation.
///
/// The axis with the larger center gap decides: `|x_i - x_j| >= |y_i - y_j|`
/// makes the pair a left/right pair, otherwise above/below. Within the chosen
/// axis, `>=` breaks the tie, so the output is fully determined by the input:
/// no randomness, no state. The relation invariant holds by construction.
pub fn triangulate(placement: &Placement) -> RelationMatrices {
    let n = placement.len();
    let mut relations = RelationMatrices::empty(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let a = &placement.positions[i];
            let b = &placement.positions[j];
            if (a.x - b.x).abs() >= (a.y - b.y).abs() {
                if a.x >= b.x {
                    // i right of j
                    relations.alpha[[j, i]] = true;
                } else {
                    // i left of j
                    relations.alpha[[i, j]] = true;
                }
            } else if a.y >= b.y {
                // i above j
                relations.beta[[j, i]] = true;
            } else {
                // i below j
                relations.beta[[i, j]] = true;
            }
        }
    }
    debug_assert!(relations.invariant_holds());
    relations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PlacedDepartment;

    fn placement(coords: &[(f64, f64)]) -> Placement {
        Placement {
            positions: coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| PlacedDepartment {
                    name: format!("d{i}"),
                    x,
                    y,
                    rotated: false,
                })
                .collect(),
        }
    }

    #[test]
    fn horizontal_gap_wins_ties() {
        // equal gaps: the pair must become a left/right pair
        let relations = triangulate(&placement(&[(0.0, 0.0), (3.0, 3.0)]));
        assert!(relations.alpha[[0, 1]]);
        assert!(!relations.beta[[0, 1]] && !relations.beta[[1, 0]]);
    }

    #[test]
    fn coinciding_centers_are_classified_deterministically() {
        let relations = triangulate(&placement(&[(1.0, 1.0), (1.0, 1.0)]));
        // dx == dy == 0: horizontal axis wins, x_i >= x_j puts i right of j
        assert!(relations.alpha[[1, 0]]);
        assert!(relations.invariant_holds());
    }

    #[test]
    fn vertical_separation_yields_below_relation() {
        let relations = triangulate(&placement(&[(0.0, -4.0), (1.0, 4.0)]));
        assert!(relations.beta[[0, 1]]);
        assert!(!relations.alpha[[0, 1]] && !relations.alpha[[1, 0]]);
    }
}
