use crate::entities::{LayoutModel, Placement, RelationMatrices};

//Various checks to verify correctness of solver output
//Used in debug_assert!() blocks and tests

/// Whether every department extent lies inside the facility extent of `model`
/// (post-rotation dimensions), within `eps`.
pub fn placement_within_facility(placement: &Placement, model: &LayoutModel, eps: f64) -> bool {
    let half_w = 0.5 * model.facility.width;
    let half_h = 0.5 * model.facility.height;
    model.departments.iter().all(|dept| {
        let pos = match placement.get(&dept.name) {
            Some(pos) => pos,
            None => return false,
        };
        pos.x - dept.half_width() >= -half_w - eps
            && pos.x + dept.half_width() <= half_w + eps
            && pos.y - dept.half_height() >= -half_h - eps
            && pos.y + dept.half_height() <= half_h + eps
    })
}

/// Whether every relation asserted by `relations` is satisfied by the
/// placement, within `eps`: `alpha[i,j]` requires i's right edge left of j's
/// left edge, `beta[i,j]` requires i's top edge below j's bottom edge.
pub fn placement_respects_relations(
    placement: &Placement,
    model: &LayoutModel,
    relations: &RelationMatrices,
    eps: f64,
) -> bool {
    let n = model.n();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let a = match placement.get(&model.departments[i].name) {
                Some(pos) => pos,
                None => return false,
            };
            let b = match placement.get(&model.departments[j].name) {
                Some(pos) => pos,
                None => return false,
            };
            if relations.alpha[[i, j]]
                && a.x + model.departments[i].half_width()
                    > b.x - model.departments[j].half_width() + eps
            {
                return false;
            }
            if relations.beta[[i, j]]
                && a.y + model.departments[i].half_height()
                    > b.y - model.departments[j].half_height() + eps
            {
                return false;
            }
        }
    }
    true
}

/// Containment and asserted relations combined.
pub fn placement_is_feasible(
    placement: &Placement,
    model: &LayoutModel,
    relations: &RelationMatrices,
    eps: f64,
) -> bool {
    placement_within_facility(placement, model, eps)
        && placement_respects_relations(placement, model, relations, eps)
}
