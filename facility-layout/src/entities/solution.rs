use crate::entities::{LayoutModel, Placement};

/// Extent of the axis-aligned region actually occupied by a placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingExtent {
    pub width: f64,
    pub height: f64,
    pub area: f64,
}

impl BoundingExtent {
    /// Tight bounding box over all placed department rectangles.
    /// Dimensions are resolved by name against the (post-rotation) model.
    pub fn of(placement: &Placement, model: &LayoutModel) -> Self {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for dept in &model.departments {
            let pos = placement
                .get(&dept.name)
                .expect("placement must cover every department of its model");
            x_min = x_min.min(pos.x - dept.half_width());
            x_max = x_max.max(pos.x + dept.half_width());
            y_min = y_min.min(pos.y - dept.half_height());
            y_max = y_max.max(pos.y + dept.half_height());
        }
        let width = x_max - x_min;
        let height = y_max - y_min;
        Self {
            width,
            height,
            area: width * height,
        }
    }
}

/// A fully solved layout: the placement, the model state that produced it
/// (with department and facility dimensions rewritten to the orientations the
/// exact stage chose), the total weighted rectilinear distance and the derived
/// bounding extent the controller ranks solutions by.
#[derive(Debug, Clone)]
pub struct Solution {
    pub placement: Placement,
    pub model: LayoutModel,
    pub objective: f64,
    pub bounding: BoundingExtent,
}

impl Solution {
    pub fn new(placement: Placement, model: LayoutModel, objective: f64) -> Self {
        let bounding = BoundingExtent::of(&placement, &model);
        Self {
            placement,
            model,
            objective,
            bounding,
        }
    }
}
