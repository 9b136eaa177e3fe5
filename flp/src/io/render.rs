use serde::{Deserialize, Serialize};
use svg::Document;
use svg::node::element::{Group, Rectangle, Text};

use facility_layout::entities::{LayoutModel, Placement};

/// Fills cycled through by group id; departments without a group share the last entry.
const GROUP_FILLS: [&str; 8] = [
    "#FDE9A9", "#A9D9A9", "#A9C9E8", "#E8B7A9", "#C9A9D9", "#A9E0D9", "#E8D0B0", "#CCD4CC",
];

/// Options controlling the SVG renders.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct DrawOptions {
    /// Draw department names at their centers
    pub draw_labels: bool,
    /// Multiplier on the default stroke width
    pub stroke_width_multiplier: f64,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            draw_labels: true,
            stroke_width_multiplier: 1.0,
        }
    }
}

/// Renders a placement to SVG. `draw_facility` adds the facility frame; the
/// first-stage render omits it, since the relaxation ignores containment and
/// its positions may lie outside the facility.
pub fn placement_to_svg(
    placement: &Placement,
    model: &LayoutModel,
    options: DrawOptions,
    draw_facility: bool,
) -> Document {
    let half_w = 0.5 * model.facility.width;
    let half_h = 0.5 * model.facility.height;

    // world-coordinate bounds over everything drawn; svg y points down, so y is
    // mirrored when emitting nodes
    let mut x_min = if draw_facility { -half_w } else { f64::INFINITY };
    let mut x_max = -x_min;
    let mut y_min = if draw_facility { -half_h } else { f64::INFINITY };
    let mut y_max = -y_min;
    for dept in &model.departments {
        if let Some(pos) = placement.get(&dept.name) {
            x_min = x_min.min(pos.x - dept.half_width());
            x_max = x_max.max(pos.x + dept.half_width());
            y_min = y_min.min(pos.y - dept.half_height());
            y_max = y_max.max(pos.y + dept.half_height());
        }
    }
    let margin = 0.05 * f64::max(x_max - x_min, y_max - y_min);
    let (x_min, x_max) = (x_min - margin, x_max + margin);
    let (y_min, y_max) = (y_min - margin, y_max + margin);

    let stroke_width =
        f64::min(x_max - x_min, y_max - y_min) * 0.005 * options.stroke_width_multiplier;
    let font_size = f64::min(x_max - x_min, y_max - y_min) * 0.03;

    let mut document = Document::new().set(
        "viewBox",
        (x_min, -y_max, x_max - x_min, y_max - y_min),
    );

    if draw_facility {
        let frame = Rectangle::new()
            .set("x", -half_w)
            .set("y", -half_h)
            .set("width", model.facility.width)
            .set("height", model.facility.height)
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 2.0 * stroke_width);
        document = document.add(frame);
    }

    for dept in &model.departments {
        let Some(pos) = placement.get(&dept.name) else {
            continue;
        };
        let fill = match dept.group {
            Some(group) => GROUP_FILLS[group as usize % GROUP_FILLS.len()],
            None => GROUP_FILLS[GROUP_FILLS.len() - 1],
        };
        let mut group = Group::new().set("id", dept.name.clone());
        group = group.add(
            Rectangle::new()
                .set("x", pos.x - dept.half_width())
                .set("y", -(pos.y + dept.half_height()))
                .set("width", dept.width)
                .set("height", dept.height)
                .set("fill", fill)
                .set("stroke", "black")
                .set("stroke-width", stroke_width),
        );
        if options.draw_labels {
            group = group.add(
                Text::new(dept.name.clone())
                    .set("x", pos.x)
                    .set("y", -pos.y)
                    .set("font-size", font_size)
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "middle"),
            );
        }
        document = document.add(group);
    }

    document
}
