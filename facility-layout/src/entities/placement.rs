/// Solved center position of a single department.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedDepartment {
    pub name: String,
    /// x-coordinate of the center, facility-centered frame
    pub x: f64,
    /// y-coordinate of the center, facility-centered frame
    pub y: f64,
    /// Whether the department was rotated by 90° relative to its input orientation
    pub rotated: bool,
}

/// Center coordinates for every department, produced by both solver stages.
///
/// Positions are stored in model order but always keyed by department name, so
/// a placement survives reordering of the department list.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub positions: Vec<PlacedDepartment>,
}

impl Placement {
    pub fn get(&self, name: &str) -> Option<&PlacedDepartment> {
        self.positions.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
