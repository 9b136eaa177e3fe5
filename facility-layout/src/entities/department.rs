use anyhow::{Result, ensure};

/// A fixed-size rectangular unit to be placed inside the [`Facility`](crate::entities::Facility).
#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    /// Unique name, the key under which all placements and exports refer to this department
    pub name: String,
    /// Extent in x-direction
    pub width: f64,
    /// Extent in y-direction
    pub height: f64,
    /// Departments sharing a group id are pulled together when grouping is enabled
    pub group: Option<u32>,
}

impl Department {
    pub fn new(name: String, width: f64, height: f64, group: Option<u32>) -> Result<Self> {
        ensure!(
            width > 0.0 && height > 0.0,
            "department '{name}' must have positive dimensions, got {width}x{height}"
        );
        Ok(Self {
            name,
            width,
            height,
            group,
        })
    }

    /// Rotates the department by 90°, i.e. swaps its width and height.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
    }

    pub fn half_width(&self) -> f64 {
        0.5 * self.width
    }

    pub fn half_height(&self) -> f64 {
        0.5 * self.height
    }
}
