use anyhow::{Result, ensure};

/// The rectangular bounding region housing all departments.
#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    pub name: String,
    /// Extent in x-direction
    pub width: f64,
    /// Extent in y-direction
    pub height: f64,
}

impl Facility {
    pub fn new(name: String, width: f64, height: f64) -> Result<Self> {
        ensure!(
            width > 0.0 && height > 0.0,
            "facility '{name}' must have positive dimensions, got {width}x{height}"
        );
        Ok(Self {
            name,
            width,
            height,
        })
    }

    /// Rotates the facility by 90°, i.e. swaps its width and height.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_round_trip_restores_dimensions() {
        let mut facility = Facility::new("plant".to_string(), 30.0, 12.5).unwrap();
        facility.rotate();
        assert_eq!((facility.width, facility.height), (12.5, 30.0));
        facility.rotate();
        assert_eq!((facility.width, facility.height), (30.0, 12.5));
    }
}
