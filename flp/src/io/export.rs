use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use ndarray::Array2;

use facility_layout::entities::{Department, Solution};

/// Writes the solved layout as CSV: one row per department with its center
/// coordinates, rotation outcome and solved dimensions. Coordinates are
/// translated so the facility's bottom-left corner is the origin.
pub fn export_layout(path: &Path, solution: &Solution) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("could not create output file: {}", path.display()))?;
    writer.write_record(["name", "x", "y", "rotated", "w", "h"])?;

    let half_w = 0.5 * solution.model.facility.width;
    let half_h = 0.5 * solution.model.facility.height;
    for dept in &solution.model.departments {
        let pos = solution
            .placement
            .get(&dept.name)
            .with_context(|| format!("placement is missing department '{}'", dept.name))?;
        writer.write_record(&[
            dept.name.clone(),
            format!("{}", pos.x + half_w),
            format!("{}", pos.y + half_h),
            format!("{}", pos.rotated),
            format!("{}", dept.width),
            format!("{}", dept.height),
        ])?;
    }
    writer.flush()?;
    info!("layout written to {}", path.display());
    Ok(())
}

/// Writes the raw directed flow matrix back out with department names on both
/// axes, so downstream tools receive flows untouched by cost netting.
pub fn export_flows(path: &Path, departments: &[Department], flows: &Array2<f64>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("could not create output file: {}", path.display()))?;

    let mut header = vec![String::new()];
    header.extend(departments.iter().map(|d| d.name.clone()));
    writer.write_record(&header)?;

    for (i, dept) in departments.iter().enumerate() {
        let mut row = vec![dept.name.clone()];
        row.extend((0..departments.len()).map(|j| format!("{}", flows[[i, j]])));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    info!("flow matrix written to {}", path.display());
    Ok(())
}
