use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use csv::ReaderBuilder;
use ndarray::Array2;
use serde::Deserialize;

use facility_layout::entities::{Department, Facility, LayoutModel};

pub const DEPARTMENTS_FILE: &str = "departments.csv";
pub const FACILITY_FILE: &str = "facility.csv";
pub const FLOWS_FILE: &str = "flows.csv";
pub const TRANSPORT_MEANS_FILE: &str = "transport_means.csv";
pub const MEAN_MATRIX_FILE: &str = "mean_matrix.csv";

/// Everything the run needs, assembled from the input folder.
#[derive(Debug)]
pub struct ImportedData {
    pub model: LayoutModel,
    /// Raw directed flow matrix as imported, re-exported alongside the solution
    pub flows: Array2<f64>,
}

#[derive(Debug, Deserialize)]
struct DepartmentRecord {
    name: String,
    w: f64,
    h: f64,
    group: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FacilityRecord {
    name: String,
    w: f64,
    h: f64,
}

#[derive(Debug, Deserialize)]
struct TransportMeanRecord {
    name: String,
    variable_cost: f64,
}

/// Reads the five input CSV files and assembles the layout model.
///
/// The dependency matrix handed to the solver is the flow matrix netted
/// against the variable cost of the transport mean assigned to each pair,
/// folded onto the upper triangle (the solver charges each unordered pair
/// once, regardless of flow direction).
pub fn import_model(folder: &Path) -> Result<ImportedData> {
    let departments = read_departments(open(folder, DEPARTMENTS_FILE)?)?;
    let facility = read_facility(open(folder, FACILITY_FILE)?)?;
    let names: Vec<String> = departments.iter().map(|d| d.name.clone()).collect();

    let flow_cells = read_matrix_cells(open(folder, FLOWS_FILE)?, &names, FLOWS_FILE)?;
    let flows = parse_flow_matrix(&flow_cells)?;
    let means = read_matrix_cells(open(folder, MEAN_MATRIX_FILE)?, &names, MEAN_MATRIX_FILE)?;
    let costs = read_transport_means(open(folder, TRANSPORT_MEANS_FILE)?)?;

    let dependencies = net_dependencies(&flows, &means, &costs)?;
    let model = LayoutModel::new(departments, facility, dependencies)?;
    Ok(ImportedData { model, flows })
}

fn open(folder: &Path, file: &str) -> Result<File> {
    let path = folder.join(file);
    File::open(&path).with_context(|| format!("could not open input file: {}", path.display()))
}

fn read_departments(reader: impl Read) -> Result<Vec<Department>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut departments = Vec::new();
    for record in rdr.deserialize() {
        let record: DepartmentRecord = record.context("malformed department record")?;
        departments.push(Department::new(record.name, record.w, record.h, record.group)?);
    }
    ensure!(
        !departments.is_empty(),
        "{DEPARTMENTS_FILE} contains no departments"
    );
    Ok(departments)
}

fn read_facility(reader: impl Read) -> Result<Facility> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = rdr.deserialize::<FacilityRecord>();
    let record = records
        .next()
        .context(format!("{FACILITY_FILE} contains no facility"))?
        .context("malformed facility record")?;
    ensure!(
        records.next().is_none(),
        "{FACILITY_FILE} must contain exactly one facility"
    );
    Facility::new(record.name, record.w, record.h)
}

fn read_transport_means(reader: impl Read) -> Result<HashMap<String, f64>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut costs = HashMap::new();
    for record in rdr.deserialize() {
        let record: TransportMeanRecord = record.context("malformed transport mean record")?;
        ensure!(
            costs.insert(record.name.clone(), record.variable_cost).is_none(),
            "duplicate transport mean '{}'",
            record.name
        );
    }
    Ok(costs)
}

/// Reads an n×n matrix file: a header row naming the departments, then one row
/// per department with its name in the first column. Row and column order must
/// match departments.csv.
fn read_matrix_cells(
    reader: impl Read,
    names: &[String],
    file: &str,
) -> Result<Vec<Vec<String>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record.with_context(|| format!("malformed row in {file}"))?;
        rows.push(record.iter().map(|s| s.trim().to_string()).collect());
    }

    let n = names.len();
    ensure!(
        rows.len() == n + 1,
        "{file} must contain a header row and {n} department rows, got {} rows",
        rows.len()
    );
    let header = &rows[0];
    ensure!(
        header.len() == n + 1,
        "{file} header must contain {} columns, got {}",
        n + 1,
        header.len()
    );
    for (k, name) in names.iter().enumerate() {
        ensure!(
            header[k + 1] == *name,
            "{file} column {} is '{}', expected '{name}' (matrix order must match {DEPARTMENTS_FILE})",
            k + 1,
            header[k + 1]
        );
    }

    let mut cells = Vec::with_capacity(n);
    for (k, row) in rows[1..].iter().enumerate() {
        ensure!(
            row.len() == n + 1,
            "{file} row '{}' must contain {} columns, got {}",
            row.first().map(String::as_str).unwrap_or(""),
            n + 1,
            row.len()
        );
        ensure!(
            row[0] == names[k],
            "{file} row {} is '{}', expected '{}' (matrix order must match {DEPARTMENTS_FILE})",
            k + 1,
            row[0],
            names[k]
        );
        cells.push(row[1..].to_vec());
    }
    Ok(cells)
}

fn parse_flow_matrix(cells: &[Vec<String>]) -> Result<Array2<f64>> {
    let n = cells.len();
    let mut flows = Array2::zeros((n, n));
    for (i, row) in cells.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            flows[[i, j]] = if cell.is_empty() {
                0.0
            } else {
                cell.parse()
                    .with_context(|| format!("{FLOWS_FILE}: '{cell}' is not a number"))?
            };
        }
    }
    Ok(flows)
}

fn net_dependencies(
    flows: &Array2<f64>,
    means: &[Vec<String>],
    costs: &HashMap<String, f64>,
) -> Result<Array2<f64>> {
    let n = flows.nrows();
    let mut deps = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            let mean = &means[i][j];
            if mean.is_empty() {
                continue;
            }
            let cost = costs
                .get(mean)
                .with_context(|| format!("unknown transport mean '{mean}'"))?;
            deps[[i, j]] = flows[[i, j]] * cost;
        }
    }
    // fold the directed matrix onto the upper triangle
    for i in 0..n {
        for j in 0..i {
            deps[[j, i]] += deps[[i, j]];
            deps[[i, j]] = 0.0;
        }
    }
    Ok(deps)
}
