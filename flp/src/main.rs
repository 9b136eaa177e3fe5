use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use facility_layout::opt::controller::LayoutOptimizer;
use log::{info, warn};
use once_cell::sync::Lazy;

use crate::config::FlpConfig;
use crate::io::cli::Cli;
use crate::io::{export, import, render};

mod config;
mod io;

pub static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] no config file provided, use --config-file to provide a custom config");
            FlpConfig::default()
        }
        Some(config_file) => {
            let file = File::open(config_file)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };
    info!("[MAIN] successfully parsed FlpConfig: {config:?}");

    let data = import::import_model(&args.input_folder)?;
    info!(
        "[MAIN] imported {} departments, facility '{}' ({} x {})",
        data.model.n(),
        data.model.facility.name,
        data.model.facility.width,
        data.model.facility.height
    );

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!(
                "could not create solution folder: {:?}",
                args.solution_folder
            )
        })?;
    }

    let mut optimizer = LayoutOptimizer::new(data.model.clone(), config.solver)?;
    let report = optimizer.solve()?;

    let first_stage =
        render::placement_to_svg(&report.relaxed, &data.model, config.draw_options, false);
    io::write_svg(&first_stage, &args.solution_folder.join("first_stage.svg"))?;

    let layout = render::placement_to_svg(
        &report.solution.placement,
        &report.solution.model,
        config.draw_options,
        true,
    );
    io::write_svg(&layout, &args.solution_folder.join("layout.svg"))?;

    export::export_layout(&args.solution_folder.join("layout.csv"), &report.solution)?;
    export::export_flows(
        &args.solution_folder.join("flows_out.csv"),
        &report.solution.model.departments,
        &data.flows,
    )?;

    let solution = &report.solution;
    info!(
        "[MAIN] objective {:.3} (total weighted transport distance, less is better)",
        solution.objective
    );
    info!(
        "[MAIN] occupied bounding box {:.3} x {:.3}, area {:.3}",
        solution.bounding.width, solution.bounding.height, solution.bounding.area
    );
    info!(
        "[MAIN] success rate: {}/{} restarts",
        report.n_feasible, report.n_restarts
    );
    info!("[MAIN] finished in {:?}", EPOCH.elapsed());

    Ok(())
}
