use serde::{Deserialize, Serialize};

use facility_layout::config::SolverConfig;

use crate::io::render::DrawOptions;

/// Configuration for the flp CLI, read from a JSON file.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct FlpConfig {
    /// Configuration of the placement solver
    pub solver: SolverConfig,
    /// Optional SVG drawing options
    #[serde(default)]
    pub draw_options: DrawOptions,
}

impl Default for FlpConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            draw_options: DrawOptions::default(),
        }
    }
}
