//! Two-stage solver for the facility layout problem.
//!
//! Rectangular departments with pairwise transport-dependency weights are placed
//! inside a rectangular facility such that the total weighted rectilinear
//! transport distance is minimized. The pipeline runs in two stages:
//! a continuous attractor-repeller relaxation spreads the departments without
//! enforcing non-overlap, a triangulation step converts the continuous positions
//! into discrete relative-position relations, and an exact mixed-integer stage
//! places the departments subject to those relations. An outer controller runs
//! randomized restarts of the pipeline and repairs the selected layout with a
//! gap-closing heuristic.

pub mod config;
pub mod entities;
pub mod opt;
pub mod util;

mod error;

pub use error::LayoutError;
