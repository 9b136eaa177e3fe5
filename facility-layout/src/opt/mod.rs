pub mod controller;
pub mod exact;
pub mod gap;
pub mod relaxation;
pub mod triangulation;
