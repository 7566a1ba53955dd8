//! combat_sim - scenario files and batch encounter runs on top of combat_core

pub mod runner;
pub mod scenario;

pub use runner::{run_batch, run_once, Tally};
pub use scenario::{PlayerSpec, Scenario};
