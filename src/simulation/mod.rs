pub mod engine;
pub mod report;

pub use engine::{SimulationConfig, SimulationError, SimulationResult, Simulator};
pub use report::{format_table, percentage};
