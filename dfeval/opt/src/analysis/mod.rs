//! Analyses of dataflow graphs.
//!
//! The analyses answer questions about a graph without modifying it: whether
//! it (or a graph nested in it) has cycles, how often each actor has to fire
//! per iteration, and how long one iteration takes under self-timed
//! execution.

mod asap_scheduler;
mod cycle_detector;
mod graph_simulation;
mod repetition_vector;

pub use asap_scheduler::{AsapResult, AsapScheduler, SchedulerState};
pub use cycle_detector::{CycleDetector, CycleReport, LevelReport, has_cycle};
pub use graph_simulation::GraphSimulation;
pub use repetition_vector::RepetitionVector;
