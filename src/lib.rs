//! # dfeval: transformation and throughput simulation of dataflow graphs
//!
//! This crate plumbs together the engine crates and exposes the operations
//! the surrounding workflow calls:
//! * the graph expansions [to_srsdf], [to_hsdf], [to_reduced_hsdf] and
//!   [to_dag];
//! * the rate annotation [normalize];
//! * the cycle check [has_cycle] and its hierarchical version
//!   [analysis::CycleDetector];
//! * the self-timed simulation [schedule], and [evaluate], which picks the
//!   evaluation strategy from an [EvalConfig].
//!
//! ```rust
//! use dfeval::{EvalConfig, TimingTable, ir};
//! fn main() -> dfeval::EvalResult<()> {
//!   let mut g = ir::Graph::new("pair");
//!   let mut b = ir::Builder::new(&mut g);
//!   b.add_actor("A", 3, 0.0)?;
//!   b.add_actor("B", 2, 0.0)?;
//!   b.add_edge("A", "B", 2, 3, 0)?;
//!   b.add_edge("B", "A", 3, 2, 6)?;
//!   let mut ctx = ir::Context::new(g);
//!   let timings: TimingTable = [("A", 1.0), ("B", 2.0)].into_iter().collect();
//!   let config = EvalConfig::default();
//!   timings.apply(&mut ctx, &config)?;
//!   let report = dfeval::evaluate(&ctx, &config)?;
//!   assert!(report.live);
//!   assert_eq!(report.iteration_duration, 3.0);
//!   Ok(())
//! }
//! ```
mod config;
mod throughput;
mod timing;

pub use config::{DEFAULT_TIMING, EvalConfig, ThroughputOpts};
pub use throughput::{ThroughputMethod, ThroughputReport, evaluate};
pub use timing::TimingTable;

pub use dfeval_ir as ir;
pub use dfeval_opt::{analysis, analysis::has_cycle, passes, passes::normalize};
pub use dfeval_utils::{Error, ErrorKind, EvalResult, Id};

use dfeval_opt::{
    analysis::{AsapResult, AsapScheduler},
    passes::{SdfTransformer, SrSdfTransformer},
};

/// SDF => HSDF, one unit-rate edge per token.
pub fn to_hsdf(sdf: &ir::Graph) -> EvalResult<ir::Graph> {
    SdfTransformer::to_hsdf(sdf)
}

/// SDF => srSDF.
pub fn to_srsdf(sdf: &ir::Graph) -> EvalResult<ir::Graph> {
    SdfTransformer::to_srsdf(sdf)
}

/// SDF => srSDF => HSDF.
pub fn to_reduced_hsdf(sdf: &ir::Graph) -> EvalResult<ir::Graph> {
    SdfTransformer::to_reduced_hsdf(sdf)
}

/// SDF => srSDF => DAG.
pub fn to_dag(sdf: &ir::Graph) -> EvalResult<ir::Graph> {
    SdfTransformer::to_dag(sdf)
}

/// srSDF => HSDF.
pub fn srsdf_to_hsdf(srsdf: &ir::Graph) -> EvalResult<ir::Graph> {
    SrSdfTransformer::to_hsdf(srsdf)
}

/// srSDF => DAG.
pub fn srsdf_to_dag(srsdf: &ir::Graph) -> EvalResult<ir::Graph> {
    SrSdfTransformer::to_dag(srsdf)
}

/// Simulate one iteration of `graph` as soon as possible.
pub fn schedule(graph: &ir::Graph) -> EvalResult<AsapResult> {
    AsapScheduler::schedule(graph)
}

/// Install a logger printing to stderr without timestamps. Does nothing if a
/// logger is already installed.
pub fn init_logging(level: log::LevelFilter) {
    let res = env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .try_init();
    if res.is_err() {
        log::debug!("logger already installed");
    }
}
