//! # Analyses and passes over dataflow graphs
//!
//! The [passes] expand a multi-rate SDF graph into single-rate (srSDF),
//! homogeneous (HSDF) and acyclic (DAG) graphs, and annotate a graph with
//! normalized rates. The [analysis] module holds the hierarchical cycle
//! checker, the repetition vector solver, the token ledger and the ASAP
//! self-timed simulator built on top of it.
//!
//! ```rust
//! use dfeval_ir::{Builder, Graph};
//! use dfeval_opt::{analysis::AsapScheduler, passes::SdfTransformer};
//! use dfeval_utils::EvalResult;
//! fn main() -> EvalResult<()> {
//!   let mut g = Graph::new("pair");
//!   let mut b = Builder::new(&mut g);
//!   b.add_actor("A", 3, 1.0)?;
//!   b.add_actor("B", 2, 1.0)?;
//!   b.add_edge("A", "B", 2, 3, 0)?;
//!   b.add_edge("B", "A", 3, 2, 6)?;
//!   let srsdf = SdfTransformer::to_srsdf(&g)?;
//!   assert_eq!(srsdf.actor_count(), 5);
//!   let result = AsapScheduler::schedule(&g)?;
//!   assert!(result.live);
//!   Ok(())
//! }
//! ```
pub mod analysis;
pub mod passes;

#[cfg(test)]
pub(crate) mod fixtures;
