//! Internal representation of synchronous dataflow (SDF) graphs.
//!
//! A [Graph] is a multigraph of [Actor]s connected by FIFO [Edge]s with
//! fixed production and consumption rates and initial tokens (delays).
//! Hierarchical designs are owned by a [Context]: a hierarchical actor
//! refers to its nested graph by [GraphIdx] instead of owning it, and
//! [validate_context] checks that the containment relation has no cycles.
//!
//! Derived annotations (normalized rates, the actor an instance was expanded
//! from) are explicit typed fields rather than a property map.

mod builder;
mod context;
mod graph;
mod printer;
mod structure;
mod well_formed;

pub use builder::Builder;
pub use context::{Context, GraphIdx};
pub use dfeval_utils::{GetName, Id};
pub use graph::{ActorIdx, EdgeIdx, Graph};
pub use printer::Printer;
pub use structure::{Actor, ActorKind, Direction, Edge, Port};
pub use well_formed::{check_containment, validate_context, validate_graph};

// Re-exported so callers can use `source()`/`target()` on edge references.
pub use petgraph::visit::EdgeRef;
