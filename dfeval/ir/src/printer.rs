//! Implements a Graphviz formatter for dataflow graphs.
//! Printing never mutates the graph.
use crate::{self as ir, ActorKind};
use itertools::Itertools;
use petgraph::visit::EdgeRef;
use std::io;

/// Printer for the IR.
pub struct Printer;

impl Printer {
    /// Format an actor label of the form `name x3 [1.5]`.
    fn format_actor(actor: &ir::Actor) -> String {
        let shape = match actor.kind {
            ActorKind::Atomic => "box",
            ActorKind::Hierarchical(_) => "box3d",
            ActorKind::Interface(_) => "ellipse",
        };
        format!(
            "label=\"{} x{} [{}]\", shape={}",
            actor.name, actor.repetitions, actor.duration, shape
        )
    }

    /// Format an edge label of the form `2/3 (6)`. The delay is omitted when
    /// it is zero.
    fn format_edge(edge: &ir::Edge) -> String {
        if edge.has_delay() {
            format!("label=\"{}/{} ({})\"", edge.prod, edge.cons, edge.delay)
        } else {
            format!("label=\"{}/{}\"", edge.prod, edge.cons)
        }
    }

    /// Prints out a graph in the DOT format.
    pub fn write_graph<F: io::Write>(
        graph: &ir::Graph,
        f: &mut F,
    ) -> io::Result<()> {
        writeln!(f, "digraph \"{}\" {{", graph.name)?;
        for (idx, actor) in graph.actors() {
            writeln!(f, "  n{} [{}];", idx.index(), Self::format_actor(actor))?;
        }
        for edge in graph.edges() {
            writeln!(
                f,
                "  n{} -> n{} [{}];",
                edge.source().index(),
                edge.target().index(),
                Self::format_edge(edge.weight())
            )?;
        }
        writeln!(f, "}}")
    }

    /// Prints every graph of the context, entrypoint first.
    pub fn write_context<F: io::Write>(
        ctx: &ir::Context,
        f: &mut F,
    ) -> io::Result<()> {
        let order = std::iter::once(ctx.entrypoint())
            .chain(ctx.graphs().map(|(idx, _)| idx))
            .unique()
            .collect_vec();
        for idx in order {
            Self::write_graph(&ctx[idx], f)?;
        }
        Ok(())
    }

    /// Formats a graph into a string.
    pub fn graph_to_str(graph: &ir::Graph) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = Self::write_graph(graph, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
