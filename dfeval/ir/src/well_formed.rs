//! Structural checks run before any transformation or simulation.
use crate::{ActorKind, Context, Direction, Graph, GraphIdx};
use dfeval_utils::{Error, EvalResult};
use itertools::Itertools;
use petgraph::visit::EdgeRef;
use std::collections::HashSet;

/// Check the invariants of a single graph level:
/// 1. Every actor fires at least once per iteration and has a finite,
///    non-negative duration.
/// 2. Actor names are unique.
/// 3. Every edge produces and consumes at least one token, leaves through an
///    output port and enters through an input port.
/// 4. Interfaces only have edges on their inner side.
pub fn validate_graph(graph: &Graph) -> EvalResult<()> {
    let mut names = HashSet::with_capacity(graph.actor_count());
    for (_, actor) in graph.actors() {
        if !names.insert(actor.name) {
            return Err(Error::malformed(format!(
                "graph `{}' defines actor `{}' more than once",
                graph.name, actor.name
            )));
        }
        if actor.repetitions == 0 {
            return Err(Error::malformed(format!(
                "actor `{}' in graph `{}' has a repetition count of 0",
                actor.name, graph.name
            )));
        }
        if !actor.duration.is_finite() || actor.duration < 0.0 {
            return Err(Error::malformed(format!(
                "actor `{}' in graph `{}' has invalid duration {}",
                actor.name, graph.name, actor.duration
            )));
        }
    }

    for edge in graph.edges() {
        let (src, dst) = (edge.source(), edge.target());
        if !graph.contains_actor(src) || !graph.contains_actor(dst) {
            return Err(Error::malformed(format!(
                "edge #{} references an actor outside graph `{}'",
                edge.id().index(),
                graph.name
            )));
        }
        let (src, dst) = (graph.actor(src), graph.actor(dst));
        let weight = edge.weight();
        let describe = || {
            format!(
                "{}.{} -> {}.{}",
                src.name, weight.src_port.name, dst.name, weight.dst_port.name
            )
        };
        if weight.prod == 0 || weight.cons == 0 {
            return Err(Error::malformed(format!(
                "edge {} has rates {}/{}, both must be positive",
                describe(),
                weight.prod,
                weight.cons
            )));
        }
        if weight.src_port.direction != Direction::Output
            || weight.dst_port.direction != Direction::Input
        {
            return Err(Error::malformed(format!(
                "edge {} must go from an output port to an input port",
                describe()
            )));
        }
        if src.kind == ActorKind::Interface(Direction::Output) {
            return Err(Error::malformed(format!(
                "edge {} leaves output interface `{}'",
                describe(),
                src.name
            )));
        }
        if dst.kind == ActorKind::Interface(Direction::Input) {
            return Err(Error::malformed(format!(
                "edge {} enters input interface `{}'",
                describe(),
                dst.name
            )));
        }
    }
    Ok(())
}

/// Check every graph of the context and the containment relation: each
/// refinement must exist and no graph may contain itself.
pub fn validate_context(ctx: &Context) -> EvalResult<()> {
    for (idx, graph) in ctx.graphs() {
        validate_graph(graph)?;
        for (actor, child) in ctx.children(idx) {
            if !ctx.contains(child) {
                return Err(Error::malformed(format!(
                    "hierarchical actor `{}' in graph `{}' refines to missing graph #{}",
                    graph.actor(actor).name,
                    graph.name,
                    child.index()
                )));
            }
        }
    }
    check_containment(ctx)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Depth-first search over the containment relation. Reports the first
/// containment cycle found, as the path of graph names that closes it.
/// Dangling refinements are ignored here; [validate_context] reports them.
pub fn check_containment(ctx: &Context) -> EvalResult<()> {
    let mut marks = vec![Mark::Unvisited; ctx.len()];
    for (root, _) in ctx.graphs() {
        if marks[root.index()] != Mark::Unvisited {
            continue;
        }
        // Explicit stack of (graph, children still to visit).
        let mut stack: Vec<(GraphIdx, Vec<GraphIdx>)> =
            vec![(root, refinements(ctx, root))];
        marks[root.index()] = Mark::OnStack;
        while let Some((current, pending)) = stack.last_mut() {
            let current = *current;
            match pending.pop() {
                Some(child) => match marks[child.index()] {
                    Mark::Unvisited => {
                        marks[child.index()] = Mark::OnStack;
                        stack.push((child, refinements(ctx, child)));
                    }
                    Mark::OnStack => {
                        let start = stack
                            .iter()
                            .position(|(g, _)| *g == child)
                            .unwrap_or(0);
                        let path = stack[start..]
                            .iter()
                            .map(|(g, _)| ctx[*g].name)
                            .chain(std::iter::once(ctx[child].name))
                            .collect_vec();
                        return Err(Error::hierarchy_cycle(path));
                    }
                    Mark::Done => (),
                },
                None => {
                    marks[current.index()] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }
    Ok(())
}

fn refinements(ctx: &Context, idx: GraphIdx) -> Vec<GraphIdx> {
    ctx.children(idx)
        .map(|(_, g)| g)
        .filter(|g| ctx.contains(*g))
        .unique()
        .collect()
}
