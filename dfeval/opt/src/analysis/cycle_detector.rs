use dfeval_ir::{self as ir, GraphIdx, Id};
use dfeval_utils::{Error, EvalResult, measure_time};
use itertools::Itertools;
use petgraph::algo;

/// True if the graph has a directed cycle. Self-loops count, delays are
/// ignored.
pub fn has_cycle(graph: &ir::Graph) -> bool {
    algo::is_cyclic_directed(graph.as_petgraph())
}

/// Cyclic status of one visited graph level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelReport {
    pub graph: GraphIdx,
    pub name: Id,
    /// Nesting depth. The analyzed graph is at depth 0.
    pub depth: usize,
    /// The hierarchical actor through which this level was reached.
    pub via: Option<Id>,
    pub cyclic: bool,
}

/// Result of [CycleDetector::detect]. Levels are listed in visiting order:
/// a graph comes before the graphs nested inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    levels: Vec<LevelReport>,
}

impl CycleReport {
    /// Is the analyzed graph itself cyclic?
    pub fn top_level_cyclic(&self) -> bool {
        self.levels.first().is_some_and(|l| l.cyclic)
    }

    /// True only if every visited level is cyclic.
    pub fn all_levels_cyclic(&self) -> bool {
        self.levels.iter().all(|l| l.cyclic)
    }

    /// True if at least one visited level is cyclic.
    pub fn any_level_cyclic(&self) -> bool {
        self.levels.iter().any(|l| l.cyclic)
    }

    /// Names of the cyclic levels, in visiting order. A graph shared by
    /// several hierarchical actors appears once per actor.
    pub fn cyclic_graphs(&self) -> Vec<Id> {
        self.levels
            .iter()
            .filter(|l| l.cyclic)
            .map(|l| l.name)
            .collect_vec()
    }

    pub fn levels(&self) -> &[LevelReport] {
        &self.levels
    }
}

/// Hierarchical cycle detection.
///
/// Visits the analyzed graph and then, depth first, the nested graph of each
/// of its hierarchical actors. A nested graph is visited once for every
/// actor that refers to it.
pub struct CycleDetector;

impl CycleDetector {
    pub fn detect(
        ctx: &ir::Context,
        root: GraphIdx,
    ) -> EvalResult<CycleReport> {
        // containment must be a DAG for the walk below to terminate
        ir::validate_context(ctx)?;
        if !ctx.contains(root) {
            return Err(Error::malformed(format!(
                "graph #{} is not part of the design",
                root.index()
            )));
        }
        measure_time("cycle-detection", || {
            let mut levels = vec![];
            // (graph, depth, actor it was reached through)
            let mut stack = vec![(root, 0, None)];
            while let Some((idx, depth, via)) = stack.pop() {
                let graph = &ctx[idx];
                let cyclic = has_cycle(graph);
                log::debug!(
                    "{}{}: {}",
                    "  ".repeat(depth),
                    graph.name,
                    if cyclic { "cyclic" } else { "acyclic" }
                );
                levels.push(LevelReport {
                    graph: idx,
                    name: graph.name,
                    depth,
                    via,
                    cyclic,
                });
                // pushed in reverse so actors are visited in index order
                let children = ctx.children(idx).collect_vec();
                for (actor, child) in children.into_iter().rev() {
                    stack.push((
                        child,
                        depth + 1,
                        Some(graph.actor(actor).name),
                    ));
                }
            }
            Ok(CycleReport { levels })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::abc326;
    use dfeval_ir::{Builder, Context, Direction, Graph};
    use dfeval_utils::ErrorKind;

    fn pipeline(name: &str) -> Graph {
        let mut g = Graph::new(name);
        let mut b = Builder::new(&mut g);
        b.add_interface("in", Direction::Input, 1).unwrap();
        b.add_actor("F", 1, 1.0).unwrap();
        b.add_interface("out", Direction::Output, 1).unwrap();
        b.add_edge("in", "F", 1, 1, 0).unwrap();
        b.add_edge("F", "out", 1, 1, 0).unwrap();
        g
    }

    #[test]
    fn single_level() {
        assert!(has_cycle(&abc326()));
        assert!(!has_cycle(&pipeline("p")));

        let mut g = Graph::new("loop");
        let mut b = Builder::new(&mut g);
        b.add_actor("S", 1, 1.0).unwrap();
        b.add_edge("S", "S", 1, 1, 1).unwrap();
        assert!(has_cycle(&g));
    }

    #[test]
    fn cyclic_top_with_acyclic_child() {
        let mut ctx = Context::new(abc326());
        let sub = ctx.add_graph(pipeline("sub"));
        let top = ctx.entrypoint();
        let mut b = Builder::new(&mut ctx[top]);
        b.add_hierarchical_actor("H1", 1, sub).unwrap();
        b.add_hierarchical_actor("H2", 1, sub).unwrap();
        b.add_edge("H1", "H2", 1, 1, 0).unwrap();

        let report = CycleDetector::detect(&ctx, top).unwrap();
        assert!(report.top_level_cyclic());
        assert!(!report.all_levels_cyclic());
        assert!(report.any_level_cyclic());
        assert_eq!(report.cyclic_graphs(), vec![Id::from("ABC326")]);

        // the shared graph is visited once per referencing actor
        let levels = report.levels();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[1].via, Some(Id::from("H1")));
        assert_eq!(levels[2].via, Some(Id::from("H2")));
        assert!(levels[1..].iter().all(|l| l.depth == 1 && l.graph == sub));
    }

    #[test]
    fn acyclic_top_with_cyclic_grandchild() {
        let mut ctx = Context::new(pipeline("top"));
        let mid = ctx.add_graph(pipeline("mid"));
        let leaf = ctx.add_graph(abc326());
        let top = ctx.entrypoint();
        Builder::new(&mut ctx[top])
            .add_hierarchical_actor("M", 1, mid)
            .unwrap();
        Builder::new(&mut ctx[mid])
            .add_hierarchical_actor("L", 1, leaf)
            .unwrap();

        let report = CycleDetector::detect(&ctx, top).unwrap();
        assert!(!report.top_level_cyclic());
        assert!(report.any_level_cyclic());
        let depths = report.levels().iter().map(|l| l.depth).collect_vec();
        assert_eq!(depths, vec![0, 1, 2]);

        // analyzing a nested graph directly only visits what it contains
        let report = CycleDetector::detect(&ctx, leaf).unwrap();
        assert!(report.all_levels_cyclic());
        assert_eq!(report.levels().len(), 1);

        let missing = dfeval_ir::GraphIdx::new(9);
        assert!(
            CycleDetector::detect(&ctx, missing)
                .unwrap_err()
                .is_structural()
        );
    }

    #[test]
    fn containment_cycle_is_not_a_dataflow_cycle() {
        let mut ctx = Context::new(pipeline("top"));
        let top = ctx.entrypoint();
        Builder::new(&mut ctx[top])
            .add_hierarchical_actor("Me", 1, top)
            .unwrap();
        let err = CycleDetector::detect(&ctx, top).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::HierarchyCycle(_)));
    }
}
