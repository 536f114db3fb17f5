use dfeval_ir::{self as ir, EdgeRef};
use dfeval_utils::{Error, EvalResult, measure_time};
use itertools::Itertools;

/// Conversions of graphs that are already single-rate: every edge produces
/// and consumes the same number of tokens.
pub struct SrSdfTransformer;

impl SrSdfTransformer {
    /// srSDF => HSDF. An edge of rate `m` with `d` initial tokens holds
    /// `d / m` iterations worth of tokens, so it becomes a unit-rate edge with
    /// delay `d / m`.
    pub fn to_hsdf(srsdf: &ir::Graph) -> EvalResult<ir::Graph> {
        Self::check_single_rate(srsdf)?;
        measure_time("srsdf-to-hsdf", || {
            let mut hsdf = Self::derive(srsdf, "HSDF", |_| true);
            hsdf.edges_mut().for_each(|edge| {
                edge.delay /= edge.prod;
                edge.prod = 1;
                edge.cons = 1;
            });
            Ok(hsdf)
        })
    }

    /// srSDF => DAG. Drops every edge carrying initial tokens.
    pub fn to_dag(srsdf: &ir::Graph) -> EvalResult<ir::Graph> {
        Self::check_single_rate(srsdf)?;
        measure_time("srsdf-to-dag", || {
            let dag = Self::derive(srsdf, "DAG", |edge| !edge.has_delay());
            log::debug!(
                "{}: dropped {} delayed edges",
                dag.name,
                srsdf.edge_count() - dag.edge_count()
            );
            Ok(dag)
        })
    }

    /// Copy of `srsdf` restricted to the edges accepted by `keep` and named
    /// after `srsdf` with `suffix` appended. Actors and edges that do not
    /// already remember where they come from point back into `srsdf`.
    fn derive<F>(srsdf: &ir::Graph, suffix: &str, keep: F) -> ir::Graph
    where
        F: FnMut(&ir::Edge) -> bool,
    {
        let mut annotated = srsdf.clone();
        for idx in srsdf.actor_indices() {
            let actor = annotated.actor_mut(idx);
            actor.base_actor = actor.base_actor.or(Some(idx));
        }
        for idx in srsdf.edges().map(|e| e.id()).collect_vec() {
            let edge = annotated.edge_mut(idx);
            edge.base_edge = edge.base_edge.or(Some(idx));
        }
        annotated.filter_edges(format!("{}_{suffix}", srsdf.name), keep)
    }

    fn check_single_rate(graph: &ir::Graph) -> EvalResult<()> {
        ir::validate_graph(graph)?;
        let multi_rate = graph
            .edges()
            .find(|e| e.weight().prod != e.weight().cons);
        if let Some(edge) = multi_rate {
            return Err(Error::malformed(format!(
                "graph `{}' is not single-rate: edge `{}' -> `{}' has rates {}/{}",
                graph.name,
                graph.actor(edge.source()).name,
                graph.actor(edge.target()).name,
                edge.weight().prod,
                edge.weight().cons
            )));
        }
        Ok(())
    }
}
