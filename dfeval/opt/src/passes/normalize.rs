use dfeval_ir::{self as ir, EdgeRef};
use dfeval_utils::{EvalResult, math, measure_time};
use itertools::Itertools;

/// Annotate `graph` for periodic-schedule analyses.
///
/// With `K` the least common multiple of all repetition counts, every actor
/// `a` gets `normalized_rate = K / N(a)` and every edge `a -> b` with
/// consumption rate `c` gets `normalization_factor = K / (c * N(b))`. On a
/// balanced graph the factor also equals `normalized_rate(a) / p`.
///
/// Only the two annotations are written. Actors and edges are neither added,
/// removed nor otherwise modified.
pub fn normalize(graph: &mut ir::Graph) -> EvalResult<()> {
    ir::validate_graph(graph)?;
    measure_time("normalize", || {
        let k = math::lcm_all(graph.actors().map(|(_, a)| a.repetitions))?;
        log::debug!("{}: normalization period {k}", graph.name);

        // Compute everything before writing so a failure leaves the graph
        // untouched.
        let factors = graph
            .edges()
            .map(|e| {
                let consumed = math::checked_mul(
                    e.weight().cons,
                    graph.actor(e.target()).repetitions,
                    "tokens consumed per iteration",
                )?;
                Ok((e.id(), k as f64 / consumed as f64))
            })
            .collect::<EvalResult<Vec<_>>>()?;

        for actor in graph.actors_mut() {
            actor.normalized_rate = Some(k / actor.repetitions);
        }
        for (idx, factor) in factors {
            graph.edge_mut(idx).normalization_factor = Some(factor);
        }
        Ok(())
    })
}

/// The normalized rates of a graph, by actor name. Actors without an
/// annotation are skipped.
pub fn normalized_rates(graph: &ir::Graph) -> Vec<(ir::Id, u64)> {
    graph
        .actors()
        .filter_map(|(_, a)| a.normalized_rate.map(|z| (a.name, z)))
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::abc326;

    #[test]
    fn normalizes_abc326() {
        let mut g = abc326();
        normalize(&mut g).unwrap();
        let rates = normalized_rates(&g)
            .into_iter()
            .map(|(name, z)| (name.to_string(), z))
            .collect_vec();
        assert_eq!(
            rates,
            vec![("A".into(), 2), ("B".into(), 3), ("C".into(), 1)]
        );
        for e in g.edges() {
            let z = g.actor(e.source()).normalized_rate.unwrap() as f64;
            let expected = z / e.weight().prod as f64;
            assert_eq!(e.weight().normalization_factor, Some(expected));
        }
    }

    #[test]
    fn structure_is_unchanged() {
        let before = abc326();
        let mut after = before.clone();
        normalize(&mut after).unwrap();
        assert_eq!(before.actor_count(), after.actor_count());
        assert_eq!(before.edge_count(), after.edge_count());
        for (x, y) in before.edges().zip(after.edges()) {
            assert_eq!((x.source(), x.target()), (y.source(), y.target()));
            let (x, y) = (x.weight(), y.weight());
            assert_eq!((x.prod, x.cons, x.delay), (y.prod, y.cons, y.delay));
        }
        for ((_, x), (_, y)) in before.actors().zip(after.actors()) {
            assert_eq!((x.name, x.repetitions), (y.name, y.repetitions));
        }
    }

    #[test]
    fn overflowing_period_leaves_graph_untouched() {
        let mut g = ir::Graph::new("big");
        let mut b = dfeval_ir::Builder::new(&mut g);
        b.add_actor("X", u64::MAX, 1.0).unwrap();
        b.add_actor("Y", u64::MAX - 1, 1.0).unwrap();
        assert!(normalize(&mut g).is_err());
        assert!(g.actors().all(|(_, a)| a.normalized_rate.is_none()));
    }
}
