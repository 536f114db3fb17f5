use dfeval_ir::{self as ir, ActorIdx, EdgeIdx, EdgeRef};
use dfeval_utils::{Error, EvalResult, math};
use itertools::Itertools;

/// Token ledger for simulating one iteration of a graph.
///
/// Tracks the number of tokens on every edge, starting from the edge delays,
/// the number of times every actor has fired, and the most recent start and
/// finish dates of every actor. The ledger borrows the graph and is meant to
/// live for a single simulation.
#[derive(Debug, Clone)]
pub struct GraphSimulation<'g> {
    graph: &'g ir::Graph,
    /// Tokens on each edge, by edge index.
    tokens: Vec<u64>,
    /// Firings so far, by actor index.
    firings: Vec<u64>,
    start: Vec<f64>,
    finish: Vec<f64>,
}

impl<'g> GraphSimulation<'g> {
    pub fn new(graph: &'g ir::Graph) -> Self {
        let mut tokens = vec![0; graph.edge_count()];
        for edge in graph.edges() {
            tokens[edge.id().index()] = edge.weight().delay;
        }
        let actors = graph.actor_count();
        GraphSimulation {
            graph,
            tokens,
            firings: vec![0; actors],
            start: vec![0.0; actors],
            finish: vec![0.0; actors],
        }
    }

    pub fn graph(&self) -> &'g ir::Graph {
        self.graph
    }

    /// Add the tokens produced by `n` firings of `actor` to its outgoing
    /// edges.
    pub fn produce(&mut self, actor: ActorIdx, n: u64) -> EvalResult<()> {
        for edge in self.graph.outgoing(actor) {
            let added =
                math::checked_mul(n, edge.weight().prod, "tokens produced")?;
            let slot = &mut self.tokens[edge.id().index()];
            *slot = math::checked_add(*slot, added, "tokens on edge")?;
            log::trace!(
                "{} produced {added} tokens on `{}' ({} now)",
                self.graph.actor(actor).name,
                edge.weight().src_port.name,
                *slot
            );
        }
        Ok(())
    }

    /// Remove the tokens consumed by `n` firings of `actor` from its incoming
    /// edges and count the firings. Fails without modifying the ledger if an
    /// edge does not hold enough tokens.
    pub fn consume(&mut self, actor: ActorIdx, n: u64) -> EvalResult<()> {
        let updates = self
            .graph
            .incoming(actor)
            .map(|edge| {
                let idx = edge.id().index();
                let needed = math::checked_mul(
                    n,
                    edge.weight().cons,
                    "tokens consumed",
                )?;
                let left = self.tokens[idx].checked_sub(needed).ok_or_else(|| {
                    Error::arithmetic(format!(
                        "{} firings of `{}' need {needed} tokens on `{}' but only {} are available",
                        n,
                        self.graph.actor(actor).name,
                        edge.weight().dst_port.name,
                        self.tokens[idx]
                    ))
                })?;
                Ok((idx, left))
            })
            .collect::<EvalResult<Vec<_>>>()?;
        let fired = math::checked_add(
            self.firings[actor.index()],
            n,
            "firing count",
        )?;
        for (idx, left) in updates {
            self.tokens[idx] = left;
        }
        self.firings[actor.index()] = fired;
        log::trace!(
            "{} fired {n} times ({fired} so far)",
            self.graph.actor(actor).name
        );
        Ok(())
    }

    /// Number of firings of `actor` that are enabled by the tokens currently
    /// available, without exceeding its repetition count for the iteration.
    /// An actor without inputs is only limited by its repetition count.
    pub fn max_firings_for_one_iteration(&self, actor: ActorIdx) -> u64 {
        let remaining = self
            .graph
            .actor(actor)
            .repetitions
            .saturating_sub(self.firings[actor.index()]);
        self.graph
            .incoming(actor)
            .map(|edge| self.tokens[edge.id().index()] / edge.weight().cons)
            .min()
            .map_or(remaining, |enabled| enabled.min(remaining))
    }

    /// True once every actor has fired exactly as many times as its
    /// repetition count.
    pub fn is_iteration_completed(&self) -> bool {
        self.graph
            .actors()
            .all(|(idx, a)| self.firings[idx.index()] == a.repetitions)
    }

    /// Actors that have not completed their firings.
    pub fn pending_actors(&self) -> Vec<ActorIdx> {
        self.graph
            .actors()
            .filter(|(idx, a)| self.firings[idx.index()] != a.repetitions)
            .map(|(idx, _)| idx)
            .collect_vec()
    }

    pub fn tokens(&self, edge: EdgeIdx) -> u64 {
        self.tokens[edge.index()]
    }

    pub fn firings(&self, actor: ActorIdx) -> u64 {
        self.firings[actor.index()]
    }

    pub fn actor_duration(&self, actor: ActorIdx) -> f64 {
        self.graph.actor(actor).duration
    }

    pub fn set_start_date(&mut self, actor: ActorIdx, date: f64) {
        self.start[actor.index()] = date;
    }

    pub fn start_date(&self, actor: ActorIdx) -> f64 {
        self.start[actor.index()]
    }

    pub fn set_finish_date(&mut self, actor: ActorIdx, date: f64) {
        self.finish[actor.index()] = date;
    }

    pub fn finish_date(&self, actor: ActorIdx) -> f64 {
        self.finish[actor.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::abc326;

    #[test]
    fn initial_tokens_enable_b() {
        let g = abc326();
        let sim = GraphSimulation::new(&g);
        let [a, b, c] = ["A", "B", "C"].map(|n| g.find_actor(n).unwrap());
        assert_eq!(sim.max_firings_for_one_iteration(a), 0);
        assert_eq!(sim.max_firings_for_one_iteration(b), 2);
        assert_eq!(sim.max_firings_for_one_iteration(c), 0);
        assert!(!sim.is_iteration_completed());
    }

    #[test]
    fn produce_then_consume() {
        let g = abc326();
        let mut sim = GraphSimulation::new(&g);
        let [a, b, c] = ["A", "B", "C"].map(|n| g.find_actor(n).unwrap());
        let ab = g.outgoing(a).next().unwrap().id();
        let bc = g.outgoing(b).next().unwrap().id();

        sim.consume(b, 2).unwrap();
        assert_eq!(sim.tokens(ab), 0);
        assert_eq!(sim.firings(b), 2);
        // quota exhausted even if tokens come back
        sim.produce(a, 3).unwrap();
        assert_eq!(sim.tokens(ab), 6);
        assert_eq!(sim.max_firings_for_one_iteration(b), 0);

        sim.produce(b, 2).unwrap();
        assert_eq!(sim.tokens(bc), 6);
        assert_eq!(sim.max_firings_for_one_iteration(c), 6);
        assert_eq!(sim.pending_actors(), vec![a, c]);
    }

    #[test]
    fn consuming_missing_tokens_fails_cleanly() {
        let g = abc326();
        let mut sim = GraphSimulation::new(&g);
        let c = g.find_actor("C").unwrap();
        assert!(sim.consume(c, 1).is_err());
        assert_eq!(sim.firings(c), 0);
    }

    #[test]
    fn source_is_limited_by_quota() {
        let mut g = ir::Graph::new("src");
        let mut b = dfeval_ir::Builder::new(&mut g);
        let s = b.add_actor("S", 4, 1.0).unwrap();
        b.add_actor("T", 2, 1.0).unwrap();
        b.add_edge("S", "T", 1, 2, 0).unwrap();
        let mut sim = GraphSimulation::new(&g);
        assert_eq!(sim.max_firings_for_one_iteration(s), 4);
        sim.consume(s, 3).unwrap();
        assert_eq!(sim.max_firings_for_one_iteration(s), 1);

        sim.set_start_date(s, 1.5);
        sim.set_finish_date(s, 1.5 + sim.actor_duration(s));
        assert_eq!(sim.start_date(s), 1.5);
        assert_eq!(sim.finish_date(s), 2.5);
    }
}
