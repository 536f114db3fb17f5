use super::GraphSimulation;
use dfeval_ir::{self as ir, ActorIdx};
use dfeval_utils::{EvalResult, math, measure_time};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

/// Progress of an [AsapScheduler].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Starting the firings enabled at time 0.
    Initializing,
    /// Processing completions in order of finish time.
    Stepping,
    /// Every actor completed its firings for the iteration.
    Completed,
    /// No firing is in flight but some actor has firings left.
    Deadlocked,
}

/// Outcome of an ASAP simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsapResult {
    /// Latest finish time observed during the iteration.
    pub iteration_duration: f64,
    /// Did the iteration complete?
    pub live: bool,
    pub state: SchedulerState,
}

impl AsapResult {
    /// Iterations per time unit. Infinite when the iteration takes no time.
    pub fn throughput(&self) -> f64 {
        if self.iteration_duration > 0.0 {
            1.0 / self.iteration_duration
        } else {
            f64::INFINITY
        }
    }
}

/// Self-timed execution of one iteration of a graph: every actor fires as
/// soon as it has enough tokens, with unbounded buffers.
///
/// Firings in flight are grouped by finish time. At each step the earliest
/// group completes: its actors produce their tokens, and only then are the
/// actors downstream of them started with as many firings as they are
/// enabled for. Firings started at the same time by the same actor are
/// merged into one entry.
pub struct AsapScheduler<'g> {
    sim: GraphSimulation<'g>,
    /// Firings in flight: finish time -> actor -> number of firings.
    executions: BTreeMap<OrderedFloat<f64>, BTreeMap<ActorIdx, u64>>,
    iteration_duration: f64,
    state: SchedulerState,
}

impl<'g> AsapScheduler<'g> {
    pub fn new(graph: &'g ir::Graph) -> Self {
        AsapScheduler {
            sim: GraphSimulation::new(graph),
            executions: BTreeMap::new(),
            iteration_duration: 0.0,
            state: SchedulerState::Initializing,
        }
    }

    /// Simulate one iteration of `graph` and report its duration and whether
    /// it completed.
    pub fn schedule(graph: &'g ir::Graph) -> EvalResult<AsapResult> {
        ir::validate_graph(graph)?;
        measure_time("asap-schedule", || {
            let mut scheduler = AsapScheduler::new(graph);
            scheduler.run()?;
            Ok(scheduler.result())
        })
    }

    /// Run the simulation to completion or deadlock.
    pub fn run(&mut self) -> EvalResult<SchedulerState> {
        while !self.is_done() {
            self.step()?;
        }
        Ok(self.state)
    }

    pub fn is_done(&self) -> bool {
        matches!(
            self.state,
            SchedulerState::Completed | SchedulerState::Deadlocked
        )
    }

    /// Advance the simulation by one transition: start the initial firings,
    /// complete the earliest group of firings, or finish.
    pub fn step(&mut self) -> EvalResult<SchedulerState> {
        match self.state {
            SchedulerState::Initializing => {
                let graph = self.sim.graph();
                for actor in graph.actor_indices() {
                    self.fire(actor, 0.0)?;
                }
                self.state = SchedulerState::Stepping;
            }
            SchedulerState::Stepping => match self.executions.pop_first() {
                Some((OrderedFloat(t), bucket)) => self.complete(t, bucket)?,
                None => self.finish(),
            },
            SchedulerState::Completed | SchedulerState::Deadlocked => (),
        }
        Ok(self.state)
    }

    /// Complete the firings of `bucket` at time `t`.
    fn complete(
        &mut self,
        t: f64,
        bucket: BTreeMap<ActorIdx, u64>,
    ) -> EvalResult<()> {
        self.iteration_duration = self.iteration_duration.max(t);
        log::debug!(
            "t={t}: completing {}",
            bucket
                .iter()
                .map(|(a, n)| {
                    format!("{}x{n}", self.sim.graph().actor(*a).name)
                })
                .join(", ")
        );
        for (&actor, &n) in &bucket {
            self.sim.produce(actor, n)?;
        }
        let graph = self.sim.graph();
        let downstream = bucket
            .keys()
            .flat_map(|&actor| graph.successors(actor))
            .sorted()
            .dedup()
            .collect_vec();
        for actor in downstream {
            self.fire(actor, t)?;
        }
        Ok(())
    }

    /// Start every firing of `actor` enabled at time `t`.
    fn fire(&mut self, actor: ActorIdx, t: f64) -> EvalResult<()> {
        let n = self.sim.max_firings_for_one_iteration(actor);
        if n == 0 {
            return Ok(());
        }
        self.sim.consume(actor, n)?;
        self.sim.set_start_date(actor, t);
        let finish = t + self.sim.actor_duration(actor);
        self.sim.set_finish_date(actor, finish);
        let entry = self
            .executions
            .entry(OrderedFloat(finish))
            .or_default()
            .entry(actor)
            .or_insert(0);
        *entry = math::checked_add(*entry, n, "firings in flight")?;
        Ok(())
    }

    fn finish(&mut self) {
        if self.sim.is_iteration_completed() {
            self.state = SchedulerState::Completed;
        } else {
            let graph = self.sim.graph();
            log::warn!(
                "{}: deadlocked after {}, waiting: {}",
                graph.name,
                self.iteration_duration,
                self.sim
                    .pending_actors()
                    .into_iter()
                    .map(|a| format!(
                        "{} ({}/{})",
                        graph.actor(a).name,
                        self.sim.firings(a),
                        graph.actor(a).repetitions
                    ))
                    .join(", ")
            );
            self.state = SchedulerState::Deadlocked;
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The token ledger driving the simulation.
    pub fn simulation(&self) -> &GraphSimulation<'g> {
        &self.sim
    }

    /// Outcome so far. Final once [Self::is_done] holds.
    pub fn result(&self) -> AsapResult {
        AsapResult {
            iteration_duration: self.iteration_duration,
            live: self.state == SchedulerState::Completed,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        abc326, abc326_with_rates, init_logging, parallel_edges,
    };
    use crate::passes::SdfTransformer;
    use dfeval_ir::Builder;

    #[test]
    fn abc326_takes_three_time_units() {
        init_logging();
        for g in [abc326(), abc326_with_rates((2, 3), (9, 3), (2, 4))] {
            let res = AsapScheduler::schedule(&g).unwrap();
            assert_eq!(res.iteration_duration, 3.0);
            assert!(res.live);
            assert_eq!(res.state, SchedulerState::Completed);
            assert!((res.throughput() - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn expansions_take_as_long_as_the_sdf_graph() {
        let g = abc326();
        let sr = SdfTransformer::to_srsdf(&g).unwrap();
        let h = SdfTransformer::to_reduced_hsdf(&g).unwrap();
        for expanded in [sr, h] {
            let res = AsapScheduler::schedule(&expanded).unwrap();
            assert_eq!(res.iteration_duration, 3.0);
            assert!(res.live);
        }
    }

    #[test]
    fn durations_are_taken_into_account() {
        let mut g = abc326();
        for (name, d) in [("A", 2.0), ("B", 0.5), ("C", 1.5)] {
            let idx = g.find_actor(name).unwrap();
            g.actor_mut(idx).duration = d;
        }
        let res = AsapScheduler::schedule(&g).unwrap();
        assert_eq!(res.iteration_duration, 4.0);
        assert!(res.live);
    }

    #[test]
    fn no_tokens_means_deadlock() {
        init_logging();
        let mut g = abc326();
        g.edges_mut().for_each(|e| e.delay = 0);
        let res = AsapScheduler::schedule(&g).unwrap();
        assert!(!res.live);
        assert_eq!(res.state, SchedulerState::Deadlocked);
        assert_eq!(res.iteration_duration, 0.0);
        assert_eq!(res.throughput(), f64::INFINITY);
    }

    #[test]
    fn parallel_edges_gate_firings_together() {
        // X fires twice at 0, then Y needs both X -> Y edges to fire its
        // three firings at 1
        let g = parallel_edges(4, 6);
        let res = AsapScheduler::schedule(&g).unwrap();
        assert!(res.live);
        assert_eq!(res.iteration_duration, 2.0);
        let sr = SdfTransformer::to_srsdf(&g).unwrap();
        assert_eq!(AsapScheduler::schedule(&sr).unwrap(), res);

        // with a single token on the second edge Y only fires once
        let starved = parallel_edges(1, 3);
        let res = AsapScheduler::schedule(&starved).unwrap();
        assert_eq!(res.state, SchedulerState::Deadlocked);
        let sr = SdfTransformer::to_srsdf(&starved).unwrap();
        assert!(!AsapScheduler::schedule(&sr).unwrap().live);
    }

    #[test]
    fn states_are_observable() {
        let g = abc326();
        let mut scheduler = AsapScheduler::new(&g);
        assert_eq!(scheduler.state(), SchedulerState::Initializing);
        assert_eq!(scheduler.step().unwrap(), SchedulerState::Stepping);
        // only B could start
        let b = g.find_actor("B").unwrap();
        assert_eq!(scheduler.simulation().firings(b), 2);
        assert_eq!(scheduler.run().unwrap(), SchedulerState::Completed);
        assert!(scheduler.is_done());
        // further steps do nothing
        assert_eq!(scheduler.step().unwrap(), SchedulerState::Completed);
        assert_eq!(scheduler.result().iteration_duration, 3.0);
    }

    #[test]
    fn zero_duration_actors_fire_in_the_same_instant() {
        let mut g = ir::Graph::new("instant");
        let mut b = Builder::new(&mut g);
        b.add_actor("S", 2, 1.0).unwrap();
        b.add_actor("Z", 1, 0.0).unwrap();
        b.add_actor("T", 2, 1.0).unwrap();
        b.add_edge("S", "Z", 1, 2, 0).unwrap();
        b.add_edge("Z", "T", 2, 1, 0).unwrap();
        let res = AsapScheduler::schedule(&g).unwrap();
        assert!(res.live);
        assert_eq!(res.iteration_duration, 2.0);
    }

    #[test]
    fn malformed_graph_is_rejected() {
        let mut g = abc326();
        g.actors_mut().for_each(|a| a.duration = f64::NAN);
        assert!(AsapScheduler::schedule(&g).unwrap_err().is_structural());
    }
}
