use dfeval_ir::{self as ir, ActorIdx, EdgeRef};
use dfeval_utils::{Error, EvalResult, math};
use itertools::Itertools;
use num_integer::Integer;
use std::collections::VecDeque;

/// A positive rational number kept in lowest terms.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Ratio {
    num: u64,
    den: u64,
}

impl Ratio {
    const ONE: Ratio = Ratio { num: 1, den: 1 };

    /// `self * mul / div`.
    fn scale(self, mul: u64, div: u64) -> EvalResult<Ratio> {
        let g1 = self.num.gcd(&div);
        let g2 = mul.gcd(&self.den);
        let num = math::checked_mul(self.num / g1, mul / g2, "firing ratio")?;
        let den = math::checked_mul(self.den / g2, div / g1, "firing ratio")?;
        let g = num.gcd(&den);
        Ok(Ratio {
            num: num / g,
            den: den / g,
        })
    }
}

/// Minimal number of firings of each actor in one iteration of a graph.
///
/// Solves the balance equation `p * N(src) = c * N(dst)` of every edge. Each
/// weakly connected component gets its own minimal positive solution, and
/// an isolated actor fires once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepetitionVector {
    counts: Vec<u64>,
}

impl RepetitionVector {
    /// Compute the repetition vector of `graph`. The current repetition
    /// counts of its actors are ignored.
    pub fn compute(graph: &ir::Graph) -> EvalResult<Self> {
        if let Some(edge) = graph
            .edges()
            .find(|e| e.weight().prod == 0 || e.weight().cons == 0)
        {
            return Err(Error::malformed(format!(
                "edge `{}' -> `{}' in graph `{}' has a zero rate",
                graph.actor(edge.source()).name,
                graph.actor(edge.target()).name,
                graph.name
            )));
        }

        let mut ratios: Vec<Option<Ratio>> = vec![None; graph.actor_count()];
        let mut counts = vec![0; graph.actor_count()];
        for root in graph.actor_indices() {
            if ratios[root.index()].is_some() {
                continue;
            }
            let component = Self::propagate(graph, root, &mut ratios)?;
            let lcm = math::lcm_all(
                component.iter().map(|(_, r)| r.den),
            )?;
            let scaled = component
                .iter()
                .map(|(a, r)| {
                    math::checked_mul(r.num, lcm / r.den, "repetition count")
                        .map(|n| (*a, n))
                })
                .collect::<EvalResult<Vec<_>>>()?;
            let gcd = scaled.iter().fold(0, |g, (_, n)| n.gcd(&g));
            for (a, n) in scaled {
                counts[a.index()] = n / gcd;
            }
        }
        log::debug!(
            "{}: repetition vector [{}]",
            graph.name,
            graph
                .actors()
                .map(|(idx, a)| format!("{}={}", a.name, counts[idx.index()]))
                .join(", ")
        );
        Ok(RepetitionVector { counts })
    }

    /// Breadth-first propagation of firing ratios from `root` over the edges
    /// in both directions. Returns the actors of the component.
    fn propagate(
        graph: &ir::Graph,
        root: ActorIdx,
        ratios: &mut [Option<Ratio>],
    ) -> EvalResult<Vec<(ActorIdx, Ratio)>> {
        ratios[root.index()] = Some(Ratio::ONE);
        let mut component = vec![(root, Ratio::ONE)];
        let mut queue = VecDeque::from([root]);
        while let Some(actor) = queue.pop_front() {
            let Some(rate) = ratios[actor.index()] else {
                continue;
            };
            let forward = graph
                .outgoing(actor)
                .map(|e| (e.target(), e.weight().prod, e.weight().cons));
            let backward = graph
                .incoming(actor)
                .map(|e| (e.source(), e.weight().cons, e.weight().prod));
            for (next, mul, div) in forward.chain(backward).collect_vec() {
                let expected = rate.scale(mul, div)?;
                match ratios[next.index()] {
                    None => {
                        ratios[next.index()] = Some(expected);
                        component.push((next, expected));
                        queue.push_back(next);
                    }
                    Some(found) if found != expected => {
                        return Err(Error::inconsistent_rates(format!(
                            "graph `{}': actor `{}' would have to fire both {}/{} and {}/{} times as often as `{}'",
                            graph.name,
                            graph.actor(next).name,
                            found.num,
                            found.den,
                            expected.num,
                            expected.den,
                            graph.actor(root).name
                        )));
                    }
                    Some(_) => (),
                }
            }
        }
        Ok(component)
    }

    /// Number of firings of `actor` per iteration.
    pub fn get(&self, actor: ActorIdx) -> u64 {
        self.counts[actor.index()]
    }

    /// Counts in actor index order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Write the counts into the repetition counts of the actors of `graph`,
    /// which must be the graph the vector was computed for.
    pub fn apply(&self, graph: &mut ir::Graph) -> EvalResult<()> {
        if graph.actor_count() != self.counts.len() {
            return Err(Error::misc(format!(
                "repetition vector has {} entries but graph `{}' has {} actors",
                self.counts.len(),
                graph.name,
                graph.actor_count()
            )));
        }
        for (actor, n) in graph.actors_mut().zip(&self.counts) {
            actor.repetitions = *n;
        }
        Ok(())
    }
}
