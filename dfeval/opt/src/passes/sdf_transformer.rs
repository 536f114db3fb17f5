use super::SrSdfTransformer;
use dfeval_ir::{self as ir, ActorIdx, EdgeRef};
use dfeval_utils::{Error, EvalResult, math, measure_time};

/// How consecutive tokens of one edge are grouped into expanded edges.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Expansion {
    /// One unit-rate edge per token.
    Homogeneous,
    /// Consecutive tokens sent by the same source instance to the same
    /// target instance in the same iteration share one edge.
    SingleRate,
}

/// Expands multi-rate SDF graphs by instantiating every actor once per
/// firing of an iteration.
///
/// Actor `a` with repetition count `N(a)` becomes the instances
/// `a_1 .. a_N(a)`, each firing once per iteration. The `k`-th token sent by
/// `a_i` on an edge `(a -> b, p, c, d)` is token number
/// `t = d + (i-1)*p + (k-1)` of the edge. With `Cb = c * N(b)` tokens
/// consumed by `b` per iteration, it is read by `b_j` with
/// `j = (t mod Cb) / c + 1`, `t / Cb` iterations later.
pub struct SdfTransformer;

impl SdfTransformer {
    /// SDF => HSDF. Every edge of the result carries one token per firing.
    pub fn to_hsdf(sdf: &ir::Graph) -> EvalResult<ir::Graph> {
        ir::validate_graph(sdf)?;
        measure_time("sdf-to-hsdf", || {
            Self::expand(sdf, Expansion::Homogeneous)
        })
    }

    /// SDF => srSDF. Like [Self::to_hsdf] but coalesces runs of tokens that
    /// share a source instance, a target instance and a delay into a single
    /// edge whose rate is the length of the run.
    pub fn to_srsdf(sdf: &ir::Graph) -> EvalResult<ir::Graph> {
        ir::validate_graph(sdf)?;
        measure_time("sdf-to-srsdf", || {
            Self::expand(sdf, Expansion::SingleRate)
        })
    }

    /// SDF => srSDF => HSDF. Same precedences as [Self::to_hsdf] with fewer
    /// edges.
    pub fn to_reduced_hsdf(sdf: &ir::Graph) -> EvalResult<ir::Graph> {
        ir::validate_graph(sdf)?;
        measure_time("sdf-to-reduced-hsdf", || {
            let srsdf = Self::expand(sdf, Expansion::SingleRate)?;
            let mut hsdf = SrSdfTransformer::to_hsdf(&srsdf)?;
            hsdf.name = format!("{}_HSDF", sdf.name).into();
            Ok(hsdf)
        })
    }

    /// SDF => srSDF => DAG. Only the precedences inside one iteration remain.
    pub fn to_dag(sdf: &ir::Graph) -> EvalResult<ir::Graph> {
        ir::validate_graph(sdf)?;
        measure_time("sdf-to-dag", || {
            let srsdf = Self::expand(sdf, Expansion::SingleRate)?;
            let mut dag = SrSdfTransformer::to_dag(&srsdf)?;
            dag.name = format!("{}_DAG", sdf.name).into();
            Ok(dag)
        })
    }

    fn expand(sdf: &ir::Graph, mode: Expansion) -> EvalResult<ir::Graph> {
        let suffix = match mode {
            Expansion::Homogeneous => "HSDF",
            Expansion::SingleRate => "srSDF",
        };
        let (actors, edges) = Self::expansion_size(sdf, mode)?;
        let mut out = ir::Graph::with_capacity(
            format!("{}_{suffix}", sdf.name),
            actors,
            edges,
        );

        // instances[a][i - 1] is the instance a_i
        let mut instances: Vec<Vec<ActorIdx>> =
            Vec::with_capacity(sdf.actor_count());
        for (idx, actor) in sdf.actors() {
            let copies = (1..=actor.repetitions)
                .map(|i| out.add_actor(actor.instance(idx, i)))
                .collect();
            log::debug!(
                "{}: {} instances of `{}'",
                out.name,
                actor.repetitions,
                actor.name
            );
            instances.push(copies);
        }
        let instance = |actor: ActorIdx, i: u64| -> ActorIdx {
            instances[actor.index()][(i - 1) as usize]
        };

        for edge in sdf.edges() {
            let (src, dst) = (edge.source(), edge.target());
            let ir::Edge {
                prod: p,
                cons: c,
                delay: d,
                ..
            } = *edge.weight();
            let cb = math::checked_mul(
                c,
                sdf.actor(dst).repetitions,
                "tokens consumed per iteration",
            )?;
            for i in 1..=sdf.actor(src).repetitions {
                // index of the first token sent by a_i
                let first = math::checked_add(
                    d,
                    math::checked_mul(i - 1, p, "token index")?,
                    "token index",
                )?;
                let mut k = 1;
                while k <= p {
                    let t = math::checked_add(first, k - 1, "token index")?;
                    let slot = t % cb;
                    let j = slot / c + 1;
                    let iterations = t / cb;
                    let m = match mode {
                        Expansion::Homogeneous => 1,
                        Expansion::SingleRate => {
                            // l is the position of the token among the c
                            // tokens consumed by one firing of b_j
                            let l = slot % c + 1;
                            (p - (k - 1)).min(c - (l - 1))
                        }
                    };
                    let delay =
                        math::checked_mul(iterations, m, "expanded delay")?;
                    let idx = out.connect(
                        instance(src, i),
                        instance(dst, j),
                        m,
                        m,
                        delay,
                    )?;
                    out.edge_mut(idx).base_edge = Some(edge.id());
                    k += m;
                }
            }
        }
        Ok(out)
    }

    /// Number of instances of the expansion of `sdf` and an upper bound on
    /// its number of edges. Both must fit the index space of a graph.
    fn expansion_size(
        sdf: &ir::Graph,
        mode: Expansion,
    ) -> EvalResult<(usize, usize)> {
        let instances = sdf.actors().try_fold(0, |n, (_, actor)| {
            math::checked_add(n, actor.repetitions, "actor instances")
        })?;
        let edges = sdf.edges().try_fold(0, |n, edge| {
            let src = sdf.actor(edge.source()).repetitions;
            let tokens = math::checked_mul(
                edge.weight().prod,
                src,
                "tokens per iteration",
            )?;
            let derived = match mode {
                Expansion::Homogeneous => tokens,
                // a run of tokens ends when the source or the target
                // instance changes
                Expansion::SingleRate => {
                    let dst = sdf.actor(edge.target()).repetitions;
                    tokens.min(math::checked_add(src, dst, "expanded edges")?)
                }
            };
            math::checked_add(n, derived, "expanded edges")
        })?;
        for (what, n) in [("actor instances", instances), ("edges", edges)] {
            if n > u64::from(u32::MAX) {
                return Err(Error::arithmetic(format!(
                    "expanding `{}' needs up to {n} {what}, more than a graph can index",
                    sdf.name
                )));
            }
        }
        Ok((instances as usize, edges as usize))
    }
}
