//! IR Builder. Provides convenience methods to build graphs by actor name.
use crate::{
    Actor, ActorIdx, Direction, Edge, EdgeIdx, Graph, GraphIdx, Id, Port,
};
use dfeval_utils::{Error, EvalResult};

/// IR builder.
/// Uses the names of actors to connect them and rejects duplicate names.
pub struct Builder<'a> {
    /// Graph for which this builder constructs actors and edges.
    pub graph: &'a mut Graph,
}

impl<'a> Builder<'a> {
    /// Instantiate a new builder over the given graph.
    pub fn new(graph: &'a mut Graph) -> Self {
        Self { graph }
    }

    /// Add an atomic actor firing `repetitions` times per iteration, each
    /// firing taking `duration`.
    pub fn add_actor<S: Into<Id>>(
        &mut self,
        name: S,
        repetitions: u64,
        duration: f64,
    ) -> EvalResult<ActorIdx> {
        self.insert(Actor::atomic(name, repetitions, duration))
    }

    /// Add an actor described by the nested graph `refinement`.
    pub fn add_hierarchical_actor<S: Into<Id>>(
        &mut self,
        name: S,
        repetitions: u64,
        refinement: GraphIdx,
    ) -> EvalResult<ActorIdx> {
        self.insert(Actor::hierarchical(name, repetitions, refinement))
    }

    /// Add an interface actor.
    pub fn add_interface<S: Into<Id>>(
        &mut self,
        name: S,
        direction: Direction,
        repetitions: u64,
    ) -> EvalResult<ActorIdx> {
        self.insert(Actor::interface(name, direction, repetitions))
    }

    /// Add an edge between two named actors with generated port names.
    pub fn add_edge<S: Into<Id>, T: Into<Id>>(
        &mut self,
        src: S,
        dst: T,
        prod: u64,
        cons: u64,
        delay: u64,
    ) -> EvalResult<EdgeIdx> {
        let src = self.lookup(src.into())?;
        let dst = self.lookup(dst.into())?;
        self.graph.connect(src, dst, prod, cons, delay)
    }

    /// Add an edge between two named actors using the given port names.
    #[allow(clippy::too_many_arguments)]
    pub fn add_edge_with_ports<S: Into<Id>, T: Into<Id>>(
        &mut self,
        src: S,
        src_port: &str,
        dst: T,
        dst_port: &str,
        prod: u64,
        cons: u64,
        delay: u64,
    ) -> EvalResult<EdgeIdx> {
        let src = self.lookup(src.into())?;
        let dst = self.lookup(dst.into())?;
        let edge = Edge::new(
            Port::output(src_port),
            Port::input(dst_port),
            prod,
            cons,
            delay,
        );
        self.graph.add_edge(src, dst, edge)
    }

    fn lookup(&self, name: Id) -> EvalResult<ActorIdx> {
        self.graph.find_actor(name).ok_or_else(|| {
            Error::malformed(format!(
                "actor `{name}' is not defined in graph `{}'",
                self.graph.name
            ))
        })
    }

    fn insert(&mut self, actor: Actor) -> EvalResult<ActorIdx> {
        if self.graph.find_actor(actor.name).is_some() {
            return Err(Error::malformed(format!(
                "actor `{}' is already defined in graph `{}'",
                actor.name, self.graph.name
            )));
        }
        log::trace!("{}: adding actor `{}'", self.graph.name, actor.name);
        Ok(self.graph.add_actor(actor))
    }
}
