use crate::{Actor, Edge, Id, Port};
use dfeval_utils::{Error, EvalResult};
use itertools::Itertools;
use petgraph::{
    Direction::{Incoming, Outgoing},
    graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex},
    visit::EdgeRef,
};

/// Index of an actor in its [Graph].
pub type ActorIdx = NodeIndex;
/// Index of an edge in its [Graph].
pub type EdgeIdx = EdgeIndex;

/// In memory representation of a synchronous dataflow graph.
///
/// A petgraph::DiGraph where actors are the nodes and every directed edge
/// `X -> Y` is a FIFO channel from `X` to `Y`. Parallel edges between the
/// same pair of actors are allowed.
///
/// Indices are handed out in insertion order and stay stable as long as no
/// edge or actor is removed. Transformations never remove anything in place:
/// they build a fresh graph instead.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Name of the graph.
    pub name: Id,
    graph: DiGraph<Actor, Edge>,
}

impl Graph {
    pub fn new<S: Into<Id>>(name: S) -> Self {
        Graph {
            name: name.into(),
            graph: DiGraph::new(),
        }
    }

    /// Construct an empty graph with room for the given number of actors and
    /// edges.
    pub fn with_capacity<S: Into<Id>>(
        name: S,
        actors: usize,
        edges: usize,
    ) -> Self {
        Graph {
            name: name.into(),
            graph: DiGraph::with_capacity(actors, edges),
        }
    }

    pub fn add_actor(&mut self, actor: Actor) -> ActorIdx {
        self.graph.add_node(actor)
    }

    /// Add an edge from `src` to `dst`. Fails if either endpoint is not an
    /// actor of this graph.
    pub fn add_edge(
        &mut self,
        src: ActorIdx,
        dst: ActorIdx,
        edge: Edge,
    ) -> EvalResult<EdgeIdx> {
        for (end, idx) in [("source", src), ("target", dst)] {
            if !self.contains_actor(idx) {
                return Err(Error::malformed(format!(
                    "{end} actor #{} of edge `{}' -> `{}' is not in graph `{}'",
                    idx.index(),
                    edge.src_port.name,
                    edge.dst_port.name,
                    self.name
                )));
            }
        }
        Ok(self.graph.add_edge(src, dst, edge))
    }

    /// Add an edge with generated port names: the source gets `out<n>` and
    /// the target `in<m>` where `n` and `m` count the ports already present.
    pub fn connect(
        &mut self,
        src: ActorIdx,
        dst: ActorIdx,
        prod: u64,
        cons: u64,
        delay: u64,
    ) -> EvalResult<EdgeIdx> {
        let (src_port, dst_port) = self.fresh_ports(src, dst);
        self.add_edge(
            src,
            dst,
            Edge::new(src_port, dst_port, prod, cons, delay),
        )
    }

    /// Generate names for a new output port on `src` and a new input port on
    /// `dst`.
    pub(crate) fn fresh_ports(
        &self,
        src: ActorIdx,
        dst: ActorIdx,
    ) -> (Port, Port) {
        let out_degree = if self.contains_actor(src) {
            self.graph.edges_directed(src, Outgoing).count()
        } else {
            0
        };
        let in_degree = if self.contains_actor(dst) {
            self.graph.edges_directed(dst, Incoming).count()
        } else {
            0
        };
        (
            Port::output(format!("out{out_degree}")),
            Port::input(format!("in{in_degree}")),
        )
    }

    pub fn contains_actor(&self, idx: ActorIdx) -> bool {
        idx.index() < self.graph.node_count()
    }

    pub fn actor(&self, idx: ActorIdx) -> &Actor {
        &self.graph[idx]
    }

    pub fn actor_mut(&mut self, idx: ActorIdx) -> &mut Actor {
        &mut self.graph[idx]
    }

    pub fn edge(&self, idx: EdgeIdx) -> &Edge {
        &self.graph[idx]
    }

    pub fn edge_mut(&mut self, idx: EdgeIdx) -> &mut Edge {
        &mut self.graph[idx]
    }

    /// Source and target of an edge.
    pub fn endpoints(&self, idx: EdgeIdx) -> Option<(ActorIdx, ActorIdx)> {
        self.graph.edge_endpoints(idx)
    }

    /// Iterate over the actors in insertion order.
    pub fn actors(&self) -> impl Iterator<Item = (ActorIdx, &Actor)> + '_ {
        self.graph.node_indices().map(move |idx| (idx, &self.graph[idx]))
    }

    pub fn actor_indices(&self) -> impl Iterator<Item = ActorIdx> + '_ {
        self.graph.node_indices()
    }

    pub fn actors_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.graph.node_weights_mut()
    }

    /// Iterate over the edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeReference<'_, Edge>> {
        self.graph.edge_references()
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.graph.edge_weights_mut()
    }

    /// Edges leaving `actor`.
    pub fn outgoing(
        &self,
        actor: ActorIdx,
    ) -> impl Iterator<Item = EdgeReference<'_, Edge>> {
        self.graph.edges_directed(actor, Outgoing)
    }

    /// Edges entering `actor`.
    pub fn incoming(
        &self,
        actor: ActorIdx,
    ) -> impl Iterator<Item = EdgeReference<'_, Edge>> {
        self.graph.edges_directed(actor, Incoming)
    }

    /// Distinct targets of the edges leaving `actor`, in index order.
    pub fn successors(&self, actor: ActorIdx) -> Vec<ActorIdx> {
        self.outgoing(actor)
            .map(|edge| edge.target())
            .sorted()
            .dedup()
            .collect()
    }

    pub fn find_actor<S: Into<Id>>(&self, name: S) -> Option<ActorIdx> {
        let name = name.into();
        self.actors()
            .find(|(_, actor)| actor.name == name)
            .map(|(idx, _)| idx)
    }

    pub fn actor_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// A copy of this graph named `name` that only keeps the edges accepted
    /// by `keep`. Actor indices are preserved.
    pub fn filter_edges<S, F>(&self, name: S, mut keep: F) -> Graph
    where
        S: Into<Id>,
        F: FnMut(&Edge) -> bool,
    {
        Graph {
            name: name.into(),
            graph: self.graph.filter_map(
                |_, actor| Some(actor.clone()),
                |_, edge| keep(edge).then(|| edge.clone()),
            ),
        }
    }

    /// The underlying petgraph, for running graph algorithms.
    pub fn as_petgraph(&self) -> &DiGraph<Actor, Edge> {
        &self.graph
    }
}
