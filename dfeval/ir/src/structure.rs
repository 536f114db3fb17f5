//! Representation for the structure of a dataflow graph: actors, ports and
//! edges.
use crate::{ActorIdx, EdgeIdx, GetName, GraphIdx, Id};

/// Direction of a port, or of an interface actor relative to the graph that
/// contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Tokens flow into the owner.
    Input,
    /// Tokens flow out of the owner.
    Output,
}

/// Represents a port on an actor. Ports are not shared: each one belongs to
/// exactly one actor through exactly one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
    /// Name of the port
    pub name: Id,
    /// Direction of the port
    pub direction: Direction,
}

impl Port {
    pub fn input<S: Into<Id>>(name: S) -> Self {
        Port {
            name: name.into(),
            direction: Direction::Input,
        }
    }

    pub fn output<S: Into<Id>>(name: S) -> Self {
        Port {
            name: name.into(),
            direction: Direction::Output,
        }
    }
}

impl GetName for Port {
    fn name(&self) -> Id {
        self.name
    }
}

/// What an actor stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    /// Leaf computation.
    Atomic,
    /// Actor whose behavior is described by a nested graph owned by the
    /// [Context](crate::Context).
    Hierarchical(GraphIdx),
    /// Boundary of a nested graph. An `Input` interface feeds tokens into the
    /// graph, an `Output` interface carries them out.
    Interface(Direction),
}

/// Represents a dataflow actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Name of the actor.
    pub name: Id,
    /// What the actor stands for.
    pub kind: ActorKind,
    /// Number of firings in one iteration of the graph.
    pub repetitions: u64,
    /// Execution time of one firing.
    pub duration: f64,
    /// `lcm(repetitions) / repetitions`. Only written by the rate normalizer.
    pub normalized_rate: Option<u64>,
    /// The actor this one instantiates when produced by a graph expansion.
    pub base_actor: Option<ActorIdx>,
}

impl Actor {
    /// Default duration given to hierarchical actors.
    pub const HIERARCHICAL_DURATION: f64 = 1.0;

    /// Default duration given to interfaces.
    pub const INTERFACE_DURATION: f64 = 0.0;

    pub fn atomic<S: Into<Id>>(
        name: S,
        repetitions: u64,
        duration: f64,
    ) -> Self {
        Actor {
            name: name.into(),
            kind: ActorKind::Atomic,
            repetitions,
            duration,
            normalized_rate: None,
            base_actor: None,
        }
    }

    pub fn hierarchical<S: Into<Id>>(
        name: S,
        repetitions: u64,
        graph: GraphIdx,
    ) -> Self {
        Actor {
            kind: ActorKind::Hierarchical(graph),
            ..Actor::atomic(name, repetitions, Self::HIERARCHICAL_DURATION)
        }
    }

    pub fn interface<S: Into<Id>>(
        name: S,
        direction: Direction,
        repetitions: u64,
    ) -> Self {
        Actor {
            kind: ActorKind::Interface(direction),
            ..Actor::atomic(name, repetitions, Self::INTERFACE_DURATION)
        }
    }

    /// The nested graph of a hierarchical actor.
    pub fn refinement(&self) -> Option<GraphIdx> {
        match self.kind {
            ActorKind::Hierarchical(idx) => Some(idx),
            ActorKind::Atomic | ActorKind::Interface(_) => None,
        }
    }

    /// The `i`-th (1-based) single-firing instance of this actor, named
    /// `<name>_<i>`.
    pub fn instance(&self, base: ActorIdx, i: u64) -> Actor {
        Actor {
            name: format!("{}_{}", self.name, i).into(),
            kind: self.kind,
            repetitions: 1,
            duration: self.duration,
            normalized_rate: None,
            base_actor: Some(base),
        }
    }
}

impl GetName for Actor {
    fn name(&self) -> Id {
        self.name
    }
}

/// Represents a FIFO channel between the output port of one actor and the
/// input port of another. The endpoints themselves are stored by the
/// [Graph](crate::Graph).
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Port of the producing actor.
    pub src_port: Port,
    /// Port of the consuming actor.
    pub dst_port: Port,
    /// Tokens produced per firing of the source.
    pub prod: u64,
    /// Tokens consumed per firing of the target.
    pub cons: u64,
    /// Tokens present before the first firing.
    pub delay: u64,
    /// `lcm(repetitions) / (cons * repetitions(target))`. Only written by
    /// the rate normalizer.
    pub normalization_factor: Option<f64>,
    /// The edge this one was expanded from.
    pub base_edge: Option<EdgeIdx>,
}

impl Edge {
    pub fn new(
        src_port: Port,
        dst_port: Port,
        prod: u64,
        cons: u64,
        delay: u64,
    ) -> Self {
        Edge {
            src_port,
            dst_port,
            prod,
            cons,
            delay,
            normalization_factor: None,
            base_edge: None,
        }
    }

    /// True if the edge carries initial tokens.
    pub fn has_delay(&self) -> bool {
        self.delay != 0
    }

    /// True if both rates are one.
    pub fn is_homogeneous(&self) -> bool {
        self.prod == 1 && self.cons == 1
    }
}
