use crate::{ActorIdx, Graph};

/// Index of a graph owned by a [Context].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphIdx(usize);

impl GraphIdx {
    pub fn new(input: usize) -> Self {
        Self(input)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for GraphIdx {
    fn from(input: usize) -> Self {
        GraphIdx::new(input)
    }
}

/// Owner of a hierarchical design: the top-level graph and every nested
/// graph reachable through hierarchical actors.
///
/// Nested graphs are referenced by [GraphIdx] rather than owned by their
/// actors, which keeps the containment relation explicit. Well-formed
/// designs form a tree (or DAG, when one graph refines several actors);
/// [validate_context](crate::validate_context) rejects containment cycles.
#[derive(Debug, Clone)]
pub struct Context {
    graphs: Vec<Graph>,
    /// The graph under analysis.
    entrypoint: GraphIdx,
}

impl Context {
    /// Construct a context whose entrypoint is `top`.
    pub fn new(top: Graph) -> Self {
        Context {
            graphs: vec![top],
            entrypoint: GraphIdx::new(0),
        }
    }

    /// Add a graph to the context. It can then be referenced by hierarchical
    /// actors.
    pub fn add_graph(&mut self, graph: Graph) -> GraphIdx {
        self.graphs.push(graph);
        GraphIdx::new(self.graphs.len() - 1)
    }

    pub fn entrypoint(&self) -> GraphIdx {
        self.entrypoint
    }

    pub fn set_entrypoint(&mut self, idx: GraphIdx) {
        self.entrypoint = idx;
    }

    /// The entrypoint graph.
    pub fn top(&self) -> &Graph {
        &self[self.entrypoint]
    }

    pub fn get(&self, idx: GraphIdx) -> Option<&Graph> {
        self.graphs.get(idx.index())
    }

    pub fn contains(&self, idx: GraphIdx) -> bool {
        idx.index() < self.graphs.len()
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn graphs(&self) -> impl Iterator<Item = (GraphIdx, &Graph)> {
        self.graphs
            .iter()
            .enumerate()
            .map(|(i, g)| (GraphIdx::new(i), g))
    }

    pub fn graphs_mut(&mut self) -> impl Iterator<Item = &mut Graph> {
        self.graphs.iter_mut()
    }

    /// The hierarchical actors of `idx` together with the graph each one
    /// refines to.
    pub fn children(
        &self,
        idx: GraphIdx,
    ) -> impl Iterator<Item = (ActorIdx, GraphIdx)> + '_ {
        self[idx]
            .actors()
            .filter_map(|(a, actor)| actor.refinement().map(|g| (a, g)))
    }
}

impl std::ops::Index<GraphIdx> for Context {
    type Output = Graph;

    fn index(&self, index: GraphIdx) -> &Self::Output {
        &self.graphs[index.index()]
    }
}

impl std::ops::IndexMut<GraphIdx> for Context {
    fn index_mut(&mut self, index: GraphIdx) -> &mut Self::Output {
        &mut self.graphs[index.index()]
    }
}
