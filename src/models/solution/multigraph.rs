#[cfg(test)]
#[path = "../../../tests/unit/models/solution/multigraph_test.rs"]
mod multigraph_test;

use crate::models::common::{Cost, EdgeId, VertexId};

/// Specifies how a traversal covers its edge.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TraversalKind {
    /// The edge is traversed with the servicing operation running.
    Service,
    /// The edge is only passed through.
    Deadhead,
}

/// A priced directed traversal of a network edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Traversal {
    /// Id of the traversed network edge.
    pub edge: EdgeId,
    /// Tail vertex.
    pub from: VertexId,
    /// Head vertex.
    pub to: VertexId,
    /// Whether the edge is serviced or deadheaded.
    pub kind: TraversalKind,
    /// Cost of this traversal.
    pub cost: Cost,
}

impl Traversal {
    /// Creates a new traversal.
    pub fn new(edge: EdgeId, from: VertexId, to: VertexId, kind: TraversalKind, cost: Cost) -> Self {
        Self { edge, from, to, kind, cost }
    }
}

/// A directed multigraph assembled from the traversals chosen by the solver.
pub struct SolutionGraph {
    num_vertices: usize,
    arcs: Vec<Traversal>,
}

impl SolutionGraph {
    /// Creates a solution multigraph over the given amount of vertices.
    pub fn new(num_vertices: usize, arcs: Vec<Traversal>) -> Self {
        assert!(
            arcs.iter().all(|arc| arc.from < num_vertices && arc.to < num_vertices),
            "arc endpoint out of bounds"
        );

        Self { num_vertices, arcs }
    }

    /// Returns the amount of vertices.
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Returns all traversals of the multigraph.
    pub fn arcs(&self) -> &[Traversal] {
        self.arcs.as_slice()
    }

    /// Returns the summed cost of all traversals.
    pub fn total_cost(&self) -> Cost {
        self.arcs.iter().map(|arc| arc.cost).sum()
    }

    /// Returns true if every vertex has equal in and out degrees.
    pub fn is_balanced(&self) -> bool {
        let mut balance = vec![0i64; self.num_vertices];
        for arc in self.arcs.iter() {
            balance[arc.from] += 1;
            balance[arc.to] -= 1;
        }

        balance.iter().all(|&value| value == 0)
    }

    /// Returns vertices with an odd degree in the undirected skeleton of the
    /// multigraph.
    pub fn odd_degree_vertices(&self) -> Vec<VertexId> {
        let mut degree = vec![0usize; self.num_vertices];
        for arc in self.arcs.iter() {
            degree[arc.from] += 1;
            degree[arc.to] += 1;
        }

        (0..self.num_vertices).filter(|&vertex| degree[vertex] % 2 == 1).collect()
    }
}
