#[cfg(test)]
#[path = "../../../tests/unit/algorithms/matching/graph_test.rs"]
mod graph_test;

use super::{EdgeIndex, Vertex};
use crate::utils::GenericResult;

/// A dense undirected simple graph used by the matching engine.
///
/// Edges carry stable indices in insertion order and can be looked up three
/// equivalent ways: by index, by vertex pair, and through per-vertex adjacency
/// lists. The structure is immutable once constructed.
pub struct Graph {
    edges: Vec<(Vertex, Vertex)>,
    adjacency: Vec<Vec<Vertex>>,
    index: Vec<Vec<Option<EdgeIndex>>>,
}

impl Graph {
    /// Creates a graph from the amount of vertices and an undirected edge
    /// list. Returns an error for a malformed edge list: an endpoint out of
    /// bounds, a self loop, or a duplicate edge.
    pub fn new(num_vertices: usize, edges: &[(Vertex, Vertex)]) -> GenericResult<Self> {
        let mut adjacency = vec![Vec::new(); num_vertices];
        let mut index = vec![vec![None; num_vertices]; num_vertices];

        let edges = edges.to_vec();
        for (edge_index, &(u, v)) in edges.iter().enumerate() {
            if u >= num_vertices || v >= num_vertices {
                return Err(format!("edge {edge_index} has an endpoint outside the graph").into());
            }
            if u == v {
                return Err(format!("edge {edge_index} is a self loop").into());
            }
            if index[u][v].is_some() {
                return Err(format!("edge {edge_index} duplicates an earlier edge").into());
            }

            index[u][v] = Some(edge_index);
            index[v][u] = Some(edge_index);
            adjacency[u].push(v);
            adjacency[v].push(u);
        }

        Ok(Self { edges, adjacency, index })
    }

    /// Returns the amount of vertices.
    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the amount of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns endpoints of the edge with the given index.
    pub fn edge(&self, edge_index: EdgeIndex) -> (Vertex, Vertex) {
        self.edges[edge_index]
    }

    /// Returns the index of the edge between the given vertices, if any.
    /// The lookup is symmetric in its arguments.
    pub fn edge_index(&self, u: Vertex, v: Vertex) -> Option<EdgeIndex> {
        self.index[u][v]
    }

    /// Returns vertices adjacent to the given one.
    pub fn adjacent(&self, u: Vertex) -> &[Vertex] {
        self.adjacency[u].as_slice()
    }

    /// Returns true if the two vertices are connected by an edge.
    pub fn is_adjacent(&self, u: Vertex, v: Vertex) -> bool {
        self.index[u][v].is_some()
    }
}
