#[cfg(test)]
#[path = "../../../tests/unit/models/problem/network_test.rs"]
mod network_test;

use crate::models::common::{Cost, EdgeId, Point, VertexId};
use crate::models::problem::EdgeCost;
use crate::utils::GenericResult;

/// An undirected segment of the coverage network.
#[derive(Clone, Debug)]
pub struct Edge {
    /// First endpoint.
    pub from: VertexId,
    /// Second endpoint.
    pub to: VertexId,
    /// Whether the edge must be serviced by the tour.
    pub required: bool,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(from: VertexId, to: VertexId, required: bool) -> Self {
        Self { from, to, required }
    }
}

/// A directed view over an undirected input graph: every required edge owns
/// two mirrored service traversals priced separately, every edge can be
/// deadheaded in both directions. Traversal costs are supplied by a pluggable
/// [`EdgeCost`] oracle and frozen at construction time.
#[derive(Debug)]
pub struct CoverageNetwork {
    vertices: Vec<Point>,
    edges: Vec<Edge>,
    depot: VertexId,
    service_costs: Vec<Option<(Cost, Cost)>>,
    deadhead_costs: Vec<(Cost, Cost)>,
    required_edges: Vec<EdgeId>,
}

impl CoverageNetwork {
    /// Builds a network from vertex coordinates, an edge list, the depot
    /// vertex and an edge cost oracle. Returns an error for malformed input:
    /// out of range endpoints, self loops, a missing depot, no required
    /// edges, or costs which are not finite and non-negative.
    pub fn new(vertices: Vec<Point>, edges: Vec<Edge>, depot: VertexId, costs: &dyn EdgeCost) -> GenericResult<Self> {
        if vertices.is_empty() {
            return Err("network has no vertices".into());
        }
        if depot >= vertices.len() {
            return Err(format!("depot {depot} is not a vertex of the network").into());
        }

        let mut service_costs = Vec::with_capacity(edges.len());
        let mut deadhead_costs = Vec::with_capacity(edges.len());
        let mut required_edges = Vec::new();

        for (edge_id, edge) in edges.iter().enumerate() {
            if edge.from >= vertices.len() || edge.to >= vertices.len() {
                return Err(format!("edge {edge_id} has an endpoint outside the network").into());
            }
            if edge.from == edge.to {
                return Err(format!("edge {edge_id} is a self loop").into());
            }

            let deadhead = costs.deadhead_cost(edge);
            validate_cost("deadhead", edge_id, deadhead)?;
            deadhead_costs.push(deadhead);

            if edge.required {
                let service = costs.service_cost(edge);
                validate_cost("service", edge_id, service)?;
                service_costs.push(Some(service));
                required_edges.push(edge_id);
            } else {
                service_costs.push(None);
            }
        }

        if required_edges.is_empty() {
            return Err("network has no required edges to service".into());
        }

        Ok(Self { vertices, edges, depot, service_costs, deadhead_costs, required_edges })
    }

    /// Returns the amount of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the amount of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the depot vertex where tours start and end.
    pub fn depot(&self) -> VertexId {
        self.depot
    }

    /// Returns coordinates of the given vertex.
    pub fn vertex(&self, vertex: VertexId) -> &Point {
        &self.vertices[vertex]
    }

    /// Returns all edges.
    pub fn edges(&self) -> &[Edge] {
        self.edges.as_slice()
    }

    /// Returns the edge with the given id.
    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge]
    }

    /// Returns ids of the required edges.
    pub fn required_edges(&self) -> &[EdgeId] {
        self.required_edges.as_slice()
    }

    /// Returns true if the given edge must be serviced.
    pub fn is_required(&self, edge: EdgeId) -> bool {
        self.edges[edge].required
    }

    /// Returns the `(forward, reverse)` service cost pair of a required edge.
    pub fn service_cost(&self, edge: EdgeId) -> Option<(Cost, Cost)> {
        self.service_costs[edge]
    }

    /// Returns the `(forward, reverse)` deadhead cost pair of an edge.
    pub fn deadhead_cost(&self, edge: EdgeId) -> (Cost, Cost) {
        self.deadhead_costs[edge]
    }
}

fn validate_cost(kind: &str, edge_id: EdgeId, (forward, reverse): (Cost, Cost)) -> GenericResult<()> {
    if !forward.is_finite() || !reverse.is_finite() || forward < 0. || reverse < 0. {
        Err(format!("edge {edge_id} has a {kind} cost which is not finite and non-negative").into())
    } else {
        Ok(())
    }
}
