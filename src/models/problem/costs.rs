#[cfg(test)]
#[path = "../../../tests/unit/models/problem/costs_test.rs"]
mod costs_test;

use crate::models::common::{Cost, Point, VertexId};
use crate::models::problem::Edge;
use hashbrown::HashMap;

/// Provides the way to get traversal costs for network edges.
///
/// Both methods return a `(forward, reverse)` pair where forward prices the
/// travel from the edge's first endpoint to its second. Costs must be finite
/// and non-negative.
pub trait EdgeCost {
    /// Returns the cost of traversing the edge while servicing it.
    fn service_cost(&self, edge: &Edge) -> (Cost, Cost);

    /// Returns the cost of traversing the edge without servicing it.
    fn deadhead_cost(&self, edge: &Edge) -> (Cost, Cost);
}

/// An edge cost oracle which additionally prices the turn between two
/// consecutive traversals. Turn costs are accepted at this boundary, but
/// route objectives price them as zero.
pub trait TurnAwareEdgeCost: EdgeCost {
    /// Returns the cost of turning from the inbound onto the outbound edge.
    /// The flags tell whether each edge is traversed in its forward direction.
    fn turn_cost(&self, in_edge: &Edge, out_edge: &Edge, in_forward: bool, out_forward: bool) -> Cost;
}

/// Prices traversals by the euclidean length of the edge scaled by separate
/// service and deadhead factors, both directions priced equally.
pub struct EuclideanCost {
    points: Vec<Point>,
    service_factor: f64,
    deadhead_factor: f64,
}

impl EuclideanCost {
    /// Creates a euclidean cost oracle over the given vertex coordinates.
    pub fn new(points: Vec<Point>, service_factor: f64, deadhead_factor: f64) -> Self {
        assert!(service_factor.is_finite() && service_factor >= 0., "service factor must be finite and non-negative");
        assert!(deadhead_factor.is_finite() && deadhead_factor >= 0., "deadhead factor must be finite and non-negative");

        Self { points, service_factor, deadhead_factor }
    }

    fn length(&self, edge: &Edge) -> f64 {
        self.points[edge.from].distance_to(&self.points[edge.to])
    }
}

impl EdgeCost for EuclideanCost {
    fn service_cost(&self, edge: &Edge) -> (Cost, Cost) {
        let cost = self.length(edge) * self.service_factor;
        (cost, cost)
    }

    fn deadhead_cost(&self, edge: &Edge) -> (Cost, Cost) {
        let cost = self.length(edge) * self.deadhead_factor;
        (cost, cost)
    }
}

/// Uses explicit per-edge cost tables as source of traversal costs.
///
/// Entries are keyed by the endpoint pair; a lookup with swapped endpoints
/// returns the mirrored pair. Missing entries price as infinity which the
/// network constructor rejects.
#[derive(Default)]
pub struct TableCost {
    service: HashMap<(VertexId, VertexId), (Cost, Cost)>,
    deadhead: HashMap<(VertexId, VertexId), (Cost, Cost)>,
}

impl TableCost {
    /// Creates an empty cost table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service cost pair for the edge between the given vertices.
    pub fn set_service(&mut self, from: VertexId, to: VertexId, forward: Cost, reverse: Cost) -> &mut Self {
        self.service.insert((from, to), (forward, reverse));
        self
    }

    /// Sets the deadhead cost pair for the edge between the given vertices.
    pub fn set_deadhead(&mut self, from: VertexId, to: VertexId, forward: Cost, reverse: Cost) -> &mut Self {
        self.deadhead.insert((from, to), (forward, reverse));
        self
    }

    fn lookup(table: &HashMap<(VertexId, VertexId), (Cost, Cost)>, edge: &Edge) -> (Cost, Cost) {
        table
            .get(&(edge.from, edge.to))
            .copied()
            .or_else(|| table.get(&(edge.to, edge.from)).map(|&(forward, reverse)| (reverse, forward)))
            .unwrap_or((f64::INFINITY, f64::INFINITY))
    }
}

impl EdgeCost for TableCost {
    fn service_cost(&self, edge: &Edge) -> (Cost, Cost) {
        Self::lookup(&self.service, edge)
    }

    fn deadhead_cost(&self, edge: &Edge) -> (Cost, Cost) {
        Self::lookup(&self.deadhead, edge)
    }
}
