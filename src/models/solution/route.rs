#[cfg(test)]
#[path = "../../../tests/unit/models/solution/route_test.rs"]
mod route_test;

use crate::models::common::{Cost, EdgeId, VertexId};
use crate::models::solution::{Traversal, TraversalKind};
use crate::utils::GenericResult;

/// An ordered sequence of directed traversals forming a closed walk which
/// starts and ends at the depot.
pub struct Route {
    depot: VertexId,
    legs: Vec<Traversal>,
}

impl Route {
    /// Creates a route from its legs, validating that consecutive legs share
    /// a vertex and that the walk is closed at the depot.
    pub fn new(depot: VertexId, legs: Vec<Traversal>) -> GenericResult<Self> {
        if let Some(first) = legs.first() {
            if first.from != depot {
                return Err(format!("route starts at vertex {}, not at the depot {depot}", first.from).into());
            }
        }
        if let Some(last) = legs.last() {
            if last.to != depot {
                return Err(format!("route ends at vertex {}, not at the depot {depot}", last.to).into());
            }
        }
        if let Some(position) = legs.windows(2).position(|pair| pair[0].to != pair[1].from) {
            return Err(format!("route legs {position} and {} do not share a vertex", position + 1).into());
        }

        Ok(Self { depot, legs })
    }

    /// Returns the depot vertex.
    pub fn depot(&self) -> VertexId {
        self.depot
    }

    /// Returns route legs in travel order.
    pub fn legs(&self) -> &[Traversal] {
        self.legs.as_slice()
    }

    /// Returns the summed cost of all legs.
    pub fn cost(&self) -> Cost {
        self.legs.iter().map(|leg| leg.cost).sum()
    }

    /// Returns ids of serviced edges in service order.
    pub fn serviced_edges(&self) -> Vec<EdgeId> {
        self.legs.iter().filter(|leg| leg.kind == TraversalKind::Service).map(|leg| leg.edge).collect()
    }
}
