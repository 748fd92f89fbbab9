use crate::models::common::Point;
use crate::models::problem::{CoverageNetwork, Edge, TableCost};

/// A test edge: endpoints, required flag and the
/// `(service_fwd, service_rev, deadhead_fwd, deadhead_rev)` cost tuple.
pub type TestEdge = (usize, usize, bool, (f64, f64, f64, f64));

/// Creates a network from explicit per edge cost tuples.
pub fn create_network(num_vertices: usize, edges: &[TestEdge], depot: usize) -> CoverageNetwork {
    let mut costs = TableCost::new();
    let mut list = Vec::new();

    for &(from, to, required, (service_fwd, service_rev, deadhead_fwd, deadhead_rev)) in edges {
        costs.set_service(from, to, service_fwd, service_rev);
        costs.set_deadhead(from, to, deadhead_fwd, deadhead_rev);
        list.push(Edge::new(from, to, required));
    }

    CoverageNetwork::new(vec![Point::default(); num_vertices], list, depot, &costs)
        .expect("the test network must be valid")
}

/// Creates a network where every traversal costs one unit.
pub fn create_unit_network(num_vertices: usize, edges: &[(usize, usize, bool)], depot: usize) -> CoverageNetwork {
    let edges = edges
        .iter()
        .map(|&(from, to, required)| (from, to, required, (1., 1., 1., 1.)))
        .collect::<Vec<_>>();

    create_network(num_vertices, edges.as_slice(), depot)
}
