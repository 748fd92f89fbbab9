use super::*;
use crate::helpers::{create_network, create_unit_network};
use crate::models::common::Point;
use crate::models::problem::TableCost;

#[test]
fn can_build_a_valid_network() {
    let network = create_network(
        3,
        &[(0, 1, true, (1., 2., 3., 4.)), (1, 2, false, (0., 0., 5., 6.))],
        0,
    );

    assert_eq!(network.num_vertices(), 3);
    assert_eq!(network.num_edges(), 2);
    assert_eq!(network.depot(), 0);
    assert_eq!(network.required_edges(), &[0]);
    assert!(network.is_required(0));
    assert!(!network.is_required(1));
    assert_eq!(network.service_cost(0), Some((1., 2.)));
    assert_eq!(network.service_cost(1), None);
    assert_eq!(network.deadhead_cost(1), (5., 6.));
}

parameterized_test! {can_reject_malformed_input, (num_vertices, edges, depot), {
    let list = edges.iter().map(|&(from, to, required)| Edge::new(from, to, required)).collect::<Vec<Edge>>();
    let mut costs = TableCost::new();
    edges.iter().for_each(|&(from, to, _)| {
        costs.set_service(from, to, 1., 1.).set_deadhead(from, to, 1., 1.);
    });

    let result = CoverageNetwork::new(vec![Point::default(); num_vertices], list, depot, &costs);

    assert!(result.is_err());
}}

can_reject_malformed_input! {
    case01_missing_depot: (2, vec![(0, 1, true)], 5),
    case02_self_loop: (2, vec![(0, 0, true)], 0),
    case03_endpoint_out_of_bounds: (2, vec![(0, 3, true)], 0),
    case04_no_required_edges: (2, vec![(0, 1, false)], 0),
    case05_no_vertices: (0, vec![], 0),
}

#[test]
fn can_reject_non_finite_costs() {
    // an empty table prices everything as infinity
    let costs = TableCost::new();

    let result = CoverageNetwork::new(
        vec![Point::default(); 2],
        vec![Edge::new(0, 1, true)],
        0,
        &costs,
    );

    assert!(result.is_err());
}

#[test]
fn can_reject_negative_costs() {
    let mut costs = TableCost::new();
    costs.set_service(0, 1, -1., 1.).set_deadhead(0, 1, 1., 1.);

    let result = CoverageNetwork::new(
        vec![Point::default(); 2],
        vec![Edge::new(0, 1, true)],
        0,
        &costs,
    );

    assert!(result.is_err());
}

#[test]
fn can_create_unit_networks_for_tests() {
    let network = create_unit_network(3, &[(0, 1, true), (1, 2, false)], 0);

    assert_eq!(network.service_cost(0), Some((1., 1.)));
    assert_eq!(network.deadhead_cost(1), (1., 1.));
}
