use super::*;
use crate::helpers::{create_network, create_unit_network};
use crate::models::problem::TableCost;
use crate::utils::Environment;
use std::sync::{Arc, Mutex};

fn create_capturing_environment() -> (Environment, Arc<Mutex<Vec<String>>>) {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    let logger = Arc::new(move |message: &str| sink.lock().unwrap().push(message.to_string()));

    (Environment::new(logger), messages)
}

fn assert_services_every_required_edge_once(network: &CoverageNetwork, solution: &Solution) {
    let mut serviced = solution.route.serviced_edges();
    serviced.sort();

    assert_eq!(serviced, network.required_edges());
}

#[test]
fn can_service_a_triangle_in_one_cycle() {
    let network = create_unit_network(3, &[(0, 1, true), (1, 2, true), (0, 2, true)], 0);

    let solution = CoverageSolver::new(&network).solve().unwrap();

    assert_eq!(solution.objective, 3.);
    assert_eq!(solution.route.legs().len(), 3);
    assert!(solution.route.legs().iter().all(|leg| leg.kind == TraversalKind::Service));
    assert_services_every_required_edge_once(&network, &solution);
}

#[test]
fn can_deadhead_between_required_paths() {
    let network = create_unit_network(4, &[(0, 1, true), (1, 2, false), (2, 3, true)], 0);

    let solution = CoverageSolver::new(&network).solve().unwrap();

    assert_eq!(solution.objective, 6.);
    assert_eq!(solution.route.legs().len(), 6);
    assert_services_every_required_edge_once(&network, &solution);

    let deadheads = solution.route.legs().iter().filter(|leg| leg.kind == TraversalKind::Deadhead).count();
    assert_eq!(deadheads, 4);
}

#[test]
fn can_repair_disconnected_support() {
    let sparse = create_unit_network(4, &[(0, 1, true), (2, 3, true), (1, 2, false)], 0);

    let (environment, messages) = create_capturing_environment();
    let solution = CoverageSolver::new(&sparse).with_environment(environment).solve().unwrap();

    // the first solve leaves the two serviced islands apart, a cut then
    // forces the tour over the bridge in both directions
    assert!(messages.lock().unwrap().iter().any(|message| message.contains("disconnected")));

    let bridge = 2;
    let bridge_legs = solution.route.legs().iter().filter(|leg| leg.edge == bridge).count();
    assert_eq!(bridge_legs, 2);
    assert_eq!(solution.objective, 6.);
    assert_services_every_required_edge_once(&sparse, &solution);
}

#[test]
fn can_choose_the_cheaper_service_orientation() {
    let network = create_network(2, &[(0, 1, true, (5., 1., 1., 1.))], 0);

    let solution = CoverageSolver::new(&network).solve().unwrap();

    assert_eq!(solution.objective, 2.);

    let legs = solution.route.legs();
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0].kind, TraversalKind::Deadhead);
    assert_eq!((legs[0].from, legs[0].to), (0, 1));
    assert_eq!(legs[1].kind, TraversalKind::Service);
    assert_eq!((legs[1].from, legs[1].to), (1, 0));
}

#[test]
fn can_cover_a_star_of_required_edges() {
    let network = create_unit_network(5, &[(0, 1, true), (0, 2, true), (0, 3, true), (0, 4, true)], 0);

    let solution = CoverageSolver::new(&network).solve().unwrap();

    assert_eq!(solution.objective, 8.);
    assert_eq!(solution.route.legs().len(), 8);
    assert_services_every_required_edge_once(&network, &solution);
    assert!(solution.graph.is_balanced());
}

#[test]
fn can_produce_identical_routes_on_reruns() {
    let network = create_unit_network(4, &[(0, 1, true), (1, 2, false), (2, 3, true), (0, 3, false)], 0);

    let first = CoverageSolver::new(&network).solve().unwrap();
    let second = CoverageSolver::new(&network).solve().unwrap();

    assert_eq!(first.objective.to_bits(), second.objective.to_bits());
    let legs = |solution: &Solution| {
        solution.route.legs().iter().map(|leg| (leg.edge, leg.from, leg.to, leg.kind)).collect::<Vec<_>>()
    };
    assert_eq!(legs(&first), legs(&second));
}

#[test]
fn can_repair_parity_of_a_hand_assembled_multigraph() {
    let network = create_network(2, &[(0, 1, true, (1., 1., 2., 3.))], 0);
    let solver = CoverageSolver::new(&network);

    let graph = SolutionGraph::new(2, vec![Traversal::new(0, 0, 1, TraversalKind::Service, 1.)]);
    let solution = solver.construct_route(graph).unwrap();

    // the missing way back is a deadhead along the only edge
    assert_eq!(solution.route.legs().len(), 2);
    assert_eq!(solution.route.legs()[1].kind, TraversalKind::Deadhead);
    assert_eq!(solution.objective, 4.);
}

#[test]
fn can_reject_a_multigraph_which_cannot_be_balanced() {
    let network = create_unit_network(3, &[(0, 1, true), (1, 2, true), (0, 2, true)], 0);
    let solver = CoverageSolver::new(&network);

    let graph = SolutionGraph::new(
        3,
        vec![
            Traversal::new(0, 0, 1, TraversalKind::Service, 1.),
            Traversal::new(2, 0, 2, TraversalKind::Service, 1.),
        ],
    );

    let result = solver.construct_route(graph);

    assert!(matches!(result, Err(SolverError::NotEulerian(_))));
}

#[test]
fn can_fail_when_the_repair_bound_is_exhausted() {
    let sparse = create_unit_network(4, &[(0, 1, true), (2, 3, true), (1, 2, false)], 0);

    let result = CoverageSolver::new(&sparse).with_max_repairs(0).solve();

    assert!(matches!(result, Err(SolverError::NumericalFailure(_))));
}

#[test]
fn can_convert_network_errors_to_invalid_input() {
    let error = CoverageNetwork::new(vec![], vec![], 0, &TableCost::new())
        .map_err(SolverError::from)
        .unwrap_err();

    assert!(matches!(error, SolverError::InvalidInput(_)));
}
