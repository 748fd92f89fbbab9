use super::*;
use crate::algorithms::matching::MatchingError;
use crate::helpers::{create_network, create_unit_network};

fn create_unit_path() -> crate::models::problem::CoverageNetwork {
    create_unit_network(4, &[(0, 1, true), (1, 2, false), (2, 3, false)], 0)
}

#[test]
fn can_return_an_empty_join_without_terminals() {
    let network = create_unit_path();

    let join = compute_tjoin(&network, &[]).unwrap();

    assert!(join.is_empty());
}

#[test]
fn can_pair_adjacent_terminals() {
    let network = create_unit_path();

    let join = compute_tjoin(&network, &[0, 1]).unwrap();

    assert_eq!(join, vec![0]);
}

#[test]
fn can_route_a_pair_through_the_cheapest_path() {
    let network = create_unit_path();

    let mut join = compute_tjoin(&network, &[0, 3]).unwrap();
    join.sort();

    assert_eq!(join, vec![0, 1, 2]);
}

#[test]
fn can_pair_two_pairs_optimally() {
    let network = create_unit_path();

    let mut join = compute_tjoin(&network, &[0, 1, 2, 3]).unwrap();
    join.sort();

    // pairing the neighbours beats pairing across the path
    assert_eq!(join, vec![0, 2]);
}

#[test]
fn can_prefer_the_cheaper_deadhead_direction() {
    let network = create_network(
        3,
        &[(0, 1, true, (1., 1., 9., 2.)), (1, 2, false, (0., 0., 9., 9.)), (0, 2, false, (0., 0., 3., 3.))],
        0,
    );

    let join = compute_tjoin(&network, &[1, 2]).unwrap();

    // going through the 0-1 and 0-2 edges costs 5, the direct edge 9
    assert_eq!({ let mut join = join; join.sort(); join }, vec![0, 2]);
}

#[test]
fn can_fail_when_terminals_cannot_be_paired() {
    let network = create_unit_network(4, &[(0, 1, true), (2, 3, true)], 0);

    let result = compute_tjoin(&network, &[0, 2]);

    assert_eq!(result, Err(MatchingError::NoPerfectMatching));
}

#[test]
#[should_panic]
fn can_panic_on_an_odd_terminal_set() {
    let network = create_unit_path();

    compute_tjoin(&network, &[0]).unwrap();
}
