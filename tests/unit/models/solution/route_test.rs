use super::*;

fn leg(edge: usize, from: usize, to: usize, kind: TraversalKind) -> Traversal {
    Traversal::new(edge, from, to, kind, 1.)
}

#[test]
fn can_create_a_closed_route() {
    let legs = vec![
        leg(0, 0, 1, TraversalKind::Service),
        leg(1, 1, 2, TraversalKind::Deadhead),
        leg(2, 2, 0, TraversalKind::Service),
    ];

    let route = Route::new(0, legs).unwrap();

    assert_eq!(route.depot(), 0);
    assert_eq!(route.cost(), 3.);
    assert_eq!(route.serviced_edges(), vec![0, 2]);
}

#[test]
fn can_create_an_empty_route() {
    let route = Route::new(1, vec![]).unwrap();

    assert!(route.legs().is_empty());
    assert_eq!(route.cost(), 0.);
}

parameterized_test! {can_reject_broken_walks, legs, {
    let result = Route::new(0, legs);

    assert!(result.is_err());
}}

can_reject_broken_walks! {
    case01_starts_away_from_depot: vec![
        leg(0, 1, 0, TraversalKind::Service),
        leg(0, 0, 1, TraversalKind::Deadhead),
    ],
    case02_ends_away_from_depot: vec![
        leg(0, 0, 1, TraversalKind::Service),
    ],
    case03_legs_do_not_meet: vec![
        leg(0, 0, 1, TraversalKind::Service),
        leg(1, 2, 0, TraversalKind::Deadhead),
    ],
}
