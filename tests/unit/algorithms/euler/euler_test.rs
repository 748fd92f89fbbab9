use super::*;

#[test]
fn can_walk_a_simple_cycle() {
    let arcs = vec![(0, 1), (1, 2), (2, 0)];

    let walk = find_euler_circuit(3, &arcs, 0).unwrap();

    assert_eq!(walk, vec![0, 1, 2]);
}

#[test]
fn can_splice_sub_cycles() {
    // two cycles sharing vertex 1
    let arcs = vec![(0, 1), (1, 2), (2, 0), (1, 3), (3, 1)];

    let walk = find_euler_circuit(4, &arcs, 0).unwrap();

    assert_eq!(walk.len(), arcs.len());
    assert_walk_consecutive(&arcs, &walk, 0);
}

#[test]
fn can_walk_parallel_arcs() {
    let arcs = vec![(0, 1), (1, 0), (0, 1), (1, 0)];

    let walk = find_euler_circuit(2, &arcs, 0).unwrap();

    assert_eq!(walk.len(), arcs.len());
    assert_walk_consecutive(&arcs, &walk, 0);
}

#[test]
fn can_return_empty_walk_for_no_arcs() {
    let walk = find_euler_circuit(3, &[], 1).unwrap();

    assert!(walk.is_empty());
}

#[test]
fn can_reject_imbalanced_degrees() {
    let arcs = vec![(0, 1), (1, 2)];

    let result = find_euler_circuit(3, &arcs, 0);

    assert!(result.is_err());
}

#[test]
fn can_reject_arcs_unreachable_from_start() {
    // balanced, but the 2-3 cycle never meets the 0-1 cycle
    let arcs = vec![(0, 1), (1, 0), (2, 3), (3, 2)];

    let result = find_euler_circuit(4, &arcs, 0);

    assert!(result.is_err());
}

fn assert_walk_consecutive(arcs: &[(usize, usize)], walk: &[ArcId], start: usize) {
    let mut position = start;
    for &arc in walk {
        assert_eq!(arcs[arc].0, position, "walk must be edge consecutive");
        position = arcs[arc].1;
    }
    assert_eq!(position, start, "walk must close at its start");

    let mut used = vec![false; arcs.len()];
    walk.iter().for_each(|&arc| {
        assert!(!used[arc], "every arc is used once");
        used[arc] = true;
    });
}
