//! Eulerian circuit construction on directed multigraphs.

#[cfg(test)]
#[path = "../../../tests/unit/algorithms/euler/euler_test.rs"]
mod euler_test;

use std::fmt::{Display, Formatter};

/// A stable index of a directed arc in the input multigraph.
pub type ArcId = usize;

/// An error returned when the multigraph admits no Eulerian circuit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotEulerian(String);

impl Display for NotEulerian {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "not eulerian: {}", self.0)
    }
}

impl std::error::Error for NotEulerian {}

/// Finds an Eulerian circuit through every arc of a directed multigraph
/// using Hierholzer's algorithm: unused arcs are followed until a sub-cycle
/// closes and sub-cycles are spliced into the primary walk at their shared
/// vertex.
///
/// Arcs are `(from, to)` pairs addressed by their position in the slice; the
/// returned walk lists every arc exactly once, starts and ends at `start`.
/// Fails when some vertex has imbalanced in and out degrees or when the arcs
/// do not form a single connected circuit through `start`.
pub fn find_euler_circuit(num_vertices: usize, arcs: &[(usize, usize)], start: usize) -> Result<Vec<ArcId>, NotEulerian> {
    assert!(start < num_vertices, "start vertex out of bounds");

    let mut outgoing = vec![Vec::new(); num_vertices];
    let mut balance = vec![0i64; num_vertices];

    for (arc, &(from, to)) in arcs.iter().enumerate() {
        assert!(from < num_vertices && to < num_vertices, "arc endpoint out of bounds");
        outgoing[from].push(arc);
        balance[from] += 1;
        balance[to] -= 1;
    }

    if let Some(vertex) = (0..num_vertices).find(|&vertex| balance[vertex] != 0) {
        return Err(NotEulerian(format!("vertex {vertex} has imbalanced in and out degrees")));
    }

    if arcs.is_empty() {
        return Ok(Vec::new());
    }

    // follow unused arcs depth-first; an arc is appended once its whole
    // sub-cycle is finished which splices sub-cycles in place
    let mut next_unused = vec![0; num_vertices];
    let mut walk = Vec::with_capacity(arcs.len());
    let mut stack = vec![(start, None)];

    while let Some(&(vertex, via)) = stack.last() {
        if next_unused[vertex] < outgoing[vertex].len() {
            let arc = outgoing[vertex][next_unused[vertex]];
            next_unused[vertex] += 1;
            stack.push((arcs[arc].1, Some(arc)));
        } else {
            stack.pop();
            if let Some(arc) = via {
                walk.push(arc);
            }
        }
    }

    if walk.len() != arcs.len() {
        return Err(NotEulerian(format!("{} of {} arcs are unreachable from vertex {start}", arcs.len() - walk.len(), arcs.len())));
    }

    walk.reverse();

    Ok(walk)
}
