#[cfg(test)]
#[path = "../../tests/unit/solver/tjoin_test.rs"]
mod tjoin_test;

use crate::algorithms::matching::{Graph, Matching, MatchingError};
use crate::models::common::{EdgeId, VertexId};
use crate::models::problem::CoverageNetwork;

/// Computes a minimum cost T-join: a multiset of network edges whose
/// odd-degree vertices are exactly the given terminal set.
///
/// Terminals are paired by a minimum cost perfect matching over their
/// complete distance graph, where the distance between two terminals is the
/// cheapest deadhead path between them, and every matched pair contributes
/// the edges of its path. The terminal set must have even size.
pub fn compute_tjoin(network: &CoverageNetwork, terminals: &[VertexId]) -> Result<Vec<EdgeId>, MatchingError> {
    assert!(terminals.len() % 2 == 0, "a T-join requires an even terminal set");

    if terminals.is_empty() {
        return Ok(Vec::new());
    }

    let (distance, next_edge) = shortest_deadhead_paths(network);

    // pair the terminals over their complete distance graph
    let mut edges = Vec::new();
    for i in 0..terminals.len() {
        for j in i + 1..terminals.len() {
            if distance[terminals[i]][terminals[j]].is_finite() {
                edges.push((i, j));
            }
        }
    }

    let graph = Graph::new(terminals.len(), &edges).expect("the terminal graph is simple by construction");
    let costs = edges.iter().map(|&(i, j)| distance[terminals[i]][terminals[j]]).collect::<Vec<_>>();

    let mut matching = Matching::new(&graph);
    let (pairs, _) = matching.solve_minimum_cost_perfect_matching(&costs)?;

    let mut join = Vec::new();
    for pair in pairs {
        let (i, j) = graph.edge(pair);
        collect_path(network, &next_edge, terminals[i], terminals[j], &mut join);
    }

    Ok(join)
}

/// All pairs cheapest deadhead paths over the undirected network, each edge
/// weighted by the cheaper of its two deadhead directions. Returns the
/// distance matrix and, per vertex pair, the first edge of the path.
fn shortest_deadhead_paths(network: &CoverageNetwork) -> (Vec<Vec<f64>>, Vec<Vec<Option<EdgeId>>>) {
    let n = network.num_vertices();
    let mut distance = vec![vec![f64::INFINITY; n]; n];
    let mut next_edge = vec![vec![None; n]; n];

    for vertex in 0..n {
        distance[vertex][vertex] = 0.;
    }

    for (edge_id, edge) in network.edges().iter().enumerate() {
        let (forward, reverse) = network.deadhead_cost(edge_id);
        let weight = forward.min(reverse);

        if weight < distance[edge.from][edge.to] {
            distance[edge.from][edge.to] = weight;
            distance[edge.to][edge.from] = weight;
            next_edge[edge.from][edge.to] = Some(edge_id);
            next_edge[edge.to][edge.from] = Some(edge_id);
        }
    }

    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let through = distance[i][k] + distance[k][j];
                if through < distance[i][j] {
                    distance[i][j] = through;
                    next_edge[i][j] = next_edge[i][k];
                }
            }
        }
    }

    (distance, next_edge)
}

fn collect_path(
    network: &CoverageNetwork,
    next_edge: &[Vec<Option<EdgeId>>],
    from: VertexId,
    to: VertexId,
    join: &mut Vec<EdgeId>,
) {
    let mut current = from;
    while current != to {
        let edge_id = next_edge[current][to].expect("matched terminals are connected");
        join.push(edge_id);

        let edge = network.edge(edge_id);
        current = if edge.from == current { edge.to } else { edge.from };
    }
}
