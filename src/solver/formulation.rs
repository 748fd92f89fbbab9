#[cfg(test)]
#[path = "../../tests/unit/solver/formulation_test.rs"]
mod formulation_test;

use crate::models::common::{EdgeId, VertexId};
use crate::models::problem::CoverageNetwork;
use crate::models::solution::{SolutionGraph, Traversal, TraversalKind};
use crate::solver::{LpBackend, RowId, VarId, VariableKind};
use hashbrown::HashSet;

/// A mixed integer formulation of the line coverage tour over a network.
///
/// Every required edge gets a pair of binary columns selecting its service
/// orientation, every edge a pair of integer columns counting deadhead
/// traversals per direction. Service rows force exactly one orientation,
/// symmetry rows balance directed flow through every vertex. Connectivity is
/// not part of the initial model: violated cuts are separated lazily from
/// integral solutions through [`RouteFormulation::find_violated_cut`].
pub struct RouteFormulation<'a> {
    network: &'a CoverageNetwork,
    /// Binary `(forward, reverse)` orientation columns per required edge,
    /// aligned with `network.required_edges()`.
    service_vars: Vec<(VarId, VarId)>,
    /// Integer `(forward, reverse)` deadhead columns per edge id.
    deadhead_vars: Vec<(VarId, VarId)>,
    num_rows: usize,
}

impl<'a> RouteFormulation<'a> {
    /// Creates an empty formulation over the network.
    pub fn new(network: &'a CoverageNetwork) -> Self {
        Self { network, service_vars: Vec::new(), deadhead_vars: Vec::new(), num_rows: 0 }
    }

    /// Pushes all columns and rows of the initial model into the backend.
    pub fn build(&mut self, backend: &mut dyn LpBackend) {
        let network = self.network;

        for &edge_id in network.required_edges() {
            let (forward, reverse) = network.service_cost(edge_id).expect("a required edge carries service costs");

            let forward_var = backend.add_column(VariableKind::Binary, 0., 1., forward);
            let reverse_var = backend.add_column(VariableKind::Binary, 0., 1., reverse);
            self.service_vars.push((forward_var, reverse_var));
        }

        // a tour never deadheads one direction of an edge more often than
        // once per service plus the closing leg, which keeps the integer
        // columns bounded and branch and bound finite
        let deadhead_bound = (network.required_edges().len() + 1) as f64;
        for edge_id in 0..network.num_edges() {
            let (forward, reverse) = network.deadhead_cost(edge_id);

            let forward_var = backend.add_column(VariableKind::Integer, 0., deadhead_bound, forward);
            let reverse_var = backend.add_column(VariableKind::Integer, 0., deadhead_bound, reverse);
            self.deadhead_vars.push((forward_var, reverse_var));
        }

        for &(forward_var, reverse_var) in self.service_vars.iter() {
            backend.add_row(1., 1., &[(forward_var, 1.), (reverse_var, 1.)]);
            self.num_rows += 1;
        }

        for vertex in 0..network.num_vertices() {
            let coefficients = self.symmetry_coefficients(vertex);
            if !coefficients.is_empty() {
                backend.add_row(0., 0., &coefficients);
                self.num_rows += 1;
            }
        }
    }

    /// Returns the amount of pushed columns.
    pub fn num_columns(&self) -> usize {
        2 * (self.service_vars.len() + self.deadhead_vars.len())
    }

    /// Returns the amount of pushed rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Reads the integral solution back and assembles the chosen multigraph.
    pub fn decode(&self, backend: &dyn LpBackend) -> SolutionGraph {
        let network = self.network;
        let mut arcs = Vec::new();

        for (ordinal, &edge_id) in network.required_edges().iter().enumerate() {
            let edge = network.edge(edge_id);
            let (forward_cost, reverse_cost) = network.service_cost(edge_id).expect("a required edge carries service costs");
            let (forward_var, reverse_var) = self.service_vars[ordinal];

            if backend.value(forward_var) > 0.5 {
                arcs.push(Traversal::new(edge_id, edge.from, edge.to, TraversalKind::Service, forward_cost));
            } else if backend.value(reverse_var) > 0.5 {
                arcs.push(Traversal::new(edge_id, edge.to, edge.from, TraversalKind::Service, reverse_cost));
            }
        }

        for edge_id in 0..network.num_edges() {
            let edge = network.edge(edge_id);
            let (forward_cost, reverse_cost) = network.deadhead_cost(edge_id);
            let (forward_var, reverse_var) = self.deadhead_vars[edge_id];

            for _ in 0..backend.value(forward_var).round() as i64 {
                arcs.push(Traversal::new(edge_id, edge.from, edge.to, TraversalKind::Deadhead, forward_cost));
            }
            for _ in 0..backend.value(reverse_var).round() as i64 {
                arcs.push(Traversal::new(edge_id, edge.to, edge.from, TraversalKind::Deadhead, reverse_cost));
            }
        }

        SolutionGraph::new(network.num_vertices(), arcs)
    }

    /// Checks connectivity of the solution support over the depot and all
    /// required edge endpoints. Returns the vertex set of one component
    /// separated from the depot, or `None` when the support is connected.
    pub fn find_violated_cut(&self, graph: &SolutionGraph) -> Option<HashSet<VertexId>> {
        let network = self.network;

        let mut support = vec![Vec::new(); network.num_vertices()];
        let mut support_vertices = HashSet::new();
        for arc in graph.arcs() {
            support[arc.from].push(arc.to);
            support[arc.to].push(arc.from);
            support_vertices.insert(arc.from);
            support_vertices.insert(arc.to);
        }
        support_vertices.insert(network.depot());

        let mut reached = HashSet::new();
        let mut queue = vec![network.depot()];
        reached.insert(network.depot());
        while let Some(vertex) = queue.pop() {
            for &next in support[vertex].iter() {
                if reached.insert(next) {
                    queue.push(next);
                }
            }
        }

        let unreached = support_vertices.iter().copied().find(|vertex| !reached.contains(vertex))?;

        // collect the whole separated component so that its cut is maximal
        let mut component = HashSet::new();
        let mut queue = vec![unreached];
        component.insert(unreached);
        while let Some(vertex) = queue.pop() {
            for &next in support[vertex].iter() {
                if component.insert(next) {
                    queue.push(next);
                }
            }
        }

        Some(component)
    }

    /// Adds a cut forcing at least two traversals across the boundary of the
    /// given vertex set. Returns the row id of the new cut.
    pub fn add_connectivity_cut(&mut self, backend: &mut dyn LpBackend, component: &HashSet<VertexId>) -> RowId {
        let network = self.network;
        let mut coefficients = Vec::new();

        let crosses = |edge_id: EdgeId| {
            let edge = network.edge(edge_id);
            component.contains(&edge.from) != component.contains(&edge.to)
        };

        for (ordinal, &edge_id) in network.required_edges().iter().enumerate() {
            if crosses(edge_id) {
                let (forward_var, reverse_var) = self.service_vars[ordinal];
                coefficients.push((forward_var, 1.));
                coefficients.push((reverse_var, 1.));
            }
        }
        for edge_id in 0..network.num_edges() {
            if crosses(edge_id) {
                let (forward_var, reverse_var) = self.deadhead_vars[edge_id];
                coefficients.push((forward_var, 1.));
                coefficients.push((reverse_var, 1.));
            }
        }

        self.num_rows += 1;
        backend.add_row(2., f64::INFINITY, &coefficients)
    }

    fn symmetry_coefficients(&self, vertex: VertexId) -> Vec<(VarId, f64)> {
        let network = self.network;
        let mut coefficients = Vec::new();

        // an arc leaving the vertex counts positive, an entering one negative
        let mut push_pair = |vars: (VarId, VarId), edge_id: EdgeId| {
            let edge = network.edge(edge_id);
            if edge.from == vertex {
                coefficients.push((vars.0, 1.));
                coefficients.push((vars.1, -1.));
            } else if edge.to == vertex {
                coefficients.push((vars.0, -1.));
                coefficients.push((vars.1, 1.));
            }
        };

        for (ordinal, &edge_id) in network.required_edges().iter().enumerate() {
            push_pair(self.service_vars[ordinal], edge_id);
        }
        for edge_id in 0..network.num_edges() {
            push_pair(self.deadhead_vars[edge_id], edge_id);
        }

        coefficients
    }
}
