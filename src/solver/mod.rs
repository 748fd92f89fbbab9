//! Contains the line coverage solver: a mixed integer formulation selecting
//! service orientations and deadhead flow, a pluggable LP backend, and the
//! construction of the closed walk through the chosen multigraph.

#[cfg(test)]
#[path = "../../tests/unit/solver/solver_test.rs"]
mod solver_test;

use crate::algorithms::euler::{find_euler_circuit, NotEulerian};
use crate::algorithms::matching::MatchingError;
use crate::models::common::Cost;
use crate::models::problem::CoverageNetwork;
use crate::models::solution::{Route, SolutionGraph, Traversal, TraversalKind};
use crate::models::Solution;
use crate::utils::{Environment, GenericError, Timer};
use std::fmt::{Display, Formatter};

mod backend;
pub use self::backend::{LpBackend, LpStatus, RowId, SimplexBackend, VarId, VariableKind};

mod formulation;
pub use self::formulation::RouteFormulation;

mod tjoin;
pub use self::tjoin::compute_tjoin;

/// Specifies errors surfaced by the coverage solver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SolverError {
    /// A perfect pairing was requested on a graph which has none.
    NoPerfectMatching,
    /// The matching loop, the LP backend or the repair loop failed to converge.
    NumericalFailure(GenericError),
    /// The LP backend reported an infeasible model.
    LpInfeasible,
    /// The LP backend reported an unbounded model.
    LpUnbounded,
    /// The route constructor received a multigraph without an Eulerian circuit.
    NotEulerian(GenericError),
    /// The input network or configuration is malformed.
    InvalidInput(GenericError),
}

impl Display for SolverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::NoPerfectMatching => write!(f, "the graph does not have a perfect matching"),
            SolverError::NumericalFailure(detail) => write!(f, "numerical failure: {detail}"),
            SolverError::LpInfeasible => write!(f, "the lp model is infeasible"),
            SolverError::LpUnbounded => write!(f, "the lp model is unbounded"),
            SolverError::NotEulerian(detail) => write!(f, "{detail}"),
            SolverError::InvalidInput(detail) => write!(f, "invalid input: {detail}"),
        }
    }
}

impl std::error::Error for SolverError {}

impl From<MatchingError> for SolverError {
    fn from(error: MatchingError) -> Self {
        match error {
            MatchingError::NoPerfectMatching => SolverError::NoPerfectMatching,
            MatchingError::NumericalFailure => {
                SolverError::NumericalFailure("the matching engine failed to converge".into())
            }
        }
    }
}

impl From<NotEulerian> for SolverError {
    fn from(error: NotEulerian) -> Self {
        SolverError::NotEulerian(error.to_string().into())
    }
}

impl From<GenericError> for SolverError {
    fn from(error: GenericError) -> Self {
        SolverError::InvalidInput(error)
    }
}

/// Plans a minimum cost closed walk which services every required edge of a
/// coverage network, starting and ending at the depot.
///
/// The solver builds a mixed integer model over the network, repairs
/// connectivity of its solutions lazily and synthesizes the final walk with
/// Hierholzer's algorithm. It is synchronous and deterministic: two runs
/// over the same network produce identical routes.
pub struct CoverageSolver<'a> {
    network: &'a CoverageNetwork,
    environment: Environment,
    max_repairs: usize,
}

impl<'a> CoverageSolver<'a> {
    /// Creates a solver over the network with the default amount of
    /// connectivity repairs, one per network vertex.
    pub fn new(network: &'a CoverageNetwork) -> Self {
        Self { network, environment: Environment::default(), max_repairs: network.num_vertices() }
    }

    /// Sets the environment to report progress through.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Overrides the connectivity repair bound.
    pub fn with_max_repairs(mut self, max_repairs: usize) -> Self {
        self.max_repairs = max_repairs;
        self
    }

    /// Solves the problem with the built-in simplex backend.
    pub fn solve(&self) -> Result<Solution, SolverError> {
        self.solve_with_backend(&mut SimplexBackend::new())
    }

    /// Solves the problem pushing the model through the given LP backend.
    pub fn solve_with_backend(&self, backend: &mut dyn LpBackend) -> Result<Solution, SolverError> {
        let timer = Timer::start();
        let logger = self.environment.logger.clone();

        let mut formulation = RouteFormulation::new(self.network);
        formulation.build(backend);
        (logger)(&format!("built route formulation: {} columns, {} rows", formulation.num_columns(), formulation.num_rows()));

        let mut repairs = 0;
        let graph = loop {
            match backend.solve() {
                LpStatus::Optimal => {}
                LpStatus::Infeasible => return Err(SolverError::LpInfeasible),
                LpStatus::Unbounded => return Err(SolverError::LpUnbounded),
                LpStatus::NumericalFailure => {
                    return Err(SolverError::NumericalFailure("the lp backend reported numerical trouble".into()))
                }
            }

            let graph = formulation.decode(backend);
            match formulation.find_violated_cut(&graph) {
                Some(component) => {
                    if repairs == self.max_repairs {
                        return Err(SolverError::NumericalFailure(
                            format!("support is still disconnected after {repairs} repairs").into(),
                        ));
                    }
                    formulation.add_connectivity_cut(backend, &component);
                    repairs += 1;
                    (logger)(&format!("support is disconnected, added cut {repairs} around {} vertices", component.len()));
                }
                None => break graph,
            }
        };

        let solution = self.construct_route(graph)?;
        (logger)(&format!(
            "solved line coverage in {:.3}s with {} repairs, objective {:.4}",
            timer.elapsed_secs_as_f64(),
            repairs,
            solution.objective
        ));

        Ok(solution)
    }

    /// Synthesizes the closed walk through the multigraph.
    ///
    /// A multigraph with odd degree parity in its undirected skeleton, which
    /// can happen for hand-assembled inputs, is first repaired by adding
    /// deadhead traversals along a minimum cost T-join over the odd vertices.
    pub fn construct_route(&self, graph: SolutionGraph) -> Result<Solution, SolverError> {
        let graph = self.repair_parity(graph)?;

        let endpoints = graph.arcs().iter().map(|arc| (arc.from, arc.to)).collect::<Vec<_>>();
        let walk = find_euler_circuit(graph.num_vertices(), &endpoints, self.network.depot())?;

        let legs = walk.into_iter().map(|arc| graph.arcs()[arc]).collect::<Vec<_>>();
        let route = Route::new(self.network.depot(), legs).map_err(SolverError::NotEulerian)?;

        let objective: Cost = graph.total_cost();

        Ok(Solution { graph, route, objective })
    }

    fn repair_parity(&self, graph: SolutionGraph) -> Result<SolutionGraph, SolverError> {
        let odd = graph.odd_degree_vertices();
        if odd.is_empty() {
            return Ok(graph);
        }

        let join = compute_tjoin(self.network, &odd)?;

        let mut surplus = vec![0i64; graph.num_vertices()];
        for arc in graph.arcs() {
            surplus[arc.from] += 1;
            surplus[arc.to] -= 1;
        }

        // each join edge travels toward the endpoint which is short of
        // incoming traversals
        let mut arcs = graph.arcs().to_vec();
        for edge_id in join {
            let edge = self.network.edge(edge_id);
            let (forward_cost, reverse_cost) = self.network.deadhead_cost(edge_id);

            let (from, to, cost) = if surplus[edge.from] > surplus[edge.to] {
                (edge.to, edge.from, reverse_cost)
            } else {
                (edge.from, edge.to, forward_cost)
            };

            surplus[from] += 1;
            surplus[to] -= 1;
            arcs.push(Traversal::new(edge_id, from, to, TraversalKind::Deadhead, cost));
        }

        Ok(SolutionGraph::new(graph.num_vertices(), arcs))
    }
}
