use crate::models::common::Cost;
use crate::models::solution::{Route, SolutionGraph};

/// Represents a line coverage solution: the Eulerian multigraph selected by
/// the solver, the closed walk through it and the total objective value.
pub struct Solution {
    /// The solution multigraph.
    pub graph: SolutionGraph,
    /// The closed walk through the multigraph rooted at the depot.
    pub route: Route,
    /// Total objective value.
    pub objective: Cost,
}
