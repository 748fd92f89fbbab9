//! This module reimports a commonly used types.

// Reimport core types
pub use crate::solver::CoverageSolver;
pub use crate::solver::SolverError;
pub use crate::solver::{LpBackend, LpStatus, SimplexBackend, VariableKind};

pub use crate::models::common::{Cost, EdgeId, Point, VertexId};
pub use crate::models::problem::{CoverageNetwork, Edge, EdgeCost, EuclideanCost, TableCost};
pub use crate::models::solution::{Route, SolutionGraph, Traversal, TraversalKind};
pub use crate::models::Solution;

// Reimport matching types
pub use crate::algorithms::matching::Matching;
pub use crate::algorithms::matching::MatchingError;

// Reimport utils
pub use crate::utils::compare_floats;
pub use crate::utils::Environment;
pub use crate::utils::InfoLogger;
pub use crate::utils::{GenericError, GenericResult};
