/// Maximum cardinality and minimum cost perfect matching on general undirected
/// graphs via Edmonds' blossom algorithm with primal-dual updates.
///
/// This implementation follows the Minimum Cost Perfect Matching implementation
/// from <https://github.com/dilsonpereira/Minimum-Cost-Perfect-Matching>
///
use std::fmt::{Display, Formatter};

mod graph;
pub use self::graph::Graph;

mod blossom;
pub use self::blossom::Matching;

/// A vertex is a unique identifier for a graph node.
pub type Vertex = usize;

/// A stable index of an undirected edge.
pub type EdgeIndex = usize;

/// Tolerance used by every floating point comparison of the matching engine.
pub const EPSILON: f64 = 1e-10;

/// Returns true if `a` is greater than `b` beyond [`EPSILON`].
#[inline]
pub(crate) fn greater(a: f64, b: f64) -> bool {
    a - b > EPSILON
}

/// Returns true if `x` is within [`EPSILON`] of zero.
#[inline]
pub(crate) fn near_zero(x: f64) -> bool {
    x.abs() < EPSILON
}

/// Specifies errors returned by the matching engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchingError {
    /// A perfect matching was requested on a graph which has none.
    NoPerfectMatching,
    /// The primal-dual loop exceeded its iteration cap or terminated with
    /// disagreeing primal and dual objectives.
    NumericalFailure,
}

impl Display for MatchingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchingError::NoPerfectMatching => write!(f, "the graph does not have a perfect matching"),
            MatchingError::NumericalFailure => write!(f, "the primal-dual matching loop failed to converge"),
        }
    }
}

impl std::error::Error for MatchingError {}
