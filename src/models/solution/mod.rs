//! Solution domain models.

mod multigraph;
pub use self::multigraph::*;

mod route;
pub use self::route::*;
