//! Problem domain models.

mod costs;
pub use self::costs::*;

mod network;
pub use self::network::*;
