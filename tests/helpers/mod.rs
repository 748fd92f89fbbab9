pub mod models;
pub use self::models::*;
