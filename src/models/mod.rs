//! Models to represent problem and solution domain.

pub mod common;

mod domain;
pub use self::domain::*;

pub mod problem;
pub mod solution;
