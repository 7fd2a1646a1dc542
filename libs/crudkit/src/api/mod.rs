//! Transport bindings. Both extract the operation kind and the bearer
//! credential from their own request shape and run the same gate.

pub mod graph;
mod problem;
pub mod rest;

pub use problem::{PROBLEM_CONTENT_TYPE, Problem};
