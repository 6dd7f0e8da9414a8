//! RFC 9457 problem documents and catalog-driven error definitions shared by
//! every REST module of the server.

pub mod catalog;
pub mod problem;

pub use catalog::ErrDef;
pub use problem::{Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};
