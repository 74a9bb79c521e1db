//! Student records: courses, enrollments and ECTS-weighted grades.
//!
//! The workspace crates hold the data model (`model`), the schema
//! (`migration`), persistence with live queries (`store`) and the pure grade
//! reductions (`compute`). This crate wires them into services, a login
//! session and the `gradebook` command line.

pub mod cli;
pub mod config;
pub mod services;
pub mod session;

#[cfg(test)]
pub mod test_utils;
