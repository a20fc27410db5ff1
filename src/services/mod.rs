//! Business rules that sit between the HTTP handlers and the `db` module.
//!
//! Each function takes an explicit database handle and owns its own
//! transaction boundaries.

pub mod contracts;
pub mod reporting;
pub mod settlement;
