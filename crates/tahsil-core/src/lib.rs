//! tahsil-core: grade aggregation and goal projection engine.
//!
//! This crate holds the data model, the per-subject and aggregate scoring
//! rules for every Moroccan baccalaureate mode, and the solvers that tell a
//! student what is still needed to reach a target average.

pub mod aggregate;
pub mod catalog;
pub mod chart;
pub mod distinction;
pub mod error;
pub mod model;
pub mod parser;
pub mod projection;
pub mod scoring;
pub mod template;
pub mod traits;
pub mod validation;
