//! # Workflows Module
//!
//! High-level entry points that sequence the core and engine components into
//! a complete run.
//!
//! - **Simulation Workflow** ([`simulate`]) - Validation, topology derivation,
//!   parameterization and the step loop of a molecular dynamics run.

pub mod simulate;
