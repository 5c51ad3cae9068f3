//! # Core Module
//!
//! The building blocks of a simulation: how a system is represented, how its
//! bonded topology is derived, how forces are computed and how structures are
//! read and written.
//!
//! - **Particle Representation** ([`models`]) - Particles, residues, bonds, angles and the periodic box
//! - **Topology** ([`topology`]) - Angles and nonbonded exclusions derived from bonds
//! - **Forces** ([`forcefield`]) - Parameter files, parameter resolution and force evaluation
//! - **File I/O** ([`io`]) - PDB structures, trajectories and energy logs
//! - **Utilities** ([`utils`]) - Spatial search helpers

pub mod forcefield;
pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
