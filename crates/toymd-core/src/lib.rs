//! # toymd Core Library
//!
//! A minimal classical molecular dynamics engine: harmonic bonds and angles,
//! Lennard-Jones nonbonded interactions under periodic boundaries, a leapfrog
//! integrator and a Berendsen-style velocity scaling thermostat.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ParticleSystem`,
//!   `SimulationBox`), topology derivation, force field loading, the pure
//!   potential kernels and the force evaluator, and file I/O.
//!
//! - **[`engine`]: The Dynamics.** Run parameters, the integration state,
//!   the integrator and thermostat, progress reporting and run errors.
//!
//! - **[`workflows`]: The Public API.** Sequences `core` and `engine` into a
//!   complete simulation run from a loaded structure and force field.
//!
//! Units throughout are nm, ps, amu, kJ/mol and K.

pub mod core;
pub mod engine;
pub mod workflows;
