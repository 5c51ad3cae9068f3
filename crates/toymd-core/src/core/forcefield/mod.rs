//! # Force Field Module
//!
//! Parameter loading, parameter resolution and force evaluation for the
//! classical potentials toymd integrates.
//!
//! ## Overview
//!
//! The potential energy of a configuration is the sum of three terms:
//!
//! - **Harmonic bonds** `½k(r - b0)²` over every bond of the topology
//! - **Harmonic angles** `½k(θ - θ0)²` over every derived angle
//! - **Lennard-Jones 12-6** over every non-excluded particle pair, with
//!   Lorentz-Berthelot mixing and optional plain truncation at a cutoff
//!
//! All distances use the minimum-image convention of the simulation box.
//!
//! ## Key Components
//!
//! - [`params`] - The force field file: masses, LJ, bond and angle tables
//! - [`parameterization`] - One-time resolution of those tables against a system
//! - [`potentials`] - Pure energy/force kernels of the three potentials
//! - [`evaluator`] - Energy and per-particle forces of a whole configuration
//! - [`term`] - Energy breakdown by interaction type
//!
//! ## Usage
//!
//! ```ignore
//! use toymd::core::forcefield::{evaluator::ForceEvaluator, parameterization::Parameterizer};
//!
//! let params = Parameterizer::new(&forcefield).parameterize(&system.elements(), &topology)?;
//! let result = ForceEvaluator::new(&topology, &params).evaluate(system.simulation_box(), &positions)?;
//! println!("E_pot = {:.3} kJ/mol", result.energy.total());
//! ```

pub mod evaluator;
pub mod parameterization;
pub mod params;
pub mod potentials;
pub mod term;
