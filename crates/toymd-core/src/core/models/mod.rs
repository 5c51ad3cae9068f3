//! # Core Models Module
//!
//! This module contains the data structures used to describe a simulated
//! particle system, providing the foundation for every other part of toymd.
//!
//! ## Overview
//!
//! The models describe *what* is simulated, independent of *how* it moves:
//!
//! - **Particles** carry identity, element and position
//! - **Residues** group particles into molecules, the unit of periodic wrapping
//! - **Topology** holds the bond and angle index types
//! - **Simulation box** defines the periodic cell and the minimum-image convention
//!
//! Velocities, forces and the thermostat factor are dynamic state and live in
//! the engine instead.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual particle representation
//! - [`residue`] - Residue grouping of particles
//! - [`simulation_box`] - Orthorhombic periodic cell, minimum image and residue wrapping
//! - [`system`] - Complete particle system with residues and bonds
//! - [`topology`] - Bond and angle index types
//!
//! ## Usage
//!
//! ```ignore
//! use toymd::core::models::{atom::Particle, simulation_box::SimulationBox, system::ParticleSystem};
//!
//! let mut system = ParticleSystem::new(SimulationBox::new(3.0, 3.0, 3.0)?);
//! let residue = system.add_residue('A', 1, "SOL");
//! system.add_particle(Particle::new(1, "OW", "O", residue, Point3::new(0.0, 0.0, 0.0)));
//! ```

pub mod atom;
pub mod residue;
pub mod simulation_box;
pub mod system;
pub mod topology;
