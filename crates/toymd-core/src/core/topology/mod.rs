//! # Topology Module
//!
//! This module derives the bonded topology a simulation needs from the raw
//! connectivity of the input structure.
//!
//! ## Overview
//!
//! Only bonds are read from the input. Everything else is derived once,
//! immediately after loading, and stays constant for the run:
//!
//! - **Angles** - every pair of bonded neighbours of a particle forms one angle
//!   centred on that particle
//! - **Exclusions** - the 1-2 and 1-3 partners of every particle, which are
//!   removed from the nonbonded pair sum
//!
//! ## Key Components
//!
//! - [`angles`] - Angle derivation from bonds
//! - [`exclusions`] - Per-particle exclusion sets with O(1) membership checks
//!
//! ## Usage
//!
//! ```ignore
//! use toymd::core::topology::Topology;
//!
//! let topology = Topology::build(system.len(), system.bonds())?;
//! assert!(topology.exclusions.is_excluded(0, 1));
//! ```

pub mod angles;
pub mod exclusions;

use crate::core::models::topology::{Angle, Bond};
use exclusions::Exclusions;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Bond {bond} references particle {index}, but the system has only {n_particles} particles")]
    IndexOutOfRange {
        bond: Bond,
        index: usize,
        n_particles: usize,
    },
    #[error("Bond {0} connects a particle to itself")]
    SelfBond(Bond),
}

/// The complete bonded topology of a system.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub bonds: Vec<Bond>,
    pub angles: Vec<Angle>,
    pub exclusions: Exclusions,
}

impl Topology {
    /// Derives angles and exclusions from a bond list.
    ///
    /// # Arguments
    ///
    /// * `n_particles` - Number of particles in the system.
    /// * `bonds` - The connectivity read from the input.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError`] if a bond references a particle outside the
    /// system or connects a particle to itself.
    pub fn build(n_particles: usize, bonds: &[Bond]) -> Result<Self, TopologyError> {
        let angles = angles::derive_angles(n_particles, bonds)?;
        let exclusions = exclusions::derive_exclusions(n_particles, bonds, &angles)?;
        debug!(
            bonds = bonds.len(),
            angles = angles.len(),
            "Derived bonded topology."
        );
        Ok(Self {
            bonds: bonds.to_vec(),
            angles,
            exclusions,
        })
    }
}

/// Builds the bonded-neighbour lists of every particle.
///
/// Neighbours appear in the order their bonds were listed. A bond given twice
/// contributes its partner once.
pub(crate) fn adjacency(
    n_particles: usize,
    bonds: &[Bond],
) -> Result<Vec<Vec<usize>>, TopologyError> {
    let mut neighbors = vec![Vec::new(); n_particles];
    for &bond in bonds {
        if bond.i == bond.j {
            return Err(TopologyError::SelfBond(bond));
        }
        for index in [bond.i, bond.j] {
            if index >= n_particles {
                return Err(TopologyError::IndexOutOfRange {
                    bond,
                    index,
                    n_particles,
                });
            }
        }
        if !neighbors[bond.i].contains(&bond.j) {
            neighbors[bond.i].push(bond.j);
            neighbors[bond.j].push(bond.i);
        }
    }
    Ok(neighbors)
}
