use super::atom::Particle;
use super::residue::Residue;
use super::simulation_box::SimulationBox;
use super::topology::Bond;
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};

/// Represents a complete particle system: the periodic cell, the particles,
/// their residues and the covalent connectivity read from the input.
///
/// Particles and residues are stored densely and addressed by index, which is
/// the form every numerical kernel of the engine consumes.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    /// The periodic simulation cell.
    simulation_box: SimulationBox,
    /// Particles in input order.
    particles: Vec<Particle>,
    /// Residues in order of first appearance.
    residues: Vec<Residue>,
    /// Deduplicated bonds with canonical endpoint order.
    bonds: Vec<Bond>,
    /// Lookup map for finding residues by chain identifier and residue number.
    residue_index_map: HashMap<(char, isize), usize>,
    /// Lookup map from source serial number to particle index.
    serial_map: HashMap<usize, usize>,
    /// Set mirror of `bonds` for idempotent insertion.
    bond_set: HashSet<Bond>,
}

impl ParticleSystem {
    /// Creates a new, empty system inside the given periodic cell.
    pub fn new(simulation_box: SimulationBox) -> Self {
        Self {
            simulation_box,
            particles: Vec::new(),
            residues: Vec::new(),
            bonds: Vec::new(),
            residue_index_map: HashMap::new(),
            serial_map: HashMap::new(),
            bond_set: HashSet::new(),
        }
    }

    pub fn simulation_box(&self) -> &SimulationBox {
        &self.simulation_box
    }

    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Returns a slice of all bonds in the system.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Finds a particle index by the serial number it had in the source file.
    pub fn find_particle_by_serial(&self, serial: usize) -> Option<usize> {
        self.serial_map.get(&serial).copied()
    }

    /// Finds a residue index by chain identifier and residue number.
    pub fn find_residue(&self, chain_id: char, number: isize) -> Option<usize> {
        self.residue_index_map.get(&(chain_id, number)).copied()
    }

    /// Adds a new residue to the system or returns the existing one.
    ///
    /// This method is idempotent; a residue is identified by its chain
    /// identifier and residue number.
    ///
    /// # Return
    ///
    /// The index of the residue (new or existing).
    pub fn add_residue(&mut self, chain_id: char, number: isize, name: &str) -> usize {
        *self
            .residue_index_map
            .entry((chain_id, number))
            .or_insert_with(|| {
                self.residues.push(Residue::new(number, name, chain_id));
                self.residues.len() - 1
            })
    }

    /// Adds a particle to the residue it names in `particle.residue_index`.
    ///
    /// # Return
    ///
    /// Returns `Some(index)` of the new particle, or `None` if the residue
    /// does not exist or the serial number is already taken.
    pub fn add_particle(&mut self, particle: Particle) -> Option<usize> {
        if particle.residue_index >= self.residues.len()
            || self.serial_map.contains_key(&particle.serial)
        {
            return None;
        }
        let index = self.particles.len();
        self.serial_map.insert(particle.serial, index);
        self.residues[particle.residue_index].add_atom(index);
        self.particles.push(particle);
        Some(index)
    }

    /// Adds a bond between two particles.
    ///
    /// Adding an existing bond (in either orientation) succeeds without
    /// creating a duplicate.
    ///
    /// # Return
    ///
    /// Returns `None` if either index is out of range or both are equal.
    pub fn add_bond(&mut self, a: usize, b: usize) -> Option<()> {
        if a == b || a >= self.particles.len() || b >= self.particles.len() {
            return None;
        }
        let bond = Bond::new(a, b);
        if self.bond_set.insert(bond) {
            self.bonds.push(bond);
        }
        Some(())
    }

    /// Collects the current particle positions into a new buffer.
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Overwrites particle positions from a buffer indexed like the particles.
    ///
    /// # Panics
    ///
    /// Panics if `positions` does not hold exactly one entry per particle.
    pub fn set_positions(&mut self, positions: &[Point3<f64>]) {
        assert_eq!(positions.len(), self.particles.len());
        for (particle, position) in self.particles.iter_mut().zip(positions) {
            particle.position = *position;
        }
    }

    pub fn elements(&self) -> Vec<&str> {
        self.particles.iter().map(|p| p.element.as_str()).collect()
    }
}
