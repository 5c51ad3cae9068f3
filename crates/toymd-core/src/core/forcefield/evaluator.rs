use super::parameterization::ResolvedForcefield;
use super::potentials::{harmonic_angle, harmonic_bond, lennard_jones};
use super::term::EnergyTerm;
use crate::core::models::simulation_box::SimulationBox;
use crate::core::topology::Topology;
use crate::core::utils::cell_list::CellList;
use nalgebra::{Point3, Vector3};
use std::fmt;
use thiserror::Error;

/// The interaction type a force error originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Bond,
    Angle,
    Vdw,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InteractionKind::Bond => "bond",
            InteractionKind::Angle => "angle",
            InteractionKind::Vdw => "van der Waals",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ForceError {
    #[error("Degenerate {kind} geometry: particles {particles:?} coincide")]
    DegenerateGeometry {
        kind: InteractionKind,
        particles: Vec<usize>,
    },
    #[error("Non-finite {kind} energy or force")]
    NonFinite { kind: InteractionKind },
}

/// Energies and per-particle forces of one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceResult {
    pub energy: EnergyTerm,
    pub forces: Vec<Vector3<f64>>,
}

/// Computes bonded and nonbonded energies and forces under periodic boundaries.
///
/// The topology and parameters are fixed for the lifetime of the evaluator;
/// only coordinates change between calls. Forces are rebuilt from zero on
/// every call.
pub struct ForceEvaluator<'a> {
    topology: &'a Topology,
    params: &'a ResolvedForcefield,
    cutoff: Option<f64>,
}

impl<'a> ForceEvaluator<'a> {
    pub fn new(topology: &'a Topology, params: &'a ResolvedForcefield) -> Self {
        Self {
            topology,
            params,
            cutoff: None,
        }
    }

    /// Truncates the Lennard-Jones sum at `cutoff` nm.
    pub fn with_cutoff(mut self, cutoff: Option<f64>) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff
    }

    /// Evaluates the potential energy and forces at `positions`.
    ///
    /// # Errors
    ///
    /// Returns [`ForceError::DegenerateGeometry`] if a bonded or nonbonded
    /// distance vanishes, and [`ForceError::NonFinite`] if any energy or force
    /// component is NaN or infinite.
    pub fn evaluate(
        &self,
        simulation_box: &SimulationBox,
        positions: &[Point3<f64>],
    ) -> Result<ForceResult, ForceError> {
        let mut forces = vec![Vector3::zeros(); positions.len()];

        let bond = self.accumulate_bonds(simulation_box, positions, &mut forces)?;
        ensure_finite(InteractionKind::Bond, bond, &forces)?;
        let angle = self.accumulate_angles(simulation_box, positions, &mut forces)?;
        ensure_finite(InteractionKind::Angle, angle, &forces)?;
        let vdw = self.accumulate_nonbonded(simulation_box, positions, &mut forces)?;
        ensure_finite(InteractionKind::Vdw, vdw, &forces)?;

        let energy = EnergyTerm { bond, angle, vdw };
        Ok(ForceResult { energy, forces })
    }

    fn accumulate_bonds(
        &self,
        simulation_box: &SimulationBox,
        positions: &[Point3<f64>],
        forces: &mut [Vector3<f64>],
    ) -> Result<f64, ForceError> {
        let mut energy = 0.0;
        for (bond, param) in self.topology.bonds.iter().zip(&self.params.bond_params) {
            let d = simulation_box.displacement(&positions[bond.j], &positions[bond.i]);
            let (e, f) = harmonic_bond(&d, param.length, param.k).ok_or_else(|| {
                ForceError::DegenerateGeometry {
                    kind: InteractionKind::Bond,
                    particles: vec![bond.i, bond.j],
                }
            })?;
            energy += e;
            forces[bond.i] += f;
            forces[bond.j] -= f;
        }
        Ok(energy)
    }

    fn accumulate_angles(
        &self,
        simulation_box: &SimulationBox,
        positions: &[Point3<f64>],
        forces: &mut [Vector3<f64>],
    ) -> Result<f64, ForceError> {
        let mut energy = 0.0;
        for (angle, param) in self.topology.angles.iter().zip(&self.params.angle_params) {
            let center = &positions[angle.j];
            let a = simulation_box.displacement(center, &positions[angle.i]);
            let b = simulation_box.displacement(center, &positions[angle.k]);
            let result = harmonic_angle(&a, &b, param.theta0, param.k).ok_or_else(|| {
                ForceError::DegenerateGeometry {
                    kind: InteractionKind::Angle,
                    particles: vec![angle.i, angle.j, angle.k],
                }
            })?;
            energy += result.energy;
            forces[angle.i] += result.f_i;
            forces[angle.j] += result.f_j;
            forces[angle.k] += result.f_k;
        }
        Ok(energy)
    }

    fn accumulate_nonbonded(
        &self,
        simulation_box: &SimulationBox,
        positions: &[Point3<f64>],
        forces: &mut [Vector3<f64>],
    ) -> Result<f64, ForceError> {
        let exclusions = &self.topology.exclusions;
        let cutoff_sq = self.cutoff.map(|rc| rc * rc);
        let mut energy = 0.0;

        let mut add_pair = |i: usize, j: usize| -> Result<(), ForceError> {
            if exclusions.is_excluded(i, j) {
                return Ok(());
            }
            let d = simulation_box.displacement(&positions[j], &positions[i]);
            if cutoff_sq.is_some_and(|rc2| d.norm_squared() >= rc2) {
                return Ok(());
            }
            let lj = self.params.lj(i, j);
            let (e, f) = lennard_jones(&d, lj).ok_or_else(|| ForceError::DegenerateGeometry {
                kind: InteractionKind::Vdw,
                particles: vec![i, j],
            })?;
            energy += e;
            forces[i] += f;
            forces[j] -= f;
            Ok(())
        };

        let cells = self
            .cutoff
            .and_then(|rc| CellList::build(simulation_box, positions, rc));
        match cells {
            Some(cells) => {
                for (i, j) in cells.candidate_pairs() {
                    add_pair(i, j)?;
                }
            }
            None => {
                for i in 0..positions.len() {
                    for j in (i + 1)..positions.len() {
                        add_pair(i, j)?;
                    }
                }
            }
        }
        Ok(energy)
    }
}

/// Forces are checked after every stage, so the first stage that produces a
/// non-finite value is the one reported.
fn ensure_finite(
    kind: InteractionKind,
    energy: f64,
    forces: &[Vector3<f64>],
) -> Result<(), ForceError> {
    if energy.is_finite() && forces.iter().all(|f| f.iter().all(|c| c.is_finite())) {
        Ok(())
    } else {
        Err(ForceError::NonFinite { kind })
    }
}
