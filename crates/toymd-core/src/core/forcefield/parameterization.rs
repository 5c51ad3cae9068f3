use super::params::{BondParam, Forcefield};
use super::potentials::LjCoefficients;
use crate::core::topology::Topology;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Dense index of an interned element symbol.
pub type ElementId = usize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterizationError {
    #[error("Particle {particle} has element '{element}', which has no mass in the force field")]
    UnknownElement { particle: usize, element: String },
    #[error("Element '{element}' has a non-positive or non-finite mass")]
    InvalidMass { element: String },
    #[error("Missing Lennard-Jones parameters for element '{element}'")]
    MissingNonbondedParameters { element: String },
    #[error("Missing {kind} parameters for elements '{elements}' (particles {particles:?})")]
    MissingBondedParameters {
        kind: &'static str,
        elements: String,
        particles: Vec<usize>,
    },
}

/// Interns element symbols into dense [`ElementId`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementTable {
    symbols: Vec<String>,
    ids: HashMap<String, ElementId>,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `symbol`, assigning the next free one on first use.
    pub fn intern(&mut self, symbol: &str) -> ElementId {
        if let Some(&id) = self.ids.get(symbol) {
            return id;
        }
        let id = self.symbols.len();
        self.symbols.push(symbol.to_string());
        self.ids.insert(symbol.to_string(), id);
        id
    }

    pub fn id(&self, symbol: &str) -> Option<ElementId> {
        self.ids.get(symbol).copied()
    }

    pub fn symbol(&self, id: ElementId) -> Option<&str> {
        self.symbols.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Looks up the mass of every particle by its element symbol.
///
/// # Errors
///
/// Returns [`ParameterizationError::UnknownElement`] for the first particle
/// whose element is missing from `mass_table`, and
/// [`ParameterizationError::InvalidMass`] if a table entry is not a positive
/// finite number.
pub fn resolve_masses<S: AsRef<str>>(
    elements: &[S],
    mass_table: &HashMap<String, f64>,
) -> Result<Vec<f64>, ParameterizationError> {
    elements
        .iter()
        .enumerate()
        .map(|(particle, element)| {
            let element = element.as_ref();
            let mass = mass_table.get(element).copied().ok_or_else(|| {
                ParameterizationError::UnknownElement {
                    particle,
                    element: element.to_string(),
                }
            })?;
            if mass.is_finite() && mass > 0.0 {
                Ok(mass)
            } else {
                Err(ParameterizationError::InvalidMass {
                    element: element.to_string(),
                })
            }
        })
        .collect()
}

/// Angle parameters with the reference angle converted to radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAngle {
    pub theta0: f64,
    pub k: f64,
}

/// Force field parameters resolved against one system and its topology.
///
/// Bond and angle parameters are stored parallel to
/// [`Topology::bonds`] and [`Topology::angles`]; Lennard-Jones coefficients
/// are precomputed for every element pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedForcefield {
    pub elements: ElementTable,
    pub element_ids: Vec<ElementId>,
    pub masses: Vec<f64>,
    lj_table: Vec<LjCoefficients>,
    pub bond_params: Vec<BondParam>,
    pub angle_params: Vec<ResolvedAngle>,
}

impl ResolvedForcefield {
    /// Mixed Lennard-Jones coefficients of particles `i` and `j`.
    #[inline]
    pub fn lj(&self, i: usize, j: usize) -> &LjCoefficients {
        let n = self.elements.len();
        &self.lj_table[self.element_ids[i] * n + self.element_ids[j]]
    }

    pub fn n_particles(&self) -> usize {
        self.element_ids.len()
    }
}

pub struct Parameterizer<'a> {
    forcefield: &'a Forcefield,
}

impl<'a> Parameterizer<'a> {
    pub fn new(forcefield: &'a Forcefield) -> Self {
        Self { forcefield }
    }

    /// Resolves every parameter a run needs.
    ///
    /// # Arguments
    ///
    /// * `elements` - Normalized element symbol of every particle.
    /// * `topology` - Bonds, derived angles and exclusions of the system.
    ///
    /// # Errors
    ///
    /// Fails on the first element without a mass or Lennard-Jones entry and
    /// on the first bond or angle whose element combination has no
    /// parameters. Nothing falls back to a zero interaction.
    pub fn parameterize<S: AsRef<str>>(
        &self,
        elements: &[S],
        topology: &Topology,
    ) -> Result<ResolvedForcefield, ParameterizationError> {
        let masses = resolve_masses(elements, &self.forcefield.masses)?;

        let mut table = ElementTable::new();
        let element_ids: Vec<ElementId> = elements
            .iter()
            .map(|e| table.intern(e.as_ref()))
            .collect();

        let lj_table = self.build_lj_table(&table)?;

        let bond_params = topology
            .bonds
            .iter()
            .map(|bond| {
                let (a, b) = (elements[bond.i].as_ref(), elements[bond.j].as_ref());
                self.forcefield.bond(a, b).copied().ok_or_else(|| {
                    ParameterizationError::MissingBondedParameters {
                        kind: "bond",
                        elements: format!("{a}-{b}"),
                        particles: vec![bond.i, bond.j],
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let angle_params = topology
            .angles
            .iter()
            .map(|angle| {
                let (a, c, b) = (
                    elements[angle.i].as_ref(),
                    elements[angle.j].as_ref(),
                    elements[angle.k].as_ref(),
                );
                self.forcefield
                    .angle(a, c, b)
                    .map(|p| ResolvedAngle {
                        theta0: p.angle.to_radians(),
                        k: p.k,
                    })
                    .ok_or_else(|| ParameterizationError::MissingBondedParameters {
                        kind: "angle",
                        elements: format!("{a}-{c}-{b}"),
                        particles: vec![angle.i, angle.j, angle.k],
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            elements = table.len(),
            bonds = bond_params.len(),
            angles = angle_params.len(),
            "Resolved force field parameters."
        );

        Ok(ResolvedForcefield {
            elements: table,
            element_ids,
            masses,
            lj_table,
            bond_params,
            angle_params,
        })
    }

    fn build_lj_table(
        &self,
        table: &ElementTable,
    ) -> Result<Vec<LjCoefficients>, ParameterizationError> {
        let params = (0..table.len())
            .map(|id| {
                let symbol = table.symbol(id).unwrap_or_default();
                self.forcefield.vdw.get(symbol).copied().ok_or_else(|| {
                    ParameterizationError::MissingNonbondedParameters {
                        element: symbol.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let n = params.len();
        let mut lj_table = vec![LjCoefficients::default(); n * n];
        for (a, pa) in params.iter().enumerate() {
            for (b, pb) in params.iter().enumerate() {
                lj_table[a * n + b] =
                    LjCoefficients::mixed(pa.sigma, pa.epsilon, pb.sigma, pb.epsilon);
            }
        }
        Ok(lj_table)
    }
}
