use super::residue::Residue;
use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Box edge lengths must be finite and strictly positive, got ({x}, {y}, {z})")]
pub struct InvalidBoxError {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// An orthorhombic periodic simulation cell.
///
/// The primary cell spans `[0, L)` along each axis. Edge lengths are in
/// nanometers and never change during a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBox {
    lengths: Vector3<f64>,
}

impl SimulationBox {
    /// Creates a box from its three edge lengths.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBoxError`] if any edge is non-positive or not finite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, InvalidBoxError> {
        let valid = |l: f64| l.is_finite() && l > 0.0;
        if !(valid(x) && valid(y) && valid(z)) {
            return Err(InvalidBoxError { x, y, z });
        }
        Ok(Self {
            lengths: Vector3::new(x, y, z),
        })
    }

    pub fn lengths(&self) -> &Vector3<f64> {
        &self.lengths
    }

    pub fn min_length(&self) -> f64 {
        self.lengths.min()
    }

    /// Applies the minimum-image convention to a displacement vector.
    ///
    /// Each component is mapped into `[-L/2, L/2)`, which selects the
    /// closest periodic copy for any displacement, however many cells away.
    #[inline]
    pub fn minimum_image(&self, d: Vector3<f64>) -> Vector3<f64> {
        d.zip_map(&self.lengths, |di, l| di - l * (di / l + 0.5).floor())
    }

    /// Minimum-image displacement pointing from `from` to `to`.
    #[inline]
    pub fn displacement(&self, from: &Point3<f64>, to: &Point3<f64>) -> Vector3<f64> {
        self.minimum_image(to - from)
    }

    /// The translation that brings `reference` into the primary cell.
    #[inline]
    pub fn image_shift(&self, reference: &Point3<f64>) -> Vector3<f64> {
        reference
            .coords
            .zip_map(&self.lengths, |c, l| -l * (c / l).floor())
    }

    /// Re-images whole residues into the primary cell.
    ///
    /// For every residue the geometric centroid of its particles is used as
    /// the reference point. If the centroid lies outside `[0, L)` along an
    /// axis, every particle of the residue is translated by the same multiple
    /// of that edge length, so bonded geometry is never torn across the
    /// boundary.
    ///
    /// # Arguments
    ///
    /// * `residues` - The residues of the system, each listing its particles.
    /// * `positions` - Particle positions, indexed like the system's particles.
    pub fn wrap_residues(&self, residues: &[Residue], positions: &mut [Point3<f64>]) {
        for residue in residues {
            let atoms = residue.atoms();
            if atoms.is_empty() {
                continue;
            }
            let sum: Vector3<f64> = atoms.iter().map(|&i| positions[i].coords).sum();
            let centroid = Point3::from(sum / atoms.len() as f64);

            let shift = self.image_shift(&centroid);
            if shift == Vector3::zeros() {
                continue;
            }
            for &i in atoms {
                positions[i] += shift;
            }
        }
    }
}
