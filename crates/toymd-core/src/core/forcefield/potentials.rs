use nalgebra::Vector3;

/// Distances below this (nm) are treated as coincident particles.
pub const MIN_DISTANCE: f64 = 1e-10;
/// Below this `sin θ` an angle is considered linear and its gradient direction undefined.
const MIN_SIN_THETA: f64 = 1e-8;

/// Precomputed Lennard-Jones coefficients of one element pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LjCoefficients {
    /// `4·ε·σ⁶` in kJ·nm⁶/mol.
    pub c6: f64,
    /// `4·ε·σ¹²` in kJ·nm¹²/mol.
    pub c12: f64,
}

impl LjCoefficients {
    pub fn from_sigma_epsilon(sigma: f64, epsilon: f64) -> Self {
        let sigma6 = sigma.powi(6);
        Self {
            c6: 4.0 * epsilon * sigma6,
            c12: 4.0 * epsilon * sigma6 * sigma6,
        }
    }

    /// Lorentz-Berthelot mixing: arithmetic mean of σ, geometric mean of ε.
    pub fn mixed(sigma_a: f64, epsilon_a: f64, sigma_b: f64, epsilon_b: f64) -> Self {
        Self::from_sigma_epsilon(0.5 * (sigma_a + sigma_b), (epsilon_a * epsilon_b).sqrt())
    }

    pub fn is_zero(&self) -> bool {
        self.c6 == 0.0 && self.c12 == 0.0
    }
}

/// Lennard-Jones 12-6 energy and force for a pair.
///
/// `d` is the displacement from particle `j` to particle `i` (`x_i - x_j`,
/// already minimum-imaged). Returns the energy and the force acting on `i`;
/// the force on `j` is its exact negation.
///
/// Returns `None` if the particles coincide.
#[inline]
pub fn lennard_jones(d: &Vector3<f64>, lj: &LjCoefficients) -> Option<(f64, Vector3<f64>)> {
    let r2 = d.norm_squared();
    if r2 < MIN_DISTANCE * MIN_DISTANCE {
        return None;
    }
    let inv_r2 = 1.0 / r2;
    let inv_r6 = inv_r2 * inv_r2 * inv_r2;
    let rep = lj.c12 * inv_r6 * inv_r6;
    let disp = lj.c6 * inv_r6;
    let energy = rep - disp;
    let f_over_r = (12.0 * rep - 6.0 * disp) * inv_r2;
    Some((energy, d * f_over_r))
}

/// Harmonic bond energy `½k(r - b0)²` and the force on particle `i`.
///
/// `d` is `x_i - x_j`. The force lies along the bond axis; the force on `j`
/// is its exact negation. Returns `None` for a zero-length bond.
#[inline]
pub fn harmonic_bond(
    d: &Vector3<f64>,
    reference_length: f64,
    k: f64,
) -> Option<(f64, Vector3<f64>)> {
    let r = d.norm();
    if r < MIN_DISTANCE {
        return None;
    }
    let dr = r - reference_length;
    let energy = 0.5 * k * dr * dr;
    let force = d * (-k * dr / r);
    Some((energy, force))
}

/// Forces of a harmonic angle term on its three particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleForces {
    pub energy: f64,
    pub f_i: Vector3<f64>,
    pub f_j: Vector3<f64>,
    pub f_k: Vector3<f64>,
}

/// Harmonic angle energy `½k(θ - θ0)²` and its forces.
///
/// `a` is `x_i - x_j` and `b` is `x_k - x_j`, with `j` the central particle.
/// `reference_angle` is in radians. The three forces sum to zero.
///
/// For a (nearly) linear arrangement the gradient direction is undefined; the
/// energy is still reported but no force is applied. Returns `None` if either
/// arm has zero length.
#[inline]
pub fn harmonic_angle(
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    reference_angle: f64,
    k: f64,
) -> Option<AngleForces> {
    let ra = a.norm();
    let rb = b.norm();
    if ra < MIN_DISTANCE || rb < MIN_DISTANCE {
        return None;
    }
    let cos_theta = (a.dot(b) / (ra * rb)).clamp(-1.0, 1.0);
    let theta = cos_theta.acos();
    let dtheta = theta - reference_angle;
    let energy = 0.5 * k * dtheta * dtheta;

    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    if sin_theta < MIN_SIN_THETA {
        let zero = Vector3::zeros();
        return Some(AngleForces {
            energy,
            f_i: zero,
            f_j: zero,
            f_k: zero,
        });
    }

    // -dV/dx_i = (dV/dθ / sin θ) · dcos θ/dx_i
    let prefactor = k * dtheta / sin_theta;
    let inv_rab = 1.0 / (ra * rb);
    let f_i = (b * inv_rab - a * (cos_theta / (ra * ra))) * prefactor;
    let f_k = (a * inv_rab - b * (cos_theta / (rb * rb))) * prefactor;
    let f_j = -(f_i + f_k);
    Some(AngleForces {
        energy,
        f_i,
        f_j,
        f_k,
    })
}
