use nalgebra::{Point3, Vector3};

/// Mutable dynamical state threaded through the step loop.
///
/// Velocities are leapfrog half-step velocities: before step `n` they hold
/// `v(n - ½)`, after it `v(n + ½)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MdState {
    pub positions: Vec<Point3<f64>>,
    pub velocities: Vec<Vector3<f64>>,
    /// Velocity scaling factor computed by the thermostat in the previous step.
    pub lambda: f64,
    /// Number of completed steps.
    pub step: usize,
}

impl MdState {
    /// Starts from rest at `positions` with λ = 1.
    pub fn cold_start(positions: Vec<Point3<f64>>) -> Self {
        let velocities = vec![Vector3::zeros(); positions.len()];
        Self {
            positions,
            velocities,
            lambda: 1.0,
            step: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_start_has_zero_velocities_and_unit_lambda() {
        let state = MdState::cold_start(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        assert_eq!(state.len(), 2);
        assert!(state.velocities.iter().all(|v| *v == Vector3::zeros()));
        assert_eq!(state.lambda, 1.0);
        assert_eq!(state.step, 0);
    }
}
