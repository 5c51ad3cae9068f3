use super::state::MdState;
use nalgebra::Vector3;

/// Kinetic energy `Σ ½ m v²` of a velocity set, in kJ/mol.
pub fn kinetic_energy(velocities: &[Vector3<f64>], masses: &[f64]) -> f64 {
    velocities
        .iter()
        .zip(masses)
        .map(|(v, &m)| 0.5 * m * v.norm_squared())
        .sum()
}

/// Advances `state` by one leapfrog step with velocity scaling.
///
/// Velocities are updated as `v ← λ(v + F/m·dt)` and positions as
/// `x ← x + v·dt` with the new velocities. Positions are not wrapped.
///
/// Returns the kinetic energy of the step: the average of the half-step
/// kinetic energies before and after the update.
///
/// # Panics
///
/// Panics if `forces` or `masses` do not hold one entry per particle.
pub fn integrate(
    state: &mut MdState,
    forces: &[Vector3<f64>],
    masses: &[f64],
    time_step: f64,
    lambda: f64,
) -> f64 {
    assert_eq!(forces.len(), state.len());
    assert_eq!(masses.len(), state.len());

    let kinetic_before = kinetic_energy(&state.velocities, masses);
    for (((x, v), f), &m) in state
        .positions
        .iter_mut()
        .zip(state.velocities.iter_mut())
        .zip(forces)
        .zip(masses)
    {
        *v = (*v + *f * (time_step / m)) * lambda;
        *x += *v * time_step;
    }
    let kinetic_after = kinetic_energy(&state.velocities, masses);

    0.5 * (kinetic_before + kinetic_after)
}
