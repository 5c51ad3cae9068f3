/// Boltzmann constant in kJ/(mol·K).
pub const BOLTZMANN: f64 = 0.0083144626;

/// Instantaneous temperature from the kinetic energy.
///
/// Uses `3N` degrees of freedom; no constraints or center-of-mass motion are
/// removed. An empty system has temperature zero.
pub fn temperature(kinetic_energy: f64, n_particles: usize) -> f64 {
    if n_particles == 0 {
        return 0.0;
    }
    let degrees_of_freedom = 3.0 * n_particles as f64;
    2.0 * kinetic_energy / (degrees_of_freedom * BOLTZMANN)
}

/// Berendsen velocity scaling factor.
///
/// `λ = sqrt(1 + (dt/τ)(T0/T - 1))`. A system at rest (`T == 0`) is not
/// scaled; scaling cannot add energy to zero velocities.
///
/// The radicand is non-negative whenever `dt <= τ` and `T0 >= 0`, which
/// [`RunParameters::validate`](crate::engine::config::RunParameters::validate)
/// enforces. Outside that range it is floored at zero, stopping all motion.
pub fn compute_lambda(current: f64, target: f64, time_step: f64, tau_t: f64) -> f64 {
    if current <= 0.0 {
        return 1.0;
    }
    let radicand = 1.0 + (time_step / tau_t) * (target / current - 1.0);
    radicand.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_of_empty_system_is_zero() {
        assert_eq!(temperature(10.0, 0), 0.0);
    }

    #[test]
    fn temperature_follows_equipartition() {
        // K = 3/2 N k_B T
        let n = 10;
        let t = 300.0;
        let kinetic = 1.5 * n as f64 * BOLTZMANN * t;
        assert!((temperature(kinetic, n) - t).abs() < 1e-9);
    }

    #[test]
    fn lambda_is_one_at_target_temperature() {
        assert!((compute_lambda(300.0, 300.0, 0.002, 0.1) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn lambda_is_one_for_system_at_rest() {
        assert_eq!(compute_lambda(0.0, 300.0, 0.002, 0.1), 1.0);
    }

    #[test]
    fn lambda_heats_cold_and_cools_hot_systems() {
        assert!(compute_lambda(250.0, 300.0, 0.002, 0.1) > 1.0);
        assert!(compute_lambda(350.0, 300.0, 0.002, 0.1) < 1.0);
    }

    #[test]
    fn large_corrections_are_applied_in_full() {
        let expected = (1.0_f64 + (0.002 / 0.1) * (300.0 / 1.0 - 1.0)).sqrt();
        let lambda = compute_lambda(1.0, 300.0, 0.002, 0.1);
        assert!((lambda - expected).abs() < 1e-12);
        assert!(lambda > 2.6);
    }

    #[test]
    fn coupling_time_equal_to_time_step_rescales_to_target_in_one_step() {
        // dt == τ gives λ² = T0/T.
        let lambda = compute_lambda(1200.0, 300.0, 0.1, 0.1);
        assert!((lambda - 0.5).abs() < 1e-12);
        assert_eq!(compute_lambda(500.0, 0.0, 0.1, 0.1), 0.0);
    }

    #[test]
    fn negative_radicand_stops_motion() {
        assert_eq!(compute_lambda(1000.0, 0.0, 2.0, 0.1), 0.0);
    }

    #[test]
    fn repeated_scaling_converges_to_target() {
        // Ideal gas: kinetic energy scales with λ² each step.
        let target = 300.0;
        let mut t = 150.0;
        for _ in 0..2000 {
            let lambda = compute_lambda(t, target, 0.002, 0.1);
            t *= lambda * lambda;
        }
        assert!((t - target).abs() < 1e-6 * target);

        let mut t = 600.0;
        for _ in 0..2000 {
            let lambda = compute_lambda(t, target, 0.002, 0.1);
            t *= lambda * lambda;
        }
        assert!((t - target).abs() < 1e-6 * target);
    }
}
