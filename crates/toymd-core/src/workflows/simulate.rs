use crate::core::forcefield::evaluator::ForceEvaluator;
use crate::core::forcefield::parameterization::{Parameterizer, ResolvedForcefield};
use crate::core::forcefield::params::Forcefield;
use crate::core::io::traits::{Frame, FrameSink, StepSink};
use crate::core::models::system::ParticleSystem;
use crate::core::topology::Topology;
use crate::engine::config::RunParameters;
use crate::engine::error::EngineError;
use crate::engine::integrator::integrate;
use crate::engine::progress::{Progress, ProgressReporter, StepReport};
use crate::engine::state::MdState;
use crate::engine::thermostat::{compute_lambda, temperature};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// Positions, velocities and λ after the last step.
    pub final_state: MdState,
    /// Report of the final step, `None` when no step was run.
    pub last_report: Option<StepReport>,
    pub frames_written: usize,
}

impl SimulationOutcome {
    /// The system as it stands after the run, with the original connectivity.
    pub fn final_system(&self, initial: &ParticleSystem) -> ParticleSystem {
        let mut system = initial.clone();
        system.set_positions(&self.final_state.positions);
        system
    }
}

/// Runs a molecular dynamics simulation of `system`.
///
/// Every step evaluates forces at the current positions, advances the
/// integrator with the scaling factor computed in the previous step, derives
/// the temperature and the next scaling factor, re-images whole residues into
/// the box and finally reports the step. Each step's report is handed to
/// `steps` as soon as the step completes; on output steps the wrapped
/// coordinates are also handed to `frames`.
///
/// # Errors
///
/// Any failure aborts the run: invalid parameters, inconsistent topology,
/// unresolvable force field entries, degenerate or non-finite forces, and
/// sink failures. No step is ever skipped.
#[instrument(skip_all, name = "simulation_workflow")]
pub fn run<F: FrameSink, S: StepSink>(
    system: &ParticleSystem,
    forcefield: &Forcefield,
    params: &RunParameters,
    frames: &mut F,
    steps: &mut S,
    reporter: &ProgressReporter,
) -> Result<SimulationOutcome, EngineError> {
    // === Phase 1: Validation and parameterization ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let simulation_box = system.simulation_box();
    params.validate(simulation_box)?;

    let topology = Topology::build(system.len(), system.bonds())?;
    let resolved = Parameterizer::new(forcefield).parameterize(&system.elements(), &topology)?;
    check_consistency(system, &resolved)?;

    let evaluator = ForceEvaluator::new(&topology, &resolved).with_cutoff(params.cutoff);
    info!(
        particles = system.len(),
        residues = system.residues().len(),
        bonds = topology.bonds.len(),
        angles = topology.angles.len(),
        excluded_pairs = topology.exclusions.pair_count(),
        cutoff = ?params.cutoff,
        "System prepared."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Dynamics ===
    reporter.report(Progress::PhaseStart { name: "Dynamics" });
    reporter.report(Progress::RunStart {
        total_steps: params.number_of_steps as u64,
    });

    let mut state = MdState::cold_start(system.positions());
    let mut last_report = None;
    let mut frames_written = 0;

    for step in 0..params.number_of_steps {
        let forces = evaluator
            .evaluate(simulation_box, &state.positions)
            .map_err(|source| EngineError::Force { step, source })?;

        let lambda = state.lambda;
        let kinetic = integrate(
            &mut state,
            &forces.forces,
            &resolved.masses,
            params.time_step,
            lambda,
        );
        if !kinetic.is_finite() {
            return Err(EngineError::NonFiniteKinetic { step });
        }

        let current_temperature = temperature(kinetic, state.len());
        state.lambda = if params.thermostat {
            compute_lambda(
                current_temperature,
                params.temperature,
                params.time_step,
                params.tau_t,
            )
        } else {
            1.0
        };

        simulation_box.wrap_residues(system.residues(), &mut state.positions);
        state.step = step + 1;

        let report = StepReport {
            step,
            potential: forces.energy,
            kinetic,
            temperature: current_temperature,
            lambda: state.lambda,
        };

        if params.is_output_step(step) {
            info!(
                "Step: {:5} Epot {:10.3} Ekin {:10.3} Etot {:10.3} T {:7.2} lambda {:.2}",
                step,
                report.potential.total(),
                report.kinetic,
                report.total_energy(),
                report.temperature,
                report.lambda
            );
            let frame = Frame {
                step,
                system,
                positions: &state.positions,
            };
            frames
                .write_frame(&frame)
                .map_err(|e| EngineError::Output {
                    step,
                    source: Box::new(e),
                })?;
            frames_written += 1;
        } else {
            debug!(
                step,
                e_pot = report.potential.total(),
                e_kin = report.kinetic,
                temperature = report.temperature,
                lambda = report.lambda,
                "Step completed."
            );
        }

        steps.record_step(&report).map_err(|e| EngineError::Output {
            step,
            source: Box::new(e),
        })?;
        reporter.report(Progress::StepCompleted(report));
        last_report = Some(report);
    }

    let finished_at = params.number_of_steps;
    frames.finish().map_err(|e| EngineError::Output {
        step: finished_at,
        source: Box::new(e),
    })?;
    steps.finish().map_err(|e| EngineError::Output {
        step: finished_at,
        source: Box::new(e),
    })?;
    reporter.report(Progress::RunFinish);
    reporter.report(Progress::PhaseFinish);

    if let Some(last) = &last_report {
        info!(
            steps = state.step,
            frames = frames_written,
            e_tot = last.total_energy(),
            temperature = last.temperature,
            "Simulation complete."
        );
    }

    Ok(SimulationOutcome {
        final_state: state,
        last_report,
        frames_written,
    })
}

fn check_consistency(
    system: &ParticleSystem,
    resolved: &ResolvedForcefield,
) -> Result<(), EngineError> {
    if resolved.n_particles() != system.len() {
        return Err(EngineError::Inconsistency(format!(
            "{} particles but {} resolved parameter sets",
            system.len(),
            resolved.n_particles()
        )));
    }
    let owned: usize = system.residues().iter().map(|r| r.atoms().len()).sum();
    if owned != system.len() {
        return Err(EngineError::Inconsistency(format!(
            "residues own {owned} particles, the system has {}",
            system.len()
        )));
    }
    Ok(())
}
