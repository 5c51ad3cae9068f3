use crate::core::forcefield::term::EnergyTerm;

/// Energies and thermostat state after one completed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub step: usize,
    /// Potential energy breakdown at the start of the step, in kJ/mol.
    pub potential: EnergyTerm,
    /// Kinetic energy of the step, in kJ/mol.
    pub kinetic: f64,
    /// Instantaneous temperature, in K.
    pub temperature: f64,
    /// Velocity scaling factor to be applied in the following step.
    pub lambda: f64,
}

impl StepReport {
    #[inline]
    pub fn total_energy(&self) -> f64 {
        self.potential.total() + self.kinetic
    }
}

#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    RunStart { total_steps: u64 },
    StepCompleted(StepReport),
    RunFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
