use crate::core::models::simulation_box::SimulationBox;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Parameters of one molecular dynamics run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub number_of_steps: usize,
    /// Integration time step in ps.
    pub time_step: f64,
    /// Target temperature of the thermostat in K.
    pub temperature: f64,
    /// Thermostat coupling time in ps.
    pub tau_t: f64,
    /// A frame is emitted every `output_frequency` steps, starting at step 0.
    pub output_frequency: usize,
    /// Lennard-Jones cutoff in nm; `None` sums over all pairs.
    pub cutoff: Option<f64>,
    /// When `false`, velocities are never rescaled (λ stays 1).
    pub thermostat: bool,
}

impl RunParameters {
    /// Checks every parameter against its physical range and against the box.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending
    /// parameter.
    pub fn validate(&self, simulation_box: &SimulationBox) -> Result<(), ConfigError> {
        let invalid = |name: &'static str, reason: String| -> Result<(), ConfigError> {
            Err(ConfigError::InvalidValue { name, reason })
        };
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return invalid(
                "time-step",
                format!("must be positive, got {}", self.time_step),
            );
        }
        if !(self.tau_t.is_finite() && self.tau_t > 0.0) {
            return invalid("tau-T", format!("must be positive, got {}", self.tau_t));
        }
        if self.time_step > self.tau_t {
            return invalid(
                "tau-T",
                format!(
                    "must not be shorter than the time step ({} ps), got {}",
                    self.time_step, self.tau_t
                ),
            );
        }
        if !(self.temperature.is_finite() && self.temperature >= 0.0) {
            return invalid(
                "temperature",
                format!("must be non-negative, got {}", self.temperature),
            );
        }
        if self.output_frequency == 0 {
            return invalid("output-frequency", "must be at least 1".to_string());
        }
        if let Some(cutoff) = self.cutoff {
            let limit = simulation_box.min_length() / 2.0;
            if !(cutoff.is_finite() && cutoff > 0.0 && cutoff < limit) {
                return invalid(
                    "cutoff",
                    format!(
                        "must be positive and below half the shortest box edge ({limit:.4} nm), got {cutoff}"
                    ),
                );
            }
        }
        Ok(())
    }

    /// Whether a frame is emitted after `step`.
    #[inline]
    pub fn is_output_step(&self, step: usize) -> bool {
        step % self.output_frequency == 0
    }
}

#[derive(Default)]
pub struct RunParametersBuilder {
    number_of_steps: Option<usize>,
    time_step: Option<f64>,
    temperature: Option<f64>,
    tau_t: Option<f64>,
    output_frequency: Option<usize>,
    cutoff: Option<f64>,
    thermostat: Option<bool>,
}

impl RunParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number_of_steps(mut self, steps: usize) -> Self {
        self.number_of_steps = Some(steps);
        self
    }
    pub fn time_step(mut self, dt: f64) -> Self {
        self.time_step = Some(dt);
        self
    }
    pub fn temperature(mut self, kelvin: f64) -> Self {
        self.temperature = Some(kelvin);
        self
    }
    pub fn tau_t(mut self, tau: f64) -> Self {
        self.tau_t = Some(tau);
        self
    }
    pub fn output_frequency(mut self, every: usize) -> Self {
        self.output_frequency = Some(every);
        self
    }
    pub fn cutoff(mut self, cutoff: Option<f64>) -> Self {
        self.cutoff = cutoff;
        self
    }
    pub fn thermostat(mut self, enabled: bool) -> Self {
        self.thermostat = Some(enabled);
        self
    }

    pub fn build(self) -> Result<RunParameters, ConfigError> {
        Ok(RunParameters {
            number_of_steps: self
                .number_of_steps
                .ok_or(ConfigError::MissingParameter("number-of-steps"))?,
            time_step: self
                .time_step
                .ok_or(ConfigError::MissingParameter("time-step"))?,
            temperature: self
                .temperature
                .ok_or(ConfigError::MissingParameter("temperature"))?,
            tau_t: self.tau_t.ok_or(ConfigError::MissingParameter("tau-T"))?,
            output_frequency: self
                .output_frequency
                .ok_or(ConfigError::MissingParameter("output-frequency"))?,
            cutoff: self.cutoff,
            thermostat: self.thermostat.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> RunParametersBuilder {
        RunParametersBuilder::new()
            .number_of_steps(100)
            .time_step(0.001)
            .temperature(300.0)
            .tau_t(0.1)
            .output_frequency(10)
    }

    fn cubic(l: f64) -> SimulationBox {
        SimulationBox::new(l, l, l).unwrap()
    }

    #[test]
    fn build_succeeds_with_all_required_parameters() {
        let params = complete_builder().build().unwrap();
        assert_eq!(params.number_of_steps, 100);
        assert_eq!(params.cutoff, None);
        assert!(params.thermostat);
        assert!(params.validate(&cubic(3.0)).is_ok());
    }

    #[test]
    fn build_fails_without_time_step() {
        let result = RunParametersBuilder::new()
            .number_of_steps(1)
            .temperature(300.0)
            .tau_t(0.1)
            .output_frequency(1)
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("time-step")));
    }

    #[test]
    fn validate_rejects_non_positive_time_step() {
        let params = complete_builder().time_step(0.0).build().unwrap();
        assert!(matches!(
            params.validate(&cubic(3.0)),
            Err(ConfigError::InvalidValue {
                name: "time-step",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_non_positive_tau() {
        let params = complete_builder().tau_t(-1.0).build().unwrap();
        assert!(matches!(
            params.validate(&cubic(3.0)),
            Err(ConfigError::InvalidValue { name: "tau-T", .. })
        ));
    }

    #[test]
    fn validate_rejects_coupling_time_shorter_than_time_step() {
        let params = complete_builder().time_step(0.01).tau_t(0.005).build().unwrap();
        assert!(matches!(
            params.validate(&cubic(3.0)),
            Err(ConfigError::InvalidValue { name: "tau-T", .. })
        ));
        let params = complete_builder().time_step(0.01).tau_t(0.01).build().unwrap();
        assert!(params.validate(&cubic(3.0)).is_ok());
    }

    #[test]
    fn validate_rejects_negative_temperature() {
        let params = complete_builder().temperature(-5.0).build().unwrap();
        assert!(params.validate(&cubic(3.0)).is_err());
    }

    #[test]
    fn validate_rejects_zero_output_frequency() {
        let params = complete_builder().output_frequency(0).build().unwrap();
        assert!(matches!(
            params.validate(&cubic(3.0)),
            Err(ConfigError::InvalidValue {
                name: "output-frequency",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_cutoff_beyond_half_box() {
        let params = complete_builder().cutoff(Some(1.5)).build().unwrap();
        assert!(params.validate(&cubic(3.0)).is_err());
        let params = complete_builder().cutoff(Some(1.4)).build().unwrap();
        assert!(params.validate(&cubic(3.0)).is_ok());
    }

    #[test]
    fn output_steps_start_at_zero() {
        let params = complete_builder().output_frequency(5).build().unwrap();
        let steps: Vec<_> = (0..12).filter(|&s| params.is_output_step(s)).collect();
        assert_eq!(steps, vec![0, 5, 10]);
    }
}
