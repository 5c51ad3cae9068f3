use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use toymd::engine::config::{RunParameters, RunParametersBuilder};
use tracing::debug;

/// Run parameters as read from the TOML parameter file, before CLI overrides.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialRunConfig {
    number_of_steps: Option<usize>,
    time_step: Option<f64>,
    temperature: Option<f64>,
    #[serde(rename = "tau-T")]
    tau_t: Option<f64>,
    output_frequency: Option<usize>,
    cutoff: Option<f64>,
    thermostat: Option<bool>,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run parameters from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Applies `-S` assignments and dedicated flags, then builds the final parameters.
    ///
    /// Dedicated flags win over `-S` assignments, which win over the file.
    pub fn merge_with_cli(mut self, args: &RunArgs) -> Result<RunParameters> {
        self.apply_set_values(&args.set_values)?;

        let mut builder = RunParametersBuilder::new();
        if let Some(steps) = args.steps.or(self.number_of_steps) {
            builder = builder.number_of_steps(steps);
        }
        if let Some(dt) = args.time_step.or(self.time_step) {
            builder = builder.time_step(dt);
        }
        if let Some(t) = args.temperature.or(self.temperature) {
            builder = builder.temperature(t);
        }
        if let Some(tau) = self.tau_t {
            builder = builder.tau_t(tau);
        }
        if let Some(every) = self.output_frequency {
            builder = builder.output_frequency(every);
        }
        builder = builder
            .cutoff(args.cutoff.or(self.cutoff))
            .thermostat(!args.no_thermostat && self.thermostat.unwrap_or(true));

        builder.build().map_err(|e| {
            CliError::Config(format!(
                "{e}. Provide it in the parameter file or via a CLI argument."
            ))
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let (key, value_str) = (key.trim(), value_str.trim());

            match key {
                "number-of-steps" => self.number_of_steps = Some(parse_value(key, value_str)?),
                "time-step" => self.time_step = Some(parse_value(key, value_str)?),
                "temperature" => self.temperature = Some(parse_value(key, value_str)?),
                "tau-T" => self.tau_t = Some(parse_value(key, value_str)?),
                "output-frequency" => self.output_frequency = Some(parse_value(key, value_str)?),
                "cutoff" => {
                    self.cutoff = match value_str {
                        "none" | "off" => None,
                        _ => Some(parse_value(key, value_str)?),
                    }
                }
                "thermostat" => self.thermostat = Some(parse_value(key, value_str)?),
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value_str
        ))
    })
}
