//! # Engine Module
//!
//! The time-stepping machinery of a molecular dynamics run.
//!
//! ## Overview
//!
//! Each step evaluates forces, advances the leapfrog integrator with the
//! velocity scaling factor of the previous step, measures the temperature and
//! asks the thermostat for the next scaling factor. The components here are
//! plain functions over caller-owned buffers; the step driver in
//! [`crate::workflows::simulate`] sequences them.
//!
//! - **Configuration** ([`config`]) - Run parameters, their builder and validation
//! - **State** ([`state`]) - Positions, half-step velocities and the carried λ
//! - **Integration** ([`integrator`]) - Leapfrog update and kinetic energy
//! - **Thermostat** ([`thermostat`]) - Temperature and Berendsen scaling factor
//! - **Progress Monitoring** ([`progress`]) - Per-step reports and progress events
//! - **Error Handling** ([`error`]) - Errors that abort a run

pub mod config;
pub mod error;
pub mod integrator;
pub mod progress;
pub mod state;
pub mod thermostat;
