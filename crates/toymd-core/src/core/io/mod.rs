//! Provides input/output functionality for structure, trajectory and energy files.
//!
//! Structure files are read and written through the [`traits::MolecularFile`]
//! trait; trajectory frames are streamed through [`traits::FrameSink`] so the
//! step loop never depends on a concrete file format.

pub mod energy_log;
pub mod pdb;
pub mod traits;
