use crate::core::models::system::ParticleSystem;
use crate::engine::progress::StepReport;
use nalgebra::Point3;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing structure file formats.
///
/// Implementors handle format-specific parsing and serialization; the
/// provided path helpers wrap files in buffered readers and writers.
pub trait MolecularFile {
    /// Format-specific data that is not part of the particle system.
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a particle system from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead)
    -> Result<(ParticleSystem, Self::Metadata), Self::Error>;

    /// Writes a particle system and metadata to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        system: &ParticleSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a particle system to a writer with default metadata.
    fn write_system_to(
        system: &ParticleSystem,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(ParticleSystem, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(
        system: &ParticleSystem,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(system, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_system_to_path<P: AsRef<Path>>(
        system: &ParticleSystem,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_system_to(system, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// One snapshot of a running simulation.
///
/// The structural data comes from `system`; `positions` holds the current
/// coordinates, indexed like the particles of `system`.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub step: usize,
    pub system: &'a ParticleSystem,
    pub positions: &'a [Point3<f64>],
}

/// Destination for trajectory frames emitted during a run.
pub trait FrameSink {
    type Error: Error + Send + Sync + 'static;

    /// Records one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be written.
    fn write_frame(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;

    /// Flushes any buffered output. Called once after the last step.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Destination for the per-step energy reports of a run.
///
/// Reports arrive in step order, one per completed step, while the run is
/// still going.
pub trait StepSink {
    type Error: Error + Send + Sync + 'static;

    fn record_step(&mut self, report: &StepReport) -> Result<(), Self::Error>;

    /// Flushes any buffered output. Called once after the last step.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A sink that discards every frame and step report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    type Error = std::convert::Infallible;

    fn write_frame(&mut self, _frame: &Frame<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl StepSink for NullSink {
    type Error = std::convert::Infallible;

    fn record_step(&mut self, _report: &StepReport) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl StepSink for Vec<StepReport> {
    type Error = std::convert::Infallible;

    fn record_step(&mut self, report: &StepReport) -> Result<(), Self::Error> {
        self.push(*report);
        Ok(())
    }
}

/// An absent sink records nothing.
impl<S: StepSink> StepSink for Option<S> {
    type Error = S::Error;

    fn record_step(&mut self, report: &StepReport) -> Result<(), Self::Error> {
        match self {
            Some(sink) => sink.record_step(report),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        match self {
            Some(sink) => sink.finish(),
            None => Ok(()),
        }
    }
}

/// A sink that keeps every frame's step and coordinates in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub frames: Vec<(usize, Vec<Point3<f64>>)>,
}

impl FrameSink for MemorySink {
    type Error = std::convert::Infallible;

    fn write_frame(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error> {
        self.frames.push((frame.step, frame.positions.to_vec()));
        Ok(())
    }
}
