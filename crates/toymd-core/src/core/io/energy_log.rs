use super::traits::StepSink;
use crate::engine::progress::StepReport;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnergyLogError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Serialize)]
struct EnergyLogRecord {
    step: usize,
    bond: f64,
    angle: f64,
    vdw: f64,
    potential: f64,
    kinetic: f64,
    total: f64,
    temperature: f64,
    lambda: f64,
}

impl From<&StepReport> for EnergyLogRecord {
    fn from(report: &StepReport) -> Self {
        Self {
            step: report.step,
            bond: report.potential.bond,
            angle: report.potential.angle,
            vdw: report.potential.vdw,
            potential: report.potential.total(),
            kinetic: report.kinetic,
            total: report.total_energy(),
            temperature: report.temperature,
            lambda: report.lambda,
        }
    }
}

/// Writes one CSV row of energies per step.
///
/// As a [`StepSink`] it receives the rows while the run is in progress.
///
/// Columns: `step,bond,angle,vdw,potential,kinetic,total,temperature,lambda`.
pub struct EnergyLogWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> EnergyLogWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn record(&mut self, report: &StepReport) -> Result<(), EnergyLogError> {
        self.writer.serialize(EnergyLogRecord::from(report))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), EnergyLogError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, EnergyLogError> {
        self.writer
            .into_inner()
            .map_err(|e| EnergyLogError::Io(e.into_error()))
    }
}

impl<W: Write> StepSink for EnergyLogWriter<W> {
    type Error = EnergyLogError;

    fn record_step(&mut self, report: &StepReport) -> Result<(), Self::Error> {
        self.record(report)
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        self.flush()
    }
}

impl EnergyLogWriter<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, EnergyLogError> {
        Ok(Self::new(File::create(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::term::EnergyTerm;
    use std::fs;
    use tempfile::tempdir;

    fn report(step: usize) -> StepReport {
        StepReport {
            step,
            potential: EnergyTerm::new(1.0, 2.0, -0.5),
            kinetic: 4.0,
            temperature: 301.5,
            lambda: 0.99,
        }
    }

    #[test]
    fn writes_header_and_one_row_per_step() {
        let mut log = EnergyLogWriter::new(Vec::new());
        log.record(&report(0)).unwrap();
        log.record(&report(1)).unwrap();
        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "step,bond,angle,vdw,potential,kinetic,total,temperature,lambda"
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "1,1.0,2.0,-0.5,2.5,4.0,6.5,301.5,0.99");
    }

    #[test]
    fn create_writes_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("energies.csv");
        let mut log = EnergyLogWriter::create(&path).unwrap();
        log.record(&report(5)).unwrap();
        log.flush().unwrap();
        drop(log);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.lines().nth(1).unwrap().starts_with("5,"));
    }
}
