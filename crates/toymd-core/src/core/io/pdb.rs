use crate::core::io::traits::{Frame, FrameSink, MolecularFile};
use crate::core::models::atom::Particle;
use crate::core::models::simulation_box::{InvalidBoxError, SimulationBox};
use crate::core::models::system::ParticleSystem;
use nalgebra::Point3;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Structure files store Ångström; the engine works in nanometers.
const ANGSTROM_PER_NM: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// `TITLE`/`REMARK` lines, kept verbatim.
    pub header_lines: Vec<String>,
    /// Serials of particles read from `HETATM` records.
    pub hetero_serials: HashSet<usize>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Invalid unit cell: {0}")]
    InvalidBox(#[from] InvalidBoxError),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for {record} record (must be at least {min} chars)")]
    LineTooShort { record: &'static str, min: usize },
    #[error("Cannot infer an element from atom name '{name}'")]
    UnknownElement { name: String },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_int<T: std::str::FromStr>(
    value: &str,
    line_num: usize,
    columns: &str,
) -> Result<T, PdbError> {
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: columns.into(),
            value: value.into(),
        },
    })
}

/// Falls back to the first letter of the atom name, skipping leading digits.
fn element_from_name(name: &str) -> Option<String> {
    name.chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_string())
}

struct RawAtom {
    serial: usize,
    name: String,
    element: String,
    residue_name: String,
    chain_id: char,
    residue_number: isize,
    position: Point3<f64>,
}

/// PDB-style structure files: `CRYST1`, `ATOM`/`HETATM` and `CONECT`.
///
/// Only the first model of a multi-model file is read. Coordinates are
/// converted from Ångström to nanometers on read and back on write.
pub struct PdbFile;

impl PdbFile {
    fn parse_cryst1(line: &str, line_num: usize) -> Result<SimulationBox, PdbError> {
        if line.len() < 33 {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::LineTooShort {
                    record: "CRYST1",
                    min: 33,
                },
            });
        }
        let a = parse_float(line, line_num, 6, 15)?;
        let b = parse_float(line, line_num, 15, 24)?;
        let c = parse_float(line, line_num, 24, 33)?;
        for (start, end) in [(33, 40), (40, 47), (47, 54)] {
            let angle = slice_and_trim(line, start, end);
            if angle.parse::<f64>().is_ok_and(|v| (v - 90.0).abs() > 1e-3) {
                warn!(
                    line = line_num,
                    angle, "Non-orthogonal cell angle ignored; the box is treated as orthorhombic."
                );
            }
        }
        Ok(SimulationBox::new(
            a / ANGSTROM_PER_NM,
            b / ANGSTROM_PER_NM,
            c / ANGSTROM_PER_NM,
        )?)
    }

    fn parse_atom(line: &str, line_num: usize) -> Result<RawAtom, PdbError> {
        if line.len() < 54 {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::LineTooShort {
                    record: "ATOM/HETATM",
                    min: 54,
                },
            });
        }
        let serial = parse_int(slice_and_trim(line, 6, 11), line_num, "7-11")?;
        let name = slice_and_trim(line, 12, 16);
        if name.is_empty() {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::MissingRequiredField {
                    columns: "13-16".into(),
                },
            });
        }
        let residue_name = slice_and_trim(line, 17, 20);
        let chain_id = slice_and_trim(line, 21, 22).chars().next().unwrap_or('A');
        let residue_number = parse_int(slice_and_trim(line, 22, 26), line_num, "23-26")?;
        let x = parse_float(line, line_num, 30, 38)?;
        let y = parse_float(line, line_num, 38, 46)?;
        let z = parse_float(line, line_num, 46, 54)?;

        let element = match slice_and_trim(line, 76, 78) {
            "" => element_from_name(name).ok_or_else(|| PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::UnknownElement { name: name.into() },
            })?,
            symbol => symbol.to_string(),
        };

        Ok(RawAtom {
            serial,
            name: name.to_string(),
            element,
            residue_name: residue_name.to_string(),
            chain_id,
            residue_number,
            position: Point3::new(x, y, z) / ANGSTROM_PER_NM,
        })
    }

    fn parse_conect(line: &str, line_num: usize) -> Result<Vec<(usize, usize)>, PdbError> {
        let serials = line
            .get(6..)
            .unwrap_or("")
            .split_whitespace()
            .map(|s| parse_int::<usize>(s, line_num, "7-31"))
            .collect::<Result<Vec<_>, _>>()?;
        let Some((&origin, partners)) = serials.split_first() else {
            return Ok(Vec::new());
        };
        Ok(partners
            .iter()
            .map(|&p| (origin.min(p), origin.max(p)))
            .collect())
    }

    fn write_cryst1(simulation_box: &SimulationBox, writer: &mut impl Write) -> io::Result<()> {
        let l = simulation_box.lengths().scale(ANGSTROM_PER_NM);
        writeln!(
            writer,
            "CRYST1{:>9.3}{:>9.3}{:>9.3}{:>7.2}{:>7.2}{:>7.2} P 1           1",
            l.x, l.y, l.z, 90.0, 90.0, 90.0
        )
    }

    fn write_atoms(
        system: &ParticleSystem,
        positions: &[Point3<f64>],
        metadata: Option<&PdbMetadata>,
        writer: &mut impl Write,
    ) -> Result<(), PdbError> {
        if positions.len() != system.len() {
            return Err(PdbError::Inconsistency(format!(
                "{} positions given for {} particles",
                positions.len(),
                system.len()
            )));
        }
        for (particle, position) in system.particles().iter().zip(positions) {
            let residue = system.residue(particle.residue_index).ok_or_else(|| {
                PdbError::Inconsistency(format!(
                    "Particle {} references missing residue {}",
                    particle.serial, particle.residue_index
                ))
            })?;
            let record = match metadata {
                Some(m) if m.hetero_serials.contains(&particle.serial) => "HETATM",
                _ => "ATOM",
            };
            let p = *position * ANGSTROM_PER_NM;
            writeln!(
                writer,
                "{:<6}{:>5} {} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                record,
                particle.serial,
                format_atom_name(particle),
                residue.name,
                residue.chain_id,
                residue.number,
                p.x,
                p.y,
                p.z,
                1.0,
                0.0,
                particle.element
            )?;
        }
        Ok(())
    }

    fn write_conect(system: &ParticleSystem, writer: &mut impl Write) -> Result<(), PdbError> {
        let mut partners: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for bond in system.bonds() {
            let serial = |index: usize| {
                system.particle(index).map(|p| p.serial).ok_or_else(|| {
                    PdbError::Inconsistency(format!("Bond particle index {index} not found"))
                })
            };
            let (a, b) = (serial(bond.i)?, serial(bond.j)?);
            partners.entry(a).or_default().push(b);
            partners.entry(b).or_default().push(a);
        }
        for (serial, mut bonded) in partners {
            bonded.sort_unstable();
            for chunk in bonded.chunks(4) {
                write!(writer, "CONECT{serial:>5}")?;
                for partner in chunk {
                    write!(writer, "{partner:>5}")?;
                }
                writeln!(writer)?;
            }
        }
        Ok(())
    }

    /// Writes one trajectory frame as a `MODEL`/`ENDMDL` block.
    ///
    /// # Errors
    ///
    /// Returns [`PdbError`] if writing fails or `frame.positions` does not
    /// match the particles of `frame.system`.
    pub fn write_frame(
        frame: &Frame<'_>,
        metadata: Option<&PdbMetadata>,
        writer: &mut impl Write,
    ) -> Result<(), PdbError> {
        writeln!(writer, "MODEL {:>8}", frame.step)?;
        Self::write_cryst1(frame.system.simulation_box(), writer)?;
        Self::write_atoms(frame.system, frame.positions, metadata, writer)?;
        writeln!(writer, "ENDMDL")?;
        Ok(())
    }
}

fn format_atom_name(particle: &Particle) -> String {
    // Names shorter than four characters start in column 14 when the element
    // symbol is a single letter.
    if particle.name.len() < 4 && particle.element.len() < 2 {
        format!(" {:<3}", particle.name)
    } else {
        format!("{:<4}", particle.name)
    }
}

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(ParticleSystem, Self::Metadata), Self::Error> {
        let mut metadata = PdbMetadata::default();
        let mut simulation_box = None;
        let mut atoms: Vec<RawAtom> = Vec::new();
        let mut conect: Vec<(usize, usize)> = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "CRYST1" => simulation_box = Some(Self::parse_cryst1(&line, line_num)?),
                record @ ("ATOM" | "HETATM") => {
                    let atom = Self::parse_atom(&line, line_num)?;
                    if record == "HETATM" {
                        metadata.hetero_serials.insert(atom.serial);
                    }
                    atoms.push(atom);
                }
                "CONECT" => conect.extend(Self::parse_conect(&line, line_num)?),
                "TITLE" | "REMARK" => metadata.header_lines.push(line.clone()),
                "ENDMDL" | "END" => break,
                _ => {}
            }
        }

        let simulation_box =
            simulation_box.ok_or_else(|| PdbError::MissingRecord("CRYST1".into()))?;
        if atoms.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }

        let mut system = ParticleSystem::new(simulation_box);
        for atom in atoms {
            let residue_index =
                system.add_residue(atom.chain_id, atom.residue_number, &atom.residue_name);
            let particle = Particle::new(
                atom.serial,
                &atom.name,
                &atom.element,
                residue_index,
                atom.position,
            );
            system.add_particle(particle).ok_or_else(|| {
                PdbError::Inconsistency(format!("Duplicate atom serial: {}", atom.serial))
            })?;
        }

        conect.sort_unstable();
        conect.dedup();
        for (a_serial, b_serial) in conect {
            let lookup = |serial: usize| {
                system.find_particle_by_serial(serial).ok_or_else(|| {
                    PdbError::Inconsistency(format!("CONECT references unknown serial {serial}"))
                })
            };
            let (a, b) = (lookup(a_serial)?, lookup(b_serial)?);
            system.add_bond(a, b).ok_or_else(|| {
                PdbError::Inconsistency(format!("CONECT bonds serial {a_serial} to itself"))
            })?;
        }

        Ok((system, metadata))
    }

    fn write_to(
        system: &ParticleSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{line}")?;
        }
        Self::write_cryst1(system.simulation_box(), writer)?;
        Self::write_atoms(system, &system.positions(), Some(metadata), writer)?;
        Self::write_conect(system, writer)?;
        writeln!(writer, "END")?;
        Ok(())
    }

    fn write_system_to(
        system: &ParticleSystem,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let default_metadata = PdbMetadata {
            header_lines: vec!["REMARK   1 Generated by toymd".to_string()],
            ..Default::default()
        };
        Self::write_to(system, &default_metadata, writer)
    }
}

/// Streams trajectory frames into a multi-model PDB file.
pub struct PdbTrajectoryWriter<W: Write> {
    writer: W,
    metadata: Option<PdbMetadata>,
    frames_written: usize,
}

impl<W: Write> PdbTrajectoryWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            metadata: None,
            frames_written: 0,
        }
    }

    /// Uses `metadata` to keep `HETATM` records as read.
    pub fn with_metadata(mut self, metadata: PdbMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl PdbTrajectoryWriter<BufWriter<File>> {
    /// Creates (or truncates) the trajectory file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, PdbError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> FrameSink for PdbTrajectoryWriter<W> {
    type Error = PdbError;

    fn write_frame(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error> {
        PdbFile::write_frame(frame, self.metadata.as_ref(), &mut self.writer)?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        self.writer.flush()?;
        Ok(())
    }
}
