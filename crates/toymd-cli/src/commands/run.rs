use crate::cli::RunArgs;
use crate::config::PartialRunConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::fs::File;
use std::path::Path;
use toymd::{
    core::{
        forcefield::params::Forcefield,
        io::{
            energy_log::EnergyLogWriter,
            pdb::{PdbFile, PdbMetadata, PdbTrajectoryWriter},
            traits::MolecularFile,
        },
        models::system::ParticleSystem,
    },
    engine::progress::ProgressReporter,
    workflows,
};
use tracing::info;

pub fn run(args: RunArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialRunConfig::from_file(&args.parameters)?;
    info!("Merging run parameters from file and CLI arguments...");
    let params = partial_config.merge_with_cli(&args)?;

    info!("Loading force field from {:?}", &args.forcefield);
    let forcefield = Forcefield::load(&args.forcefield).map_err(|e| CliError::FileParsing {
        path: args.forcefield.clone(),
        source: e.into(),
    })?;

    info!("Loading input structure from {:?}", &args.coordinates);
    let (system, metadata) =
        PdbFile::read_from_path(&args.coordinates).map_err(|e| CliError::FileParsing {
            path: args.coordinates.clone(),
            source: e.into(),
        })?;

    let mut trajectory = PdbTrajectoryWriter::create(&args.trajectory)
        .map_err(|e| CliError::FileWriting {
            path: args.trajectory.clone(),
            source: e.into(),
        })?
        .with_metadata(metadata.clone());
    let mut energy_log = open_energy_log(args.energy_log.as_deref())?;

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Starting dynamics: {} particles, {} steps of {} ps...",
        system.len(),
        params.number_of_steps,
        params.time_step
    );
    info!("Invoking the core simulation workflow...");

    let outcome = workflows::simulate::run(
        &system,
        &forcefield,
        &params,
        &mut trajectory,
        &mut energy_log,
        &reporter,
    )?;
    drop(reporter);

    println!(
        "✓ {} frame(s) written to: {}",
        outcome.frames_written,
        args.trajectory.display()
    );

    if let Some(path) = &args.energy_log {
        println!("✓ Energies written to: {}", path.display());
    }

    if let Some(path) = &args.outcoords {
        let final_system = outcome.final_system(&system);
        write_final_coordinates(path, &final_system, &metadata)?;
        println!("✓ Final coordinates written to: {}", path.display());
    }

    if let Some(last) = &outcome.last_report {
        println!(
            "Final step {}: Etot {:.3} kJ/mol, T {:.2} K",
            last.step,
            last.total_energy(),
            last.temperature
        );
    }

    Ok(())
}

/// Opens the per-step energy log, if one was requested, before the run starts.
fn open_energy_log(path: Option<&Path>) -> Result<Option<EnergyLogWriter<File>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    info!("Streaming step energies to {:?}", path);
    EnergyLogWriter::create(path)
        .map(Some)
        .map_err(|e| CliError::FileWriting {
            path: path.to_path_buf(),
            source: e.into(),
        })
}

fn write_final_coordinates(
    path: &Path,
    system: &ParticleSystem,
    metadata: &PdbMetadata,
) -> Result<()> {
    info!("Writing final coordinates to {:?}", path);
    PdbFile::write_to_path(system, metadata, path).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const DIATOMIC_PDB: &str = "\
CRYST1   30.000   30.000   30.000  90.00  90.00  90.00 P 1           1
ATOM      1  C1  MOL A   1      10.000  10.000  10.000  1.00  0.00           C
ATOM      2  C2  MOL A   1      11.600  10.000  10.000  1.00  0.00           C
CONECT    1    2
END
";

    const FORCEFIELD: &str = r#"
[mass]
C = 12.011

[vdw.C]
sigma = 0.34
epsilon = 0.36

[bonds.C-C]
length = 0.15
k = 250000.0
"#;

    const PARAMETERS: &str = r#"
number-of-steps = 10
time-step = 0.0005
temperature = 300.0
tau-T = 0.1
output-frequency = 5
"#;

    #[test]
    fn run_writes_trajectory_energy_log_and_final_coordinates() {
        let dir = tempdir().unwrap();
        let coords = dir.path().join("in.pdb");
        let params = dir.path().join("md.toml");
        let ff = dir.path().join("ff.toml");
        fs::write(&coords, DIATOMIC_PDB).unwrap();
        fs::write(&params, PARAMETERS).unwrap();
        fs::write(&ff, FORCEFIELD).unwrap();
        let traj = dir.path().join("traj.pdb");
        let energies = dir.path().join("energies.csv");
        let out = dir.path().join("out.pdb");

        let cli = Cli::parse_from([
            "toymd",
            "run",
            "-c",
            coords.to_str().unwrap(),
            "-p",
            params.to_str().unwrap(),
            "-f",
            ff.to_str().unwrap(),
            "-o",
            traj.to_str().unwrap(),
            "-e",
            energies.to_str().unwrap(),
            "-w",
            out.to_str().unwrap(),
        ]);
        let Commands::Run(args) = cli.command;
        run(args, false).unwrap();

        let trajectory = fs::read_to_string(&traj).unwrap();
        assert_eq!(trajectory.matches("ENDMDL").count(), 2);

        let log = fs::read_to_string(&energies).unwrap();
        assert_eq!(log.lines().count(), 11);

        let (final_system, _) = PdbFile::read_from_path(&out).unwrap();
        assert_eq!(final_system.len(), 2);
        assert_eq!(final_system.bonds().len(), 1);
    }

    #[test]
    fn unwritable_energy_log_fails_before_the_run() {
        let dir = tempdir().unwrap();
        let coords = dir.path().join("in.pdb");
        let params = dir.path().join("md.toml");
        let ff = dir.path().join("ff.toml");
        fs::write(&coords, DIATOMIC_PDB).unwrap();
        fs::write(&params, PARAMETERS).unwrap();
        fs::write(&ff, FORCEFIELD).unwrap();
        let energies = dir.path().join("no-such-dir").join("energies.csv");
        let out = dir.path().join("out.pdb");

        let cli = Cli::parse_from([
            "toymd",
            "run",
            "-c",
            coords.to_str().unwrap(),
            "-p",
            params.to_str().unwrap(),
            "-f",
            ff.to_str().unwrap(),
            "-o",
            dir.path().join("traj.pdb").to_str().unwrap(),
            "-e",
            energies.to_str().unwrap(),
            "-w",
            out.to_str().unwrap(),
        ]);
        let Commands::Run(args) = cli.command;
        match run(args, false) {
            Err(CliError::FileWriting { path, .. }) => assert_eq!(path, energies),
            other => panic!("Expected a file writing error, got {other:?}"),
        }
        assert!(!out.exists(), "no step ran");
    }

    #[test]
    fn missing_coordinates_file_is_reported_with_its_path() {
        let dir = tempdir().unwrap();
        let params = dir.path().join("md.toml");
        let ff = dir.path().join("ff.toml");
        fs::write(&params, PARAMETERS).unwrap();
        fs::write(&ff, FORCEFIELD).unwrap();
        let missing = dir.path().join("missing.pdb");

        let cli = Cli::parse_from([
            "toymd",
            "run",
            "-c",
            missing.to_str().unwrap(),
            "-p",
            params.to_str().unwrap(),
            "-f",
            ff.to_str().unwrap(),
            "-o",
            dir.path().join("traj.pdb").to_str().unwrap(),
        ]);
        let Commands::Run(args) = cli.command;
        match run(args, false) {
            Err(CliError::FileParsing { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected a file parsing error, got {other:?}"),
        }
    }
}
