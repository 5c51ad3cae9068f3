use nalgebra::{Point3, Vector3};
use std::io::Cursor;
use std::str::FromStr;
use toymd::core::forcefield::params::Forcefield;
use toymd::core::io::pdb::{PdbFile, PdbTrajectoryWriter};
use toymd::core::io::traits::{MemorySink, MolecularFile, NullSink};
use toymd::core::models::system::ParticleSystem;
use toymd::engine::config::{RunParameters, RunParametersBuilder};
use toymd::engine::progress::{ProgressReporter, StepReport};
use toymd::workflows::simulate;

// Two waters at their reference geometry in a 2 nm box; the first straddles the x boundary.
const TWO_WATERS_PDB: &str = "\
REMARK    two waters across a periodic boundary
CRYST1   20.000   20.000   20.000  90.00  90.00  90.00 P 1           1
ATOM      1  OW  SOL A   1      19.900   5.000   5.000  1.00  0.00           O
ATOM      2  HW1 SOL A   1      20.857   5.000   5.000  1.00  0.00           H
ATOM      3  HW2 SOL A   1      19.660   5.927   5.000  1.00  0.00           H
ATOM      4  OW  SOL A   2       3.000   5.000   5.000  1.00  0.00           O
ATOM      5  HW1 SOL A   2       3.957   5.000   5.000  1.00  0.00           H
ATOM      6  HW2 SOL A   2       2.760   5.927   5.000  1.00  0.00           H
CONECT    1    2    3
CONECT    4    5    6
END
";

const WATER_FORCEFIELD: &str = r#"
[mass]
O = 15.999
H = 1.008

[vdw.O]
sigma = 0.3166
epsilon = 0.65

[vdw.H]
sigma = 0.0
epsilon = 0.0

[bonds.O-H]
length = 0.09572
k = 502416.0

[angles.H-O-H]
angle = 104.52
k = 628.02
"#;

fn load_system() -> ParticleSystem {
    let (system, _) = PdbFile::read_from(&mut Cursor::new(TWO_WATERS_PDB)).unwrap();
    system
}

fn params(steps: usize, thermostat: bool, cutoff: Option<f64>) -> RunParameters {
    RunParametersBuilder::new()
        .number_of_steps(steps)
        .time_step(0.0005)
        .temperature(300.0)
        .tau_t(0.01)
        .output_frequency(50)
        .cutoff(cutoff)
        .thermostat(thermostat)
        .build()
        .unwrap()
}

fn residue_centroid(
    system: &ParticleSystem,
    residue: usize,
    positions: &[Point3<f64>],
) -> Point3<f64> {
    let atoms = system.residue(residue).unwrap().atoms();
    let sum: Vector3<f64> = atoms.iter().map(|&i| positions[i].coords).sum();
    Point3::from(sum / atoms.len() as f64)
}

#[test]
fn input_structure_yields_two_residues_with_connectivity() {
    let system = load_system();
    assert_eq!(system.len(), 6);
    assert_eq!(system.residues().len(), 2);
    assert_eq!(system.bonds().len(), 4);
    assert!((system.simulation_box().min_length() - 2.0).abs() < 1e-12);
}

#[test]
fn total_energy_is_conserved_without_thermostat() {
    let system = load_system();
    let forcefield = Forcefield::from_str(WATER_FORCEFIELD).unwrap();
    let mut reports: Vec<StepReport> = Vec::new();
    simulate::run(
        &system,
        &forcefield,
        &params(300, false, None),
        &mut NullSink,
        &mut reports,
        &ProgressReporter::new(),
    )
    .unwrap();

    let first = reports.first().unwrap().total_energy();
    let max_deviation = reports
        .iter()
        .map(|r| (r.total_energy() - first).abs())
        .fold(0.0, f64::max);
    assert!(
        max_deviation < 0.05,
        "total energy drifted by {max_deviation} kJ/mol from {first}"
    );
    assert!(reports.iter().all(|r| r.lambda == 1.0));
}

#[test]
fn thermostatted_run_keeps_molecules_whole_and_in_the_box() {
    let system = load_system();
    let forcefield = Forcefield::from_str(WATER_FORCEFIELD).unwrap();
    let mut sink = MemorySink::default();
    let mut reports: Vec<StepReport> = Vec::new();
    simulate::run(
        &system,
        &forcefield,
        &params(200, true, Some(0.6)),
        &mut sink,
        &mut reports,
        &ProgressReporter::new(),
    )
    .unwrap();

    assert_eq!(reports.len(), 200);
    assert!(reports
        .iter()
        .all(|r| r.temperature.is_finite() && r.lambda.is_finite() && r.lambda >= 0.0));
    // Rescaling starts from rest, so the first factors exceed 1.
    assert!(reports[1].lambda > 1.0);

    let frame_steps: Vec<_> = sink.frames.iter().map(|(step, _)| *step).collect();
    assert_eq!(frame_steps, vec![0, 50, 100, 150]);

    for (_, positions) in &sink.frames {
        for residue in 0..system.residues().len() {
            let centroid = residue_centroid(&system, residue, positions);
            assert!(
                centroid.iter().all(|&c| (0.0..2.0).contains(&c)),
                "residue {residue} centroid {centroid:?} outside the box"
            );
        }
        for (oxygen, hydrogen) in [(0, 1), (0, 2), (3, 4), (3, 5)] {
            let d = (positions[hydrogen] - positions[oxygen]).norm();
            assert!((0.08..0.11).contains(&d), "O-H distance {d} nm");
        }
    }
}

#[test]
fn trajectory_and_restart_files_read_back() {
    let system = load_system();
    let (_, metadata) = PdbFile::read_from(&mut Cursor::new(TWO_WATERS_PDB)).unwrap();
    let forcefield = Forcefield::from_str(WATER_FORCEFIELD).unwrap();

    let mut trajectory = PdbTrajectoryWriter::new(Vec::new()).with_metadata(metadata.clone());
    let outcome = simulate::run(
        &system,
        &forcefield,
        &params(100, true, None),
        &mut trajectory,
        &mut NullSink,
        &ProgressReporter::new(),
    )
    .unwrap();
    assert_eq!(trajectory.frames_written(), 2);

    let text = String::from_utf8(trajectory.into_inner()).unwrap();
    assert_eq!(text.matches("MODEL").count(), 2);
    assert_eq!(text.matches("ENDMDL").count(), 2);
    let (first_model, _) = PdbFile::read_from(&mut Cursor::new(text.as_str())).unwrap();
    assert_eq!(first_model.len(), system.len());

    let final_system = outcome.final_system(&system);
    let mut restart = Vec::new();
    PdbFile::write_to(&final_system, &metadata, &mut restart).unwrap();
    let (reread, reread_metadata) = PdbFile::read_from(&mut Cursor::new(restart)).unwrap();

    assert_eq!(reread.bonds(), system.bonds());
    assert_eq!(reread_metadata.header_lines, metadata.header_lines);
    for (a, b) in reread.positions().iter().zip(&outcome.final_state.positions) {
        // Coordinates are stored with three decimals in Ångström.
        assert!((a - b).norm() < 2e-4);
    }
}
