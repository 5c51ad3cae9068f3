use crate::core::models::atom::normalize_element_symbol;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Lennard-Jones parameters of one element.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VdwParam {
    /// Collision diameter in nm.
    pub sigma: f64,
    /// Well depth in kJ/mol.
    pub epsilon: f64,
}

/// Harmonic bond parameters of one element pair.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BondParam {
    /// Reference bond length in nm.
    pub length: f64,
    /// Force constant in kJ/(mol·nm²).
    pub k: f64,
}

/// Harmonic angle parameters of one element triple.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AngleParam {
    /// Reference angle in degrees.
    pub angle: f64,
    /// Force constant in kJ/(mol·rad²).
    pub k: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ForcefieldFile {
    mass: HashMap<String, f64>,
    #[serde(default)]
    vdw: HashMap<String, VdwParam>,
    #[serde(default)]
    bonds: HashMap<String, BondParam>,
    #[serde(default)]
    angles: HashMap<String, AngleParam>,
}

/// Canonical key of a bond parameter: the two element symbols in sorted order.
pub type BondKey = (String, String);
/// Canonical key of an angle parameter: outer elements sorted, center in the middle.
pub type AngleKey = (String, String, String);

/// Raw force field tables, keyed by element symbols.
///
/// Lookups are symmetric: the bond `A-B` is the same entry as `B-A`, and the
/// angle `A-C-B` the same as `B-C-A`. Symbols are normalized on insertion, so
/// `"CL"` and `"Cl"` address the same element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forcefield {
    pub masses: HashMap<String, f64>,
    pub vdw: HashMap<String, VdwParam>,
    pub bonds: HashMap<BondKey, BondParam>,
    pub angles: HashMap<AngleKey, AngleParam>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid key '{key}' in [{table}] of '{path}': expected {expected}")]
    InvalidKey {
        path: String,
        table: &'static str,
        key: String,
        expected: &'static str,
    },
    #[error("Invalid value for '{entry}' in '{path}': {reason}")]
    InvalidValue {
        path: String,
        entry: String,
        reason: String,
    },
}

pub fn bond_key(a: &str, b: &str) -> BondKey {
    let (a, b) = (normalize_element_symbol(a), normalize_element_symbol(b));
    if a <= b { (a, b) } else { (b, a) }
}

pub fn angle_key(a: &str, center: &str, b: &str) -> AngleKey {
    let (a, b) = bond_key(a, b);
    (a, normalize_element_symbol(center), b)
}

impl Forcefield {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a force field from a TOML file.
    ///
    /// The file holds a `[mass]` table mapping element symbols to masses in
    /// amu, `[vdw.<El>]` tables with `sigma`/`epsilon`, `[bonds.<A>-<B>]`
    /// tables with `length`/`k` and `[angles.<A>-<C>-<B>]` tables with
    /// `angle` (degrees) and `k`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamLoadError`] if the file cannot be read, is not valid
    /// TOML, has a malformed bond/angle key or carries a non-physical value.
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let origin = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: origin.clone(),
            source: e,
        })?;
        Self::parse(&content, &origin)
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ParamLoadError> {
        let file: ForcefieldFile = toml::from_str(content).map_err(|e| ParamLoadError::Toml {
            path: origin.to_string(),
            source: e,
        })?;

        let invalid = |entry: String, reason: String| ParamLoadError::InvalidValue {
            path: origin.to_string(),
            entry,
            reason,
        };

        let mut ff = Self::new();
        for (element, mass) in file.mass {
            if !(mass.is_finite() && mass > 0.0) {
                return Err(invalid(
                    format!("mass.{element}"),
                    format!("mass must be positive, got {mass}"),
                ));
            }
            ff.set_mass(&element, mass);
        }
        for (element, param) in file.vdw {
            if !(param.sigma >= 0.0 && param.epsilon >= 0.0) {
                return Err(invalid(
                    format!("vdw.{element}"),
                    "sigma and epsilon must be non-negative".to_string(),
                ));
            }
            ff.set_vdw(&element, param);
        }
        for (key, param) in file.bonds {
            let parts = split_key(&key, 2).ok_or_else(|| ParamLoadError::InvalidKey {
                path: origin.to_string(),
                table: "bonds",
                key: key.clone(),
                expected: "two element symbols joined by '-' (e.g. 'O-H')",
            })?;
            if !(param.length > 0.0 && param.k >= 0.0) {
                return Err(invalid(
                    format!("bonds.{key}"),
                    "length must be positive and k non-negative".to_string(),
                ));
            }
            ff.set_bond(parts[0], parts[1], param);
        }
        for (key, param) in file.angles {
            let parts = split_key(&key, 3).ok_or_else(|| ParamLoadError::InvalidKey {
                path: origin.to_string(),
                table: "angles",
                key: key.clone(),
                expected: "three element symbols joined by '-' (e.g. 'H-O-H')",
            })?;
            if !((0.0..=180.0).contains(&param.angle) && param.k >= 0.0) {
                return Err(invalid(
                    format!("angles.{key}"),
                    "angle must lie in [0, 180] degrees and k must be non-negative".to_string(),
                ));
            }
            ff.set_angle(parts[0], parts[1], parts[2], param);
        }
        Ok(ff)
    }

    pub fn set_mass(&mut self, element: &str, mass: f64) -> &mut Self {
        self.masses.insert(normalize_element_symbol(element), mass);
        self
    }

    pub fn set_vdw(&mut self, element: &str, param: VdwParam) -> &mut Self {
        self.vdw.insert(normalize_element_symbol(element), param);
        self
    }

    pub fn set_bond(&mut self, a: &str, b: &str, param: BondParam) -> &mut Self {
        self.bonds.insert(bond_key(a, b), param);
        self
    }

    pub fn set_angle(&mut self, a: &str, center: &str, b: &str, param: AngleParam) -> &mut Self {
        self.angles.insert(angle_key(a, center, b), param);
        self
    }

    pub fn mass(&self, element: &str) -> Option<f64> {
        self.masses.get(element).copied()
    }

    pub fn bond(&self, a: &str, b: &str) -> Option<&BondParam> {
        self.bonds.get(&bond_key(a, b))
    }

    pub fn angle(&self, a: &str, center: &str, b: &str) -> Option<&AngleParam> {
        self.angles.get(&angle_key(a, center, b))
    }
}

impl FromStr for Forcefield {
    type Err = ParamLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, "<string>")
    }
}

fn split_key(key: &str, expected_parts: usize) -> Option<Vec<&str>> {
    let parts: Vec<&str> = key.split('-').map(str::trim).collect();
    (parts.len() == expected_parts && parts.iter().all(|p| !p.is_empty())).then_some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const WATER_FF: &str = r#"
        [mass]
        O = 15.9994
        H = 1.008

        [vdw.O]
        sigma = 0.315
        epsilon = 0.636

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

    #[test]
    fn parse_succeeds_with_valid_toml() {
        let ff: Forcefield = WATER_FF.parse().unwrap();
        assert_eq!(ff.mass("O"), Some(15.9994));
        assert_eq!(
            ff.vdw.get("O"),
            Some(&VdwParam {
                sigma: 0.315,
                epsilon: 0.636
            })
        );
        assert_eq!(ff.bond("O", "H").unwrap().length, 0.09572);
        assert_eq!(ff.angle("H", "O", "H").unwrap().angle, 104.52);
    }

    #[test]
    fn bond_and_angle_lookups_are_symmetric() {
        let ff: Forcefield = WATER_FF.parse().unwrap();
        assert_eq!(ff.bond("H", "O"), ff.bond("O", "H"));
        let mut ff = ff;
        ff.set_angle(
            "C",
            "O",
            "H",
            AngleParam {
                angle: 108.5,
                k: 460.0,
            },
        );
        assert_eq!(ff.angle("H", "O", "C"), ff.angle("C", "O", "H"));
        assert!(ff.angle("O", "C", "H").is_none());
    }

    #[test]
    fn element_symbols_are_normalized() {
        let ff: Forcefield = "[mass]\nCL = 35.45\n[bonds.cl-CL]\nlength = 0.2\nk = 1.0\n"
            .parse()
            .unwrap();
        assert_eq!(ff.mass("Cl"), Some(35.45));
        assert!(ff.bond("Cl", "Cl").is_some());
    }

    #[test]
    fn malformed_bond_key_is_rejected() {
        let result: Result<Forcefield, _> =
            "[mass]\nO = 16.0\n[bonds.O]\nlength = 0.1\nk = 1.0\n".parse();
        assert!(matches!(
            result,
            Err(ParamLoadError::InvalidKey { table: "bonds", .. })
        ));
    }

    #[test]
    fn malformed_angle_key_is_rejected() {
        let result: Result<Forcefield, _> =
            "[mass]\nO = 16.0\n[angles.H-O]\nangle = 100.0\nk = 1.0\n".parse();
        assert!(matches!(
            result,
            Err(ParamLoadError::InvalidKey { table: "angles", .. })
        ));
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        let result: Result<Forcefield, _> = "[mass]\nO = 0.0\n".parse();
        assert!(matches!(result, Err(ParamLoadError::InvalidValue { .. })));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<Forcefield, _> =
            "[mass]\nO = 16.0\n[vdw.O]\nsigma = 0.3\nepsilon = 0.1\nradius = 2.0\n".parse();
        assert!(matches!(result, Err(ParamLoadError::Toml { .. })));
    }

    #[test]
    fn load_succeeds_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("water.toml");
        fs::write(&path, WATER_FF).unwrap();
        let ff = Forcefield::load(&path).unwrap();
        assert_eq!(ff.masses.len(), 2);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = Forcefield::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ParamLoadError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "this is not toml").unwrap();
        let result = Forcefield::load(&path);
        assert!(matches!(result, Err(ParamLoadError::Toml { .. })));
    }
}
