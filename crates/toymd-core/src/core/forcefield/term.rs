use serde::Serialize;

/// Potential energy split by interaction type, in kJ/mol.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EnergyTerm {
    pub bond: f64,
    pub angle: f64,
    pub vdw: f64,
}

impl EnergyTerm {
    pub fn new(bond: f64, angle: f64, vdw: f64) -> Self {
        Self { bond, angle, vdw }
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.bond + self.angle + self.vdw
    }
}
