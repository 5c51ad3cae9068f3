use nalgebra::Point3;

/// Represents a single particle of the simulated system.
///
/// A particle carries only its identity and its position; velocities and
/// forces are owned by the integration state so that the structural model
/// stays a plain description of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// The serial number from the source structure file.
    pub serial: usize,
    /// The atom name (e.g., "OW", "HW1").
    pub name: String,
    /// The normalized element symbol (e.g., "O", "Cl").
    pub element: String,
    /// Index of the parent residue in the owning system.
    pub residue_index: usize,
    /// Cartesian position in nanometers.
    pub position: Point3<f64>,
}

impl Particle {
    /// Creates a new `Particle`.
    ///
    /// The element symbol is normalized with [`normalize_element_symbol`] so
    /// that force field lookups are insensitive to the capitalization used by
    /// the input file.
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number from the source file.
    /// * `name` - The atom name.
    /// * `element` - The element symbol, in any capitalization.
    /// * `residue_index` - Index of the parent residue.
    /// * `position` - The position in nanometers.
    pub fn new(
        serial: usize,
        name: &str,
        element: &str,
        residue_index: usize,
        position: Point3<f64>,
    ) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: normalize_element_symbol(element),
            residue_index,
            position,
        }
    }
}

/// Normalizes an element symbol to its conventional capitalization.
///
/// The first character is upper-cased and the rest lower-cased, so `"CL"`,
/// `"cl"` and `"Cl"` all map to `"Cl"`. Surrounding whitespace is dropped.
pub fn normalize_element_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_particle_stores_fields_and_normalizes_element() {
        let p = Particle::new(7, "CL1", "CL", 2, Point3::new(0.1, 0.2, 0.3));
        assert_eq!(p.serial, 7);
        assert_eq!(p.name, "CL1");
        assert_eq!(p.element, "Cl");
        assert_eq!(p.residue_index, 2);
        assert_eq!(p.position, Point3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn normalize_element_symbol_handles_common_forms() {
        assert_eq!(normalize_element_symbol("o"), "O");
        assert_eq!(normalize_element_symbol(" NA "), "Na");
        assert_eq!(normalize_element_symbol("Fe"), "Fe");
        assert_eq!(normalize_element_symbol(""), "");
    }
}
