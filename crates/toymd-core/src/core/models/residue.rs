#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,            // Residue sequence number from source file
    pub name: String,             // Name of the residue (e.g., "SOL", "ALA")
    pub chain_id: char,           // Chain identifier from source file
    pub(crate) atoms: Vec<usize>, // Indices of the particles belonging to this residue
}

impl Residue {
    pub(crate) fn new(number: isize, name: &str, chain_id: char) -> Self {
        Self {
            number,
            name: name.to_string(),
            chain_id,
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, particle_index: usize) {
        self.atoms.push(particle_index);
    }

    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }
}
