use super::TopologyError;
use crate::core::models::topology::{Angle, Bond};
use std::collections::HashSet;

/// Per-particle sets of partners excluded from nonbonded interactions.
///
/// The relation is symmetric: `j` is in the set of `i` exactly when `i` is in
/// the set of `j`. A particle is never excluded from itself; self pairs are
/// skipped by the pair loops directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusions {
    sets: Vec<HashSet<usize>>,
}

impl Exclusions {
    /// Creates empty exclusion sets for `n_particles` particles.
    pub fn new(n_particles: usize) -> Self {
        Self {
            sets: vec![HashSet::new(); n_particles],
        }
    }

    fn insert_pair(&mut self, a: usize, b: usize) {
        self.sets[a].insert(b);
        self.sets[b].insert(a);
    }

    /// Whether the pair `(i, j)` is excluded from the nonbonded sum.
    #[inline]
    pub fn is_excluded(&self, i: usize, j: usize) -> bool {
        self.sets.get(i).is_some_and(|set| set.contains(&j))
    }

    /// The exclusion set of particle `i`.
    pub fn of(&self, i: usize) -> Option<&HashSet<usize>> {
        self.sets.get(i)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of distinct excluded unordered pairs.
    pub fn pair_count(&self) -> usize {
        self.sets.iter().map(HashSet::len).sum::<usize>() / 2
    }
}

/// Derives the exclusion sets from bonds and angles.
///
/// Every particle excludes its directly bonded partners (1-2) and every
/// particle it shares an angle with (1-3 through the angle's central
/// particle). No distance criterion is applied.
///
/// # Errors
///
/// Returns [`TopologyError`] if a bond or angle references a particle outside
/// the system, or a bond connects a particle to itself.
pub fn derive_exclusions(
    n_particles: usize,
    bonds: &[Bond],
    angles: &[Angle],
) -> Result<Exclusions, TopologyError> {
    let mut exclusions = Exclusions::new(n_particles);

    for &bond in bonds {
        if bond.i == bond.j {
            return Err(TopologyError::SelfBond(bond));
        }
        if let Some(index) = [bond.i, bond.j].into_iter().find(|&x| x >= n_particles) {
            return Err(TopologyError::IndexOutOfRange {
                bond,
                index,
                n_particles,
            });
        }
        exclusions.insert_pair(bond.i, bond.j);
    }

    for angle in angles {
        let members = [angle.i, angle.j, angle.k];
        if let Some(index) = members.into_iter().find(|&x| x >= n_particles) {
            return Err(TopologyError::IndexOutOfRange {
                bond: Bond::new(angle.i, angle.k),
                index,
                n_particles,
            });
        }
        exclusions.insert_pair(angle.i, angle.j);
        exclusions.insert_pair(angle.j, angle.k);
        exclusions.insert_pair(angle.i, angle.k);
    }

    Ok(exclusions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topology::angles::derive_angles;

    fn exclusions_for(n: usize, bonds: &[Bond]) -> Exclusions {
        let angles = derive_angles(n, bonds).unwrap();
        derive_exclusions(n, bonds, &angles).unwrap()
    }

    #[test]
    fn bonded_and_angle_partners_are_excluded() {
        // Butane skeleton 0-1-2-3: 0 and 3 are a 1-4 pair and stay included.
        let bonds = [Bond::new(0, 1), Bond::new(1, 2), Bond::new(2, 3)];
        let exclusions = exclusions_for(4, &bonds);

        assert!(exclusions.is_excluded(0, 1));
        assert!(exclusions.is_excluded(0, 2));
        assert!(exclusions.is_excluded(1, 3));
        assert!(!exclusions.is_excluded(0, 3));
        assert_eq!(exclusions.pair_count(), 5);
    }

    #[test]
    fn exclusions_are_symmetric() {
        let bonds = [
            Bond::new(0, 1),
            Bond::new(0, 2),
            Bond::new(0, 3),
            Bond::new(3, 4),
            Bond::new(5, 6),
        ];
        let exclusions = exclusions_for(8, &bonds);
        for i in 0..8 {
            for j in 0..8 {
                assert_eq!(
                    exclusions.is_excluded(i, j),
                    exclusions.is_excluded(j, i),
                    "asymmetric pair ({i}, {j})"
                );
            }
        }
    }

    #[test]
    fn no_particle_excludes_itself() {
        let bonds = [Bond::new(0, 1), Bond::new(1, 2)];
        let exclusions = exclusions_for(3, &bonds);
        for i in 0..3 {
            assert!(!exclusions.is_excluded(i, i));
        }
    }

    #[test]
    fn unbonded_particles_have_empty_sets() {
        let exclusions = exclusions_for(3, &[Bond::new(0, 1)]);
        assert!(exclusions.of(2).unwrap().is_empty());
        assert!(!exclusions.is_excluded(0, 2));
        assert!(!exclusions.is_excluded(7, 0));
    }

    #[test]
    fn angle_out_of_range_is_rejected() {
        let result = derive_exclusions(2, &[], &[Angle::new(0, 1, 2)]);
        assert!(matches!(
            result,
            Err(TopologyError::IndexOutOfRange { index: 2, .. })
        ));
    }
}
