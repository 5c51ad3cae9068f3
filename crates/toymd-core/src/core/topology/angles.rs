use super::{TopologyError, adjacency};
use crate::core::models::topology::{Angle, Bond};
use itertools::Itertools;

/// Derives every valence angle implied by a bond list.
///
/// For each particle `j` (in index order) with at least two bonded
/// neighbours, every unordered pair of neighbours `(a, b)` yields one angle
/// `a-j-b`. Pairs are visited in the order the bonds were listed, so the
/// output is stable for a given input. A particle with `n` neighbours
/// contributes exactly `n(n-1)/2` angles and no angle appears twice.
///
/// Returns an empty list when no particle has two or more neighbours.
pub fn derive_angles(n_particles: usize, bonds: &[Bond]) -> Result<Vec<Angle>, TopologyError> {
    let neighbors = adjacency(n_particles, bonds)?;
    Ok(neighbors
        .iter()
        .enumerate()
        .filter(|(_, partners)| partners.len() >= 2)
        .flat_map(|(center, partners)| {
            partners
                .iter()
                .tuple_combinations()
                .map(move |(&a, &b)| Angle::new(a, center, b))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn no_angles_for_isolated_bonds() {
        let angles = derive_angles(4, &[Bond::new(0, 1), Bond::new(2, 3)]).unwrap();
        assert!(angles.is_empty());
    }

    #[test]
    fn linear_chain_yields_one_angle_per_inner_particle() {
        let bonds = [Bond::new(0, 1), Bond::new(1, 2), Bond::new(2, 3)];
        let angles = derive_angles(4, &bonds).unwrap();
        assert_eq!(angles, vec![Angle::new(0, 1, 2), Angle::new(1, 2, 3)]);
    }

    #[test]
    fn methane_center_has_six_unique_angles() {
        let bonds: Vec<_> = (1..=4).map(|h| Bond::new(0, h)).collect();
        let angles = derive_angles(5, &bonds).unwrap();

        assert_eq!(angles.len(), 4 * 3 / 2);
        let unique: HashSet<_> = angles.iter().copied().collect();
        assert_eq!(unique.len(), angles.len());
        assert!(angles.iter().all(|a| a.j == 0 && a.i < a.k));
    }

    #[test]
    fn angle_count_matches_neighbor_combinatorics_for_branched_molecule() {
        // Isobutane-like skeleton: 0 central, 1..=3 around it, 4 and 5 on particle 1.
        let bonds = [
            Bond::new(0, 1),
            Bond::new(0, 2),
            Bond::new(0, 3),
            Bond::new(1, 4),
            Bond::new(1, 5),
        ];
        let angles = derive_angles(6, &bonds).unwrap();

        let mut degree = [0usize; 6];
        for b in &bonds {
            degree[b.i] += 1;
            degree[b.j] += 1;
        }
        for (center, &n) in degree.iter().enumerate() {
            let count = angles.iter().filter(|a| a.j == center).count();
            assert_eq!(count, n * n.saturating_sub(1) / 2, "center {center}");
        }
        let unique: HashSet<_> = angles.iter().copied().collect();
        assert_eq!(unique.len(), angles.len());
    }

    #[test]
    fn duplicated_bond_does_not_duplicate_angles() {
        let bonds = [Bond::new(0, 1), Bond::new(0, 2), Bond::new(2, 0)];
        let angles = derive_angles(3, &bonds).unwrap();
        assert_eq!(angles, vec![Angle::new(1, 0, 2)]);
    }
}
