use std::fmt;

/// An unordered covalent bond between two particles, stored with `i < j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
}

impl Bond {
    /// Creates a bond with its endpoints in canonical (ascending) order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            i: a.min(b),
            j: a.max(b),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.i == index || self.j == index
    }

    /// Returns the partner of `index` in this bond, if `index` is an endpoint.
    pub fn other(&self, index: usize) -> Option<usize> {
        if self.i == index {
            Some(self.j)
        } else if self.j == index {
            Some(self.i)
        } else {
            None
        }
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.i, self.j)
    }
}

/// A valence angle `i-j-k` with `j` the central particle and `i < k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Angle {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl Angle {
    /// Creates an angle around `center` with its outer particles in canonical order.
    pub fn new(a: usize, center: usize, b: usize) -> Self {
        Self {
            i: a.min(b),
            j: center,
            k: a.max(b),
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.i, self.j, self.k)
    }
}
