use std::fmt::{Display, Formatter};
use std::ops::Index;

/// Token count per place, indexed like [`Place::index`][crate::net::Place].
///
/// Markings are values: firing a transition produces a new marking, and
/// markings compare (and order) lexicographically by their token vectors.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Marking(Vec<u32>);

impl Marking {
    pub fn new(tokens: Vec<u32>) -> Self {
        Self(tokens)
    }

    /// The all-empty marking over `num_places` places.
    pub fn empty(num_places: usize) -> Self {
        Self(vec![0; num_places])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> &[u32] {
        &self.0
    }

    pub fn into_tokens(self) -> Vec<u32> {
        self.0
    }

    /// Returns `true` if no place holds more than one token.
    pub fn is_binary(&self) -> bool {
        self.0.iter().all(|&t| t <= 1)
    }

    /// Copy of this marking with place `p` toggled between 0 and 1 tokens.
    pub fn flipped(&self, p: usize) -> Self {
        let mut tokens = self.0.clone();
        tokens[p] = if tokens[p] == 0 { 1 } else { 0 };
        Self(tokens)
    }
}

impl Index<usize> for Marking {
    type Output = u32;

    fn index(&self, p: usize) -> &Self::Output {
        &self.0[p]
    }
}

impl From<Vec<u32>> for Marking {
    fn from(tokens: Vec<u32>) -> Self {
        Self(tokens)
    }
}

impl<const N: usize> From<[u32; N]> for Marking {
    fn from(tokens: [u32; N]) -> Self {
        Self(tokens.to_vec())
    }
}

impl FromIterator<u32> for Marking {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for Marking {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", t)?;
        }
        write!(f, "]")
    }
}

/// Linear objective over markings: `value(m) = Σ weight[p] * m[p]`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Objective(Vec<i64>);

impl Objective {
    pub fn new(weights: Vec<i64>) -> Self {
        Self(weights)
    }

    /// The all-ones objective, i.e. the total number of tokens.
    pub fn token_count(num_places: usize) -> Self {
        Self(vec![1; num_places])
    }

    pub fn weights(&self) -> &[i64] {
        &self.0
    }

    /// Dot product with `marking`; surplus entries on either side are ignored.
    /// Saturates at the `i64` bounds instead of overflowing.
    pub fn value(&self, marking: &Marking) -> i64 {
        self.0
            .iter()
            .zip(marking.tokens())
            .fold(0i64, |acc, (&w, &t)| acc.saturating_add(w.saturating_mul(t as i64)))
    }
}

impl From<Vec<i64>> for Objective {
    fn from(weights: Vec<i64>) -> Self {
        Self(weights)
    }
}
