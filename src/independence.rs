/*!

The independence relation of a trace monoid: a symmetric, irreflexive relation
over generator pairs. Independent generators commute; everything else is
dependent. Dependence is the complement over all ordered pairs *including* the
diagonal: a generator always depends on itself, which is what pins the
relative order of repeated occurrences.

Pairs are stored normalized as `(min, max)`, so symmetry is by construction
and each unordered pair is stored once.

*/

use fnv::FnvHashSet;

use crate::{
  alphabet::{Alphabet, Generator},
  error::{TraceError, TraceResult},
  format::{Formattable, Formatter},
  logging::{log, Channel},
};


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndependenceRelation {
  alphabet_size: u32,
  pairs: FnvHashSet<(Generator, Generator)>,
}

impl IndependenceRelation {
  /// Builds the relation from unordered index pairs, deduplicating and
  /// symmetrizing. Rejects self-pairs and out-of-range indices.
  pub fn new<I>(alphabet_size: usize, pairs: I) -> TraceResult<IndependenceRelation>
    where I: IntoIterator<Item=(Generator, Generator)>
  {
    let alphabet_size = alphabet_size as u32;
    let mut normalized = FnvHashSet::default();
    for (g, h) in pairs {
      if g == h {
        return Err(TraceError::InvalidRelation(
          format!("pair ({}, {}) is a self-pair", g, h)
        ));
      }
      if g >= alphabet_size || h >= alphabet_size {
        return Err(TraceError::InvalidRelation(
          format!("pair ({}, {}) is out of range for an alphabet of {} generators", g, h, alphabet_size)
        ));
      }
      normalized.insert(Self::key(g, h));
    }
    log(
      Channel::Debug,
      4,
      format!("Independence relation over {} generators with {} pairs.", alphabet_size, normalized.len()).as_str()
    );
    Ok(
      IndependenceRelation {
        alphabet_size,
        pairs: normalized
      }
    )
  }

  /// Builds the relation from pairs of generator *names*, resolved through the
  /// given alphabet.
  pub fn from_named_pairs(alphabet: &Alphabet, pairs: &[(&str, &str)])
    -> TraceResult<IndependenceRelation>
  {
    let mut index_pairs = Vec::with_capacity(pairs.len());
    for (left, right) in pairs {
      index_pairs.push((alphabet.resolve(left)?, alphabet.resolve(right)?));
    }
    IndependenceRelation::new(alphabet.len(), index_pairs)
  }

  pub fn alphabet_size(&self) -> usize {
    self.alphabet_size as usize
  }

  /// Symmetric, and always false on the diagonal.
  pub fn independent(&self, g: Generator, h: Generator) -> bool {
    g != h && self.pairs.contains(&Self::key(g, h))
  }

  pub fn dependent(&self, g: Generator, h: Generator) -> bool {
    !self.independent(g, h)
  }

  /// The normalized pair list, sorted for deterministic printing and graph
  /// construction.
  pub fn pairs(&self) -> Vec<(Generator, Generator)> {
    let mut pairs: Vec<_> = self.pairs.iter().copied().collect();
    pairs.sort_unstable();
    pairs
  }

  pub fn pair_count(&self) -> usize {
    self.pairs.len()
  }

  fn key(g: Generator, h: Generator) -> (Generator, Generator) {
    if g < h { (g, h) } else { (h, g) }
  }
}

/// Formats the relation as a set of named pairs, so it needs the alphabet.
/// `IndependenceRelation` itself only knows index space.
pub(crate) fn format_relation(
  relation: &IndependenceRelation,
  alphabet: &Alphabet,
  _formatter: &Formatter
) -> String
{
  let pairs = relation.pairs()
                      .iter()
                      .map(|&(g, h)| format!("({}, {})", alphabet.name(g), alphabet.name(h)))
                      .collect::<Vec<_>>()
                      .join(", ");
  format!("{{{}}}", pairs)
}

impl Formattable for IndependenceRelation {
  fn format(&self, _formatter: &Formatter) -> String {
    let pairs = self.pairs()
                    .iter()
                    .map(|&(g, h)| format!("({}, {})", g, h))
                    .collect::<Vec<_>>()
                    .join(", ");
    format!("{{{}}}", pairs)
  }
}

display_formattable_impl!(IndependenceRelation);


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn symmetric_and_irreflexive() {
    let relation = IndependenceRelation::new(3, vec![(2, 0)]).unwrap();
    assert!(relation.independent(0, 2));
    assert!(relation.independent(2, 0));
    assert!(relation.dependent(0, 0));
    assert!(relation.dependent(2, 2));
    assert!(relation.dependent(0, 1));
    assert_eq!(relation.pairs(), vec![(0, 2)]);
  }

  #[test]
  fn deduplicates() {
    let relation = IndependenceRelation::new(3, vec![(0, 2), (2, 0), (0, 2)]).unwrap();
    assert_eq!(relation.pair_count(), 1);
  }

  #[test]
  fn rejects_self_pair() {
    let result = IndependenceRelation::new(3, vec![(1, 1)]);
    assert!(matches!(result, Err(TraceError::InvalidRelation(_))));
  }

  #[test]
  fn rejects_out_of_range() {
    let result = IndependenceRelation::new(3, vec![(0, 3)]);
    assert!(matches!(result, Err(TraceError::InvalidRelation(_))));
  }

  #[test]
  fn named_pairs() {
    let alphabet = Alphabet::from_names(&["a", "b", "c"]).unwrap();
    let relation = IndependenceRelation::from_named_pairs(&alphabet, &[("a", "c")]).unwrap();
    assert!(relation.independent(0, 2));
    assert_eq!(
      IndependenceRelation::from_named_pairs(&alphabet, &[("a", "d")]),
      Err(TraceError::UnknownGenerator("d".to_string()))
    );
  }
}
