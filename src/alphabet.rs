/*!

The naming layer over a monoid's generators. The combinatorial core works
entirely in index space; an `Alphabet` is the boundary where names come in.
Names are interned, so an `Alphabet` is a `Vec` of interned symbols plus the
reverse lookup table.

*/

use fnv::FnvHashMap;

use crate::{
  error::{TraceError, TraceResult},
  interner::{interned, resolve_str, InternedString},
};


/// A generator is an index into a fixed alphabet.
pub type Generator = u32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
  names: Vec<InternedString>,
  index: FnvHashMap<InternedString, Generator>,
}

impl Alphabet {
  /// An alphabet of `n` generators with the default names `x0`, `x1`, ….
  pub fn with_size(n: usize) -> Alphabet {
    let names: Vec<String> = (0..n).map(|i| format!("x{}", i)).collect();
    let names: Vec<&str> = names.iter().map(|name| name.as_str()).collect();
    match Alphabet::from_names(&names) {
      Ok(alphabet) => alphabet,
      // Generated names are distinct by construction.
      Err(_) => unreachable!("Default generator names collided. This is a bug.")
    }
  }

  /// An alphabet with explicit generator names, one per generator, in index
  /// order.
  pub fn from_names(names: &[&str]) -> TraceResult<Alphabet> {
    let mut interned_names = Vec::with_capacity(names.len());
    let mut index = FnvHashMap::default();
    for (i, name) in names.iter().enumerate() {
      let symbol = interned(name);
      if index.insert(symbol, i as Generator).is_some() {
        return Err(TraceError::DuplicateGenerator((*name).to_string()));
      }
      interned_names.push(symbol);
    }
    Ok(
      Alphabet {
        names: interned_names,
        index
      }
    )
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// The name of generator `g`. Panics on an out-of-range index, like slice
  /// indexing.
  pub fn name(&self, g: Generator) -> &'static str {
    resolve_str(self.names[g as usize])
  }

  pub fn index_of(&self, name: &str) -> Option<Generator> {
    self.index.get(&interned(name)).copied()
  }

  /// Resolves a name to its index, failing with `UnknownGenerator`.
  pub fn resolve(&self, name: &str) -> TraceResult<Generator> {
    self.index_of(name)
        .ok_or_else(|| TraceError::UnknownGenerator(name.to_string()))
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_names() {
    let alphabet = Alphabet::with_size(3);
    assert_eq!(alphabet.len(), 3);
    assert_eq!(alphabet.name(0), "x0");
    assert_eq!(alphabet.name(2), "x2");
    assert_eq!(alphabet.index_of("x1"), Some(1));
  }

  #[test]
  fn explicit_names() {
    let alphabet = Alphabet::from_names(&["a", "b", "c"]).unwrap();
    assert_eq!(alphabet.name(1), "b");
    assert_eq!(alphabet.resolve("c"), Ok(2));
    assert_eq!(
      alphabet.resolve("d"),
      Err(TraceError::UnknownGenerator("d".to_string()))
    );
  }

  #[test]
  fn rejects_duplicates() {
    assert_eq!(
      Alphabet::from_names(&["a", "b", "a"]),
      Err(TraceError::DuplicateGenerator("a".to_string()))
    );
  }
}
