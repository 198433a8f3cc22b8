/*!

A `Trace` is an immutable element of a trace monoid: a word over the monoid's
alphabet, stored as a run-length compressed sequence of `(generator,
multiplicity)` pairs. Adjacent runs never share a generator; boundary runs
are merged on construction. That is a representation invariant only; an
arbitrary `Trace` is just one linear representative of its congruence class,
and two traces are the same element exactly when their canonical forms agree.

Equality, ordering into hash containers, and printing therefore all go through
the memoized lexicographic normal form held by the parent monoid.

*/

use std::{
  fmt,
  hash::{Hash, Hasher},
  ops::Mul,
  rc::Rc,
  str::FromStr,
};

use smallvec::SmallVec;

use crate::{
  alphabet::Generator,
  error::{TraceError, TraceResult},
  foata::FoataNormalForm,
  format::{DisplayForm, Formattable, Formatter},
  graph::{self, DiGraph},
  monoid::{MonoidInner, TraceMonoid},
  normal_form::Algorithm,
};


/// A run is a generator with a positive multiplicity.
pub type Run = (Generator, u32);
pub type RunVec = SmallVec<[Run; 8]>;

/// Run-length compresses a letter or run sequence, merging adjacent runs that
/// share a generator and dropping empty runs.
pub(crate) fn merge_runs<I>(runs: I) -> RunVec
  where I: IntoIterator<Item = Run>
{
  let mut merged: RunVec = SmallVec::new();
  for (g, multiplicity) in runs {
    if multiplicity == 0 {
      continue;
    }
    match merged.last_mut() {
      Some((last, count)) if *last == g => *count += multiplicity,
      _ => merged.push((g, multiplicity)),
    }
  }
  merged
}


#[derive(Clone)]
pub struct Trace {
  pub(crate) monoid: Rc<MonoidInner>,
  pub(crate) runs: RunVec,
}

impl Trace {
  pub(crate) fn from_runs<I>(monoid: Rc<MonoidInner>, runs: I) -> Trace
    where I: IntoIterator<Item = Run>
  {
    Trace {
      monoid,
      runs: merge_runs(runs)
    }
  }

  /// The parent monoid of this trace.
  pub fn parent(&self) -> TraceMonoid {
    TraceMonoid {
      inner: Rc::clone(&self.monoid)
    }
  }

  /// The compressed run sequence of this linear representative.
  pub fn runs(&self) -> &[Run] {
    &self.runs
  }

  /// The number of letter occurrences, i.e. the sum of multiplicities.
  pub fn length(&self) -> usize {
    self.runs.iter().map(|&(_, multiplicity)| multiplicity as usize).sum()
  }

  pub fn is_identity(&self) -> bool {
    self.runs.is_empty()
  }

  /// Expands the run sequence into one generator per occurrence.
  pub fn flatten(&self) -> Vec<Generator> {
    let mut word = Vec::with_capacity(self.length());
    for &(g, multiplicity) in self.runs.iter() {
      for _ in 0..multiplicity {
        word.push(g);
      }
    }
    word
  }

  /// The canonical representative of this trace's congruence class, computed
  /// by the requested algorithm. Both algorithms give the identical result;
  /// the choice only matters for cross-validation.
  pub fn normal_form(&self, algorithm: Algorithm) -> TraceResult<Trace> {
    let runs = self.monoid.canonical_runs(&self.runs, algorithm)?;
    Ok(
      Trace {
        monoid: Rc::clone(&self.monoid),
        runs
      }
    )
  }

  /// The lexicographic normal form. Same result as `normal_form` with either
  /// algorithm; this entry point is infallible and memoized, and is what
  /// equality and hashing use.
  pub fn lex_normal_form(&self) -> Trace {
    Trace {
      monoid: Rc::clone(&self.monoid),
      runs: self.monoid.lex_runs(&self.runs)
    }
  }

  /// Computes the normal form via a string algorithm selector, `"sort"` or
  /// `"stack"`. Anything else fails with `UnknownAlgorithm`.
  pub fn normal_form_named(&self, name: &str) -> TraceResult<Trace> {
    let algorithm = Algorithm::from_str(name)
        .map_err(|_| TraceError::UnknownAlgorithm(name.to_string()))?;
    self.normal_form(algorithm)
  }

  /// Decomposes the trace into its Foata normal form, the ordered sequence of
  /// maximal concurrency steps.
  pub fn foata_normal_form(&self) -> TraceResult<FoataNormalForm> {
    let steps = self.monoid.foata_steps(&self.runs)?;
    Ok(FoataNormalForm::new(self.clone(), steps))
  }

  /// The precedence DAG over the letter occurrences of the canonical
  /// linearization: an edge `i → j` for `i < j` exactly when the two
  /// occurrences carry dependent generators. Up to relabeling, the same graph
  /// arises from every linearization of the class.
  pub fn dependency_graph(&self) -> DiGraph {
    let word = self.lex_normal_form().flatten();
    graph::dependency_graph(&self.monoid.independence, &word)
  }

  /// The Hasse diagram of the happens-before partial order: the transitive
  /// reduction of the dependency graph's closure.
  pub fn hasse_diagram(&self) -> DiGraph {
    self.dependency_graph().transitive_closure().transitive_reduction()
  }
}


impl Mul for Trace {
  type Output = Trace;

  /// The monoid product: concatenation with boundary-run merging.
  fn mul(self, rhs: Trace) -> Trace {
    if !Rc::ptr_eq(&self.monoid, &rhs.monoid) {
      unreachable!("Tried to multiply traces from different monoids.");
    }
    let monoid = Rc::clone(&self.monoid);
    Trace::from_runs(monoid, self.runs.into_iter().chain(rhs.runs))
  }
}

impl Mul for &Trace {
  type Output = Trace;

  fn mul(self, rhs: &Trace) -> Trace {
    self.clone() * rhs.clone()
  }
}


impl PartialEq for Trace {
  /// Traces are equal when they belong to the same monoid and their canonical
  /// forms have identical run sequences.
  fn eq(&self, other: &Trace) -> bool {
    Rc::ptr_eq(&self.monoid, &other.monoid)
        && self.monoid.lex_runs(&self.runs) == other.monoid.lex_runs(&other.runs)
  }
}

impl Eq for Trace {}

impl Hash for Trace {
  /// Hashes the canonical run sequence so that congruent traces collide.
  fn hash<H: Hasher>(&self, hasher: &mut H) {
    for run in self.monoid.lex_runs(&self.runs) {
      run.hash(hasher);
    }
  }
}

impl fmt::Debug for Trace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Trace({:?})", self.runs)
  }
}

impl Formattable for Trace {
  fn format(&self, formatter: &Formatter) -> String {
    if self.runs.is_empty() {
      return "1".to_string();
    }
    let alphabet = &self.monoid.alphabet;
    match formatter.form {
      DisplayForm::Input => {
        self.runs
            .iter()
            .map(|&(g, multiplicity)| {
              if multiplicity == 1 {
                alphabet.name(g).to_string()
              } else {
                format!("{}^{}", alphabet.name(g), multiplicity)
              }
            })
            .collect::<Vec<_>>()
            .join("*")
      }

      DisplayForm::Latex => {
        self.runs
            .iter()
            .map(|&(g, multiplicity)| {
              if multiplicity == 1 {
                alphabet.name(g).to_string()
              } else {
                format!("{}^{{{}}}", alphabet.name(g), multiplicity)
              }
            })
            .collect::<Vec<_>>()
            .join(" ")
      }
    }
  }
}

display_formattable_impl!(Trace);


#[cfg(test)]
mod tests {
  use super::*;
  use crate::monoid::TraceMonoid;

  // Alphabet {a=0, b=1, c=2}, independence {(a, c)}.
  fn worked_example() -> TraceMonoid {
    TraceMonoid::with_names(&["a", "b", "c"], &[("a", "c")]).unwrap()
  }

  #[test]
  fn product_merges_boundary_runs() {
    let monoid = worked_example();
    let left = monoid.trace(&[0, 1]);
    let right = monoid.trace(&[1, 2]);
    let product = left * right;
    assert_eq!(product.runs(), &[(0, 1), (1, 2), (2, 1)]);
    assert_eq!(product.length(), 4);
  }

  #[test]
  fn identity_is_neutral() {
    let monoid = worked_example();
    let word = monoid.trace(&[2, 0, 1]);
    assert_eq!(monoid.identity() * word.clone(), word);
    assert_eq!(word.clone() * monoid.identity(), word);
    assert!(monoid.identity().is_identity());
  }

  #[test]
  fn congruent_traces_are_equal() {
    let monoid = worked_example();
    let a = monoid.gen(0);
    let b = monoid.gen(1);
    let c = monoid.gen(2);
    // a and c commute; b commutes with neither.
    assert_eq!(&c * &a, &a * &c);
    assert_ne!(&a * &b, &b * &a);
    assert_ne!(&c * &b, &b * &c);
  }

  #[test]
  fn congruence_spans_chained_swaps() {
    // Chained independence a-b, b-c, c-d: c a b, c b a, and b c a are all the
    // same element even though c a b and b c a differ by no single adjacent
    // swap.
    let monoid = TraceMonoid::new(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
    let first = monoid.trace(&[2, 0, 1]);
    let second = monoid.trace(&[2, 1, 0]);
    let third = monoid.trace(&[1, 2, 0]);
    assert_eq!(first, second);
    assert_eq!(second, third);
    let mut classes = fnv::FnvHashSet::default();
    classes.insert(first);
    classes.insert(second);
    classes.insert(third);
    assert_eq!(classes.len(), 1);
  }

  #[test]
  fn congruent_traces_hash_together() {
    let monoid = worked_example();
    let mut classes = fnv::FnvHashSet::default();
    classes.insert(monoid.trace(&[2, 0]));
    classes.insert(monoid.trace(&[0, 2]));
    assert_eq!(classes.len(), 1);
  }

  #[test]
  fn formats_runs() {
    let monoid = worked_example();
    let word = monoid.trace(&[0, 0, 1, 2]);
    assert_eq!(word.to_string(), "a^2*b*c");
    assert_eq!(word.format(&Formatter::from(DisplayForm::Latex)), "a^{2} b c");
    assert_eq!(monoid.identity().to_string(), "1");
  }

  #[test]
  fn flatten_expands_multiplicities() {
    let monoid = worked_example();
    let word = monoid.trace(&[0, 0, 2, 1, 1, 1]);
    assert_eq!(word.flatten(), vec![0, 0, 2, 1, 1, 1]);
  }

  #[test]
  fn unknown_algorithm_selector() {
    let monoid = worked_example();
    let word = monoid.trace(&[2, 0, 1]);
    assert_eq!(word.normal_form_named("sort").unwrap().to_string(), "a*c*b");
    assert_eq!(word.normal_form_named("stack").unwrap().to_string(), "a*c*b");
    assert_eq!(
      word.normal_form_named("bogosort"),
      Err(TraceError::UnknownAlgorithm("bogosort".to_string()))
    );
  }
}
