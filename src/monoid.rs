/*!

A `TraceMonoid` is the parent object of its traces: the alphabet, the
independence relation fixed at construction, and the memo tables for results
derived from trace contents. Traces hold an `Rc` to the shared interior, so
the parent owns every expression-level cache and traces stay cheap values.

Derived results (canonical forms, Foata steps, growth coefficients) are
pure functions of a run sequence and the (immutable) relation, so they are
safe to cache for the monoid's lifetime. The caches are `RefCell`s keyed by
structural equality of run sequences; the evaluation model is single-threaded
throughout, no locking discipline applies.

*/

use std::{cell::RefCell, rc::Rc};

use fnv::FnvHashMap;
use rug::Integer as BigInteger;
use smallvec::smallvec;

use crate::{
  alphabet::{Alphabet, Generator},
  error::{TraceError, TraceResult},
  foata::{self, Step},
  format::{DisplayForm, Formattable, Formatter},
  graph::{CliqueEnumeration, CliqueOracle, IndependenceGraph},
  independence::{format_relation, IndependenceRelation},
  logging::{log, Channel},
  normal_form::{self, Algorithm},
  series::{alternating_signs, RationalSeries, SeriesBackend},
  trace::{Run, RunVec, Trace},
};


pub(crate) struct MonoidInner {
  pub(crate) alphabet: Alphabet,
  pub(crate) independence: IndependenceRelation,

  // Memo tables for pure functions of a trace's run sequence. The two
  // normal-form algorithms memoize separately so that requesting one never
  // returns a result the other computed; that would defeat cross-validation.
  sort_forms: RefCell<FnvHashMap<RunVec, RunVec>>,
  stack_forms: RefCell<FnvHashMap<RunVec, RunVec>>,
  foata_forms: RefCell<FnvHashMap<RunVec, Vec<Step>>>,
  growth: RefCell<Vec<BigInteger>>,
}

impl MonoidInner {
  /// The memoized lexicographic normal form of `runs`, computed by the
  /// selection algorithm. Infallible, which lets trace equality and hashing
  /// use it.
  pub(crate) fn lex_runs(&self, runs: &RunVec) -> RunVec {
    if let Some(found) = self.sort_forms.borrow().get(runs) {
      return found.clone();
    }
    let canonical = normal_form::sorted_normal_form(&self.independence, runs);
    self.sort_forms.borrow_mut().insert(runs.clone(), canonical.clone());
    canonical
  }

  /// The memoized canonical form via the requested algorithm. The results
  /// are identical; each algorithm still keeps its own table, so the choice
  /// selects which algorithm actually runs.
  pub(crate) fn canonical_runs(&self, runs: &RunVec, algorithm: Algorithm) -> TraceResult<RunVec> {
    match algorithm {
      Algorithm::Sort => Ok(self.lex_runs(runs)),

      Algorithm::Stack => {
        if let Some(found) = self.stack_forms.borrow().get(runs) {
          return Ok(found.clone());
        }
        let canonical = normal_form::stack_normal_form(&self.independence, runs)?;
        self.stack_forms.borrow_mut().insert(runs.clone(), canonical.clone());
        Ok(canonical)
      }
    }
  }

  /// The memoized Foata step sequence of `runs`.
  pub(crate) fn foata_steps(&self, runs: &RunVec) -> TraceResult<Vec<Step>> {
    if let Some(found) = self.foata_forms.borrow().get(runs) {
      return Ok(found.clone());
    }
    let steps = foata::foata_steps(&self.independence, runs)?;
    self.foata_forms.borrow_mut().insert(runs.clone(), steps.clone());
    Ok(steps)
  }
}


/// A trace monoid: a free monoid quotiented by the commutation congruence of
/// an independence relation. Cloning shares the interior, so clones are the
/// same parent.
#[derive(Clone)]
pub struct TraceMonoid {
  pub(crate) inner: Rc<MonoidInner>,
}

impl TraceMonoid {
  /// A monoid on `alphabet_size` generators with default names `x0`, `x1`, …
  /// over the given independence pairs.
  pub fn new(alphabet_size: usize, independence_pairs: &[(Generator, Generator)])
    -> TraceResult<TraceMonoid>
  {
    let alphabet = Alphabet::with_size(alphabet_size);
    let independence =
        IndependenceRelation::new(alphabet_size, independence_pairs.iter().copied())?;
    Ok(Self::from_parts(alphabet, independence))
  }

  /// A monoid with explicit generator names and the independence relation
  /// given over names.
  pub fn with_names(names: &[&str], independence_pairs: &[(&str, &str)])
    -> TraceResult<TraceMonoid>
  {
    let alphabet = Alphabet::from_names(names)?;
    let independence = IndependenceRelation::from_named_pairs(&alphabet, independence_pairs)?;
    Ok(Self::from_parts(alphabet, independence))
  }

  fn from_parts(alphabet: Alphabet, independence: IndependenceRelation) -> TraceMonoid {
    log(
      Channel::Notice,
      3,
      format!("Constructed trace monoid on {} generators.", alphabet.len()).as_str()
    );
    TraceMonoid {
      inner: Rc::new(
        MonoidInner {
          alphabet,
          independence,
          sort_forms: RefCell::new(FnvHashMap::default()),
          stack_forms: RefCell::new(FnvHashMap::default()),
          foata_forms: RefCell::new(FnvHashMap::default()),
          growth: RefCell::new(Vec::new()),
        }
      )
    }
  }

  pub fn alphabet(&self) -> &Alphabet {
    &self.inner.alphabet
  }

  pub fn independence(&self) -> &IndependenceRelation {
    &self.inner.independence
  }

  /// The number of generators.
  pub fn rank(&self) -> usize {
    self.inner.alphabet.len()
  }

  // region Element construction

  pub fn identity(&self) -> Trace {
    Trace::from_runs(Rc::clone(&self.inner), std::iter::empty())
  }

  /// The trace of a single generator. Panics on an out-of-range index, like
  /// slice indexing.
  pub fn gen(&self, g: Generator) -> Trace {
    assert!((g as usize) < self.rank(), "generator index {} out of range", g);
    Trace::from_runs(Rc::clone(&self.inner), std::iter::once((g, 1)))
  }

  pub fn gens(&self) -> Vec<Trace> {
    (0..self.rank() as Generator).map(|g| self.gen(g)).collect()
  }

  /// A trace from a flat generator word.
  pub fn trace(&self, word: &[Generator]) -> Trace {
    for &g in word {
      assert!((g as usize) < self.rank(), "generator index {} out of range", g);
    }
    Trace::from_runs(Rc::clone(&self.inner), word.iter().map(|&g| (g, 1)))
  }

  /// A trace from an explicit run sequence.
  pub fn trace_from_runs(&self, runs: &[Run]) -> Trace {
    for &(g, _) in runs {
      assert!((g as usize) < self.rank(), "generator index {} out of range", g);
    }
    Trace::from_runs(Rc::clone(&self.inner), runs.iter().copied())
  }

  /// A trace from a sequence of generator names.
  pub fn trace_from_names(&self, names: &[&str]) -> TraceResult<Trace> {
    let mut word = Vec::with_capacity(names.len());
    for name in names {
      word.push(self.inner.alphabet.resolve(name)?);
    }
    Ok(self.trace(&word))
  }

  // endregion

  // region Growth series

  pub fn independence_graph(&self) -> IndependenceGraph {
    IndependenceGraph::new(&self.inner.independence)
  }

  /// Coefficient `k` counts the `k`-cliques of the independence graph.
  pub fn clique_polynomial(&self) -> Vec<BigInteger> {
    CliqueEnumeration.clique_polynomial(&self.independence_graph())
  }

  /// The dependence polynomial `D(t) = Σ (-1)^k c_k t^k`; the growth series
  /// is its reciprocal.
  pub fn dependence_polynomial(&self) -> Vec<BigInteger> {
    alternating_signs(&self.clique_polynomial())
  }

  /// The number of congruence classes of words of the given length.
  /// Expanded coefficients are memoized on the monoid.
  pub fn number_of_words(&self, length: usize) -> TraceResult<BigInteger> {
    {
      let growth = self.inner.growth.borrow();
      if length < growth.len() {
        return Ok(growth[length].clone());
      }
    }
    log(
      Channel::Debug,
      4,
      format!("Expanding growth series to {} coefficients.", length + 1).as_str()
    );
    let expanded =
        RationalSeries.reciprocal_coefficients(&self.dependence_polynomial(), length + 1)?;
    let mut growth = self.inner.growth.borrow_mut();
    *growth = expanded;
    Ok(growth[length].clone())
  }

  /// `number_of_words` through an injected series backend, bypassing the
  /// memo table.
  pub fn number_of_words_with<B>(&self, backend: &B, length: usize) -> TraceResult<BigInteger>
    where B: SeriesBackend
  {
    let expanded =
        backend.reciprocal_coefficients(&self.dependence_polynomial(), length + 1)?;
    expanded
        .get(length)
        .cloned()
        .ok_or(TraceError::InternalInvariant("series backend returned too few coefficients"))
  }

  /// Enumerates the canonical representative of every congruence class of
  /// the given length, without duplication. A canonical word `w` extends by
  /// a generator `s` only if `s` cannot commute left past a strictly greater
  /// letter: scanning `w` from the right, every letter independent of `s`
  /// must carry an index at most `s`, and the scan stops at the first
  /// dependent letter. Otherwise `w·s` is not canonical, and its class is
  /// reached from a different prefix instead.
  pub fn words(&self, length: usize) -> Vec<Trace> {
    if length == 0 {
      return vec![self.identity()];
    }
    let rank = self.rank() as Generator;
    let mut layer: Vec<RunVec> = (0..rank).map(|g| smallvec![(g, 1u32)]).collect();
    for _ in 1..length {
      let mut next: Vec<RunVec> = Vec::with_capacity(layer.len());
      for runs in &layer {
        's: for s in 0..rank {
          for &(g, _) in runs.iter().rev() {
            if self.inner.independence.dependent(g, s) {
              break;
            }
            if g > s {
              continue 's;
            }
          }
          let mut extended = runs.clone();
          match extended.last_mut() {
            Some(run) if run.0 == s => run.1 += 1,
            _ => extended.push((s, 1)),
          }
          next.push(extended);
        }
      }
      layer = next;
    }
    layer
        .into_iter()
        .map(|runs| Trace::from_runs(Rc::clone(&self.inner), runs))
        .collect()
  }

  // endregion

  // region Unimplemented operations

  /// No closed-form growth series is implemented; use `number_of_words` for
  /// coefficient queries.
  pub fn growth_series(&self) -> TraceResult<Vec<BigInteger>> {
    Err(TraceError::Unsupported("growth_series"))
  }

  /// Left/right unification of trace equations is a future extension.
  pub fn solve_equation(&self, _left: &Trace, _right: &Trace) -> TraceResult<(Trace, Trace)> {
    Err(TraceError::Unsupported("solve_equation"))
  }

  // endregion
}

impl Formattable for TraceMonoid {
  fn format(&self, formatter: &Formatter) -> String {
    let alphabet = &self.inner.alphabet;
    let generator_names = (0..self.rank() as Generator)
        .map(|g| alphabet.name(g))
        .collect::<Vec<_>>()
        .join(", ");
    let relation = format_relation(&self.inner.independence, alphabet, formatter);
    match formatter.form {
      DisplayForm::Input => {
        format!(
          "Trace monoid on {} generators ({}) over independence relation {}.",
          self.rank(),
          generator_names,
          relation
        )
      }

      DisplayForm::Latex => {
        format!("<{} | {}>", generator_names, relation)
      }
    }
  }
}

display_formattable_impl!(TraceMonoid);
