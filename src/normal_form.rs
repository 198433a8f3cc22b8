/*!

# Normalization

Every congruence class of a trace monoid has a unique lexicographic normal
form: the least linearization of the class under the generator ordering. Two
interchangeable algorithms compute it.

The **sort** algorithm is a selection sort whose selection predicate is gated
by independence. A letter occurrence is *available* when every letter before
it in the remaining word commutes past it; the least minimal element of the
induced partial order is exactly the least available letter. Repeatedly
extracting it and run-length merging the emitted sequence yields the
lexicographic form. Note that a purely local rule fails here: an adjacent
swap of independent out-of-order letters can be necessary even when it makes
the word locally larger, whenever it unlocks a smaller letter further right.

The **stack** algorithm scans the word right to left, maintaining one marker
stack per generator: a `Ready` marker for each of the generator's own future
occurrences, and a `Blocked` marker for every occurrence of a *dependent*
generator that originally preceded it. A generator may fire (emit one
occurrence) only while its top marker is `Ready`; each firing pops one
`Blocked` obligation from every dependent partner. Always firing the least
ready generator makes the least admissible letter come first, which is
exactly the lexicographic form. The stacks encode, for every generator, the
count of dependent occurrences it must wait for, so a validated relation can
never underflow them; an underflow is reported as `InternalInvariant`.

*/

use fnv::FnvHashMap;
use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::{
  alphabet::Generator,
  error::{TraceError, TraceResult},
  independence::IndependenceRelation,
  trace::{merge_runs, Run, RunVec},
};


/// Selects which normal-form algorithm runs. The string forms mirror the
/// `alg` selector of the interactive interface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum Algorithm {
  #[strum(serialize = "sort")]
  Sort,
  #[strum(serialize = "stack")]
  Stack,
}

pub(crate) fn normal_form(
  independence: &IndependenceRelation,
  runs: &[Run],
  algorithm: Algorithm
) -> TraceResult<RunVec>
{
  match algorithm {
    Algorithm::Sort  => Ok(sorted_normal_form(independence, runs)),
    Algorithm::Stack => stack_normal_form(independence, runs),
  }
}


// region Selection algorithm

/// Independence-gated selection sort: repeatedly extracts the least letter
/// that is independent of every letter still before it. Same-generator pairs
/// are dependent, so only a generator's first remaining occurrence is ever
/// available.
pub(crate) fn sorted_normal_form(independence: &IndependenceRelation, runs: &[Run]) -> RunVec {
  let mut word: Vec<Generator> = Vec::new();
  for &(g, multiplicity) in runs {
    for _ in 0..multiplicity {
      word.push(g);
    }
  }

  let mut emitted: Vec<Generator> = Vec::with_capacity(word.len());
  while !word.is_empty() {
    // The first letter is always available, so the scan starts there.
    let mut least = 0;
    for i in 1..word.len() {
      if word[i] < word[least]
          && word[..i].iter().all(|&h| independence.independent(word[i], h))
      {
        least = i;
      }
    }
    emitted.push(word.remove(least));
  }
  merge_runs(emitted.into_iter().map(|g| (g, 1)))
}

// endregion


// region Marker-stack algorithm

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Marker {
  /// The generator's own occurrence, free to fire when on top.
  Ready,
  /// An obligation imposed by a preceding dependent occurrence.
  Blocked,
}

/// Builds the per-generator marker stacks from a right-to-left scan of the
/// runs. Returns the generators present in the word in ascending order
/// together with their stacks. Shared with the Foata decomposition, which
/// differs only in how it drains the stacks.
pub(crate) fn build_marker_stacks(
  independence: &IndependenceRelation,
  runs: &[Run]
) -> (Vec<Generator>, FnvHashMap<Generator, Vec<Marker>>)
{
  let mut present: Vec<Generator> = runs.iter().map(|&(g, _)| g).collect();
  present.sort_unstable();
  present.dedup();

  let mut stacks: FnvHashMap<Generator, Vec<Marker>> =
      present.iter().map(|&g| (g, Vec::new())).collect();

  for &(g, multiplicity) in runs.iter().rev() {
    if let Some(stack) = stacks.get_mut(&g) {
      for _ in 0..multiplicity {
        stack.push(Marker::Ready);
      }
    }
    for &h in &present {
      if h != g && independence.dependent(g, h) {
        if let Some(stack) = stacks.get_mut(&h) {
          for _ in 0..multiplicity {
            stack.push(Marker::Blocked);
          }
        }
      }
    }
  }

  (present, stacks)
}

/// Pops the top marker of `g`'s stack, which must be `expected`.
pub(crate) fn pop_marker(
  stacks: &mut FnvHashMap<Generator, Vec<Marker>>,
  g: Generator,
  expected: Marker
) -> TraceResult<()>
{
  match stacks.get_mut(&g).and_then(|stack| stack.pop()) {
    Some(marker) if marker == expected => Ok(()),
    _ => Err(TraceError::InternalInvariant("marker stack underflow: inconsistent independence relation")),
  }
}

/// After `fired` emits an occurrence, every dependent partner sheds one
/// blocking obligation.
pub(crate) fn resolve_blocked(
  independence: &IndependenceRelation,
  present: &[Generator],
  stacks: &mut FnvHashMap<Generator, Vec<Marker>>,
  fired: Generator
) -> TraceResult<()>
{
  for &h in present {
    if h != fired && independence.dependent(fired, h) {
      pop_marker(stacks, h, Marker::Blocked)?;
    }
  }
  Ok(())
}

pub(crate) fn drained(stacks: &FnvHashMap<Generator, Vec<Marker>>) -> TraceResult<()> {
  if stacks.values().any(|stack| !stack.is_empty()) {
    return Err(TraceError::InternalInvariant("marker stacks not drained: inconsistent independence relation"));
  }
  Ok(())
}

pub(crate) fn stack_normal_form(
  independence: &IndependenceRelation,
  runs: &[Run]
) -> TraceResult<RunVec>
{
  let (present, mut stacks) = build_marker_stacks(independence, runs);
  let mut emitted: Vec<Generator> = Vec::new();

  // Always fire the least ready generator. Restarting the scan after each
  // firing matters: resolving a blocked marker can make a smaller generator
  // ready, and it must fire before any larger one.
  loop {
    let next = present
        .iter()
        .copied()
        .find(|g| matches!(stacks[g].last(), Some(Marker::Ready)));
    let g = match next {
      Some(g) => g,
      None => break,
    };
    pop_marker(&mut stacks, g, Marker::Ready)?;
    emitted.push(g);
    resolve_blocked(independence, &present, &mut stacks, g)?;
  }

  drained(&stacks)?;
  Ok(merge_runs(emitted.into_iter().map(|g| (g, 1))))
}

// endregion
