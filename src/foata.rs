/*!

The Foata normal form decomposes a trace into an ordered sequence of
**steps**: maximal sets of pairwise-independent generator occurrences that
fire "simultaneously". Each step is one causal generation of the induced
partial order, so the decomposition exposes the maximal concurrency of the
represented execution.

The decomposition drives the same per-generator marker stacks as the
marker-stack normal form. The difference is the drain discipline: each round
first collects *every* generator whose top marker is ready into one step, and
only then resolves the blocking obligations of the generators that fired. A
round that fires nothing terminates the process.

*/

use smallvec::SmallVec;

use crate::{
  alphabet::Generator,
  error::TraceResult,
  format::{DisplayForm, Formattable, Formatter},
  independence::IndependenceRelation,
  normal_form::{build_marker_stacks, drained, pop_marker, resolve_blocked, Marker},
  trace::{Run, Trace},
};


/// One concurrency step: distinct, pairwise-independent generators in
/// ascending index order. The order within a step is insignificant; the
/// occurrences are declared concurrent.
pub type Step = SmallVec<[Generator; 4]>;

/// Computes the step sequence of a trace given by `runs`. Concatenating the
/// steps in order and run-length merging yields a trace congruent to the
/// input.
pub(crate) fn foata_steps(
  independence: &IndependenceRelation,
  runs: &[Run]
) -> TraceResult<Vec<Step>>
{
  let (present, mut stacks) = build_marker_stacks(independence, runs);
  let mut steps: Vec<Step> = Vec::new();

  loop {
    // Collect everything that can fire this round before resolving anything:
    // a firing must not unblock a dependent generator within the same step.
    let mut step: Step = SmallVec::new();
    for &g in &present {
      if matches!(stacks[&g].last(), Some(Marker::Ready)) {
        pop_marker(&mut stacks, g, Marker::Ready)?;
        step.push(g);
      }
    }
    if step.is_empty() {
      break;
    }
    for &g in &step {
      resolve_blocked(independence, &present, &mut stacks, g)?;
    }
    steps.push(step);
  }

  drained(&stacks)?;
  Ok(steps)
}


/// A trace annotated with its step decomposition.
#[derive(Clone, Debug)]
pub struct FoataNormalForm {
  trace: Trace,
  steps: Vec<Step>,
}

impl FoataNormalForm {
  pub(crate) fn new(trace: Trace, steps: Vec<Step>) -> FoataNormalForm {
    FoataNormalForm {
      trace,
      steps
    }
  }

  pub fn steps(&self) -> &[Step] {
    &self.steps
  }

  pub fn step_count(&self) -> usize {
    self.steps.len()
  }

  /// The trace this form was computed from.
  pub fn source(&self) -> &Trace {
    &self.trace
  }

  /// Reassembles a trace by expanding each step in ascending generator order
  /// and run-length merging. The result is congruent to the source trace.
  pub fn to_trace(&self) -> Trace {
    let monoid = std::rc::Rc::clone(&self.trace.monoid);
    Trace::from_runs(
      monoid,
      self.steps.iter().flat_map(|step| step.iter().map(|&g| (g, 1)))
    )
  }
}

impl Formattable for FoataNormalForm {
  fn format(&self, formatter: &Formatter) -> String {
    if self.steps.is_empty() {
      return "1".to_string();
    }
    let alphabet = &self.trace.monoid.alphabet;
    let step_body = |step: &Step| {
      step.iter().map(|&g| alphabet.name(g)).collect::<Vec<_>>().concat()
    };
    match formatter.form {
      DisplayForm::Input => {
        self.steps
            .iter()
            .map(|step| format!("({})", step_body(step)))
            .collect::<Vec<_>>()
            .concat()
      }

      DisplayForm::Latex => {
        self.steps
            .iter()
            .map(|step| format!("\\({}\\)", step_body(step)))
            .collect::<Vec<_>>()
            .concat()
      }
    }
  }
}

display_formattable_impl!(FoataNormalForm);


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{monoid::TraceMonoid, trace::merge_runs};

  // Alphabet {a=0, b=1, c=2}, independence {(a, c)}.
  fn worked_example() -> TraceMonoid {
    TraceMonoid::with_names(&["a", "b", "c"], &[("a", "c")]).unwrap()
  }

  fn all_words(rank: Generator, length: usize) -> Vec<Vec<Generator>> {
    if length == 0 {
      return vec![vec![]];
    }
    let mut words = Vec::new();
    for shorter in all_words(rank, length - 1) {
      for g in 0..rank {
        let mut word = shorter.clone();
        word.push(g);
        words.push(word);
      }
    }
    words
  }

  #[test]
  fn worked_example_steps() {
    let monoid = worked_example();
    let form = monoid.trace(&[0, 2, 1]).foata_normal_form().unwrap();
    let steps: Vec<Vec<Generator>> =
        form.steps().iter().map(|step| step.to_vec()).collect();
    assert_eq!(steps, vec![vec![0, 2], vec![1]]);
    assert_eq!(form.to_string(), "(ac)(b)");
    assert_eq!(form.format(&Formatter::from(DisplayForm::Latex)), "\\(ac\\)\\(b\\)");
  }

  #[test]
  fn repeated_generator_never_shares_a_step() {
    let monoid = worked_example();
    let form = monoid.trace(&[0, 0]).foata_normal_form().unwrap();
    let steps: Vec<Vec<Generator>> =
        form.steps().iter().map(|step| step.to_vec()).collect();
    assert_eq!(steps, vec![vec![0], vec![0]]);
  }

  #[test]
  fn identity_has_no_steps() {
    let monoid = worked_example();
    let form = monoid.identity().foata_normal_form().unwrap();
    assert_eq!(form.step_count(), 0);
    assert_eq!(form.to_string(), "1");
  }

  #[test]
  fn steps_are_pairwise_independent() {
    let monoid = worked_example();
    let relation = monoid.independence();
    for word in all_words(3, 4) {
      let form = monoid.trace(&word).foata_normal_form().unwrap();
      for step in form.steps() {
        for (i, &g) in step.iter().enumerate() {
          for &h in &step[i + 1..] {
            assert!(relation.independent(g, h), "step {:?} in word {:?}", step, word);
          }
        }
      }
    }
  }

  #[test]
  fn reassembly_is_congruent() {
    let monoid = worked_example();
    for word in all_words(3, 4) {
      let trace = monoid.trace(&word);
      let reassembled = trace.foata_normal_form().unwrap().to_trace();
      assert_eq!(reassembled, trace, "word {:?}", word);
    }
  }

  #[test]
  fn steps_partition_the_occurrences() {
    let monoid = worked_example();
    for word in all_words(3, 4) {
      let trace = monoid.trace(&word);
      let form = trace.foata_normal_form().unwrap();
      let occurrence_count: usize = form.steps().iter().map(|step| step.len()).sum();
      assert_eq!(occurrence_count, trace.length());
    }
  }

  #[test]
  fn reassembly_is_congruent_on_chained_independence() {
    // Chained, non-transitive independence over four generators.
    let monoid = TraceMonoid::new(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
    for word in all_words(4, 3) {
      let trace = monoid.trace(&word);
      let form = trace.foata_normal_form().unwrap();
      assert_eq!(form.to_trace(), trace, "word {:?}", word);
      let occurrence_count: usize = form.steps().iter().map(|step| step.len()).sum();
      assert_eq!(occurrence_count, trace.length());
    }
  }

  #[test]
  fn decomposition_respects_congruence() {
    let monoid = worked_example();
    let relation = monoid.independence();
    // Congruent linearizations decompose into identical step sequences.
    let left = foata_steps(relation, &merge_runs([(2, 1), (0, 1), (1, 1)].into_iter())).unwrap();
    let right = foata_steps(relation, &merge_runs([(0, 1), (2, 1), (1, 1)].into_iter())).unwrap();
    assert_eq!(left, right);
  }
}
