/*!

The error taxonomy of the crate. Every failure is a local, non-recoverable
validation failure surfaced immediately to the caller: the library performs no
I/O, so there is no transient-failure class, no retries, and no partial
results. `InternalInvariant` is special: it indicates an inconsistent
independence relation slipped past validation, which is a bug.

*/

use std::fmt;

use strum_macros::IntoStaticStr;


pub type TraceResult<T> = Result<T, TraceError>;

#[derive(Clone, Debug, PartialEq, Eq, IntoStaticStr)]
pub enum TraceError {
  /// An independence pair referenced an out-of-range generator or paired a
  /// generator with itself.
  InvalidRelation(String),
  /// An unrecognized normal-form algorithm selector.
  UnknownAlgorithm(String),
  /// A generator name with no index in the alphabet.
  UnknownGenerator(String),
  /// The same name given for two distinct generators.
  DuplicateGenerator(String),
  /// An operation that is explicitly out of scope.
  Unsupported(&'static str),
  /// A defensive internal check failed. Not reachable through a validated
  /// relation.
  InternalInvariant(&'static str),
}

impl TraceError {
  /// The bare variant name, mostly for terse log messages.
  pub fn name(&self) -> &'static str {
    self.into()
  }
}

impl fmt::Display for TraceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TraceError::InvalidRelation(message) => {
        write!(f, "invalid independence relation: {}", message)
      }
      TraceError::UnknownAlgorithm(name) => {
        write!(f, "unknown normal form algorithm: {:?}", name)
      }
      TraceError::UnknownGenerator(name) => {
        write!(f, "unknown generator: {:?}", name)
      }
      TraceError::DuplicateGenerator(name) => {
        write!(f, "duplicate generator name: {:?}", name)
      }
      TraceError::Unsupported(operation) => {
        write!(f, "unsupported operation: {}", operation)
      }
      TraceError::InternalInvariant(message) => {
        write!(f, "internal invariant violated: {}", message)
      }
    }
  }
}

impl std::error::Error for TraceError {}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn variant_names() {
    assert_eq!(TraceError::UnknownAlgorithm("frobnicate".into()).name(), "UnknownAlgorithm");
    assert_eq!(TraceError::Unsupported("solve_equation").name(), "Unsupported");
  }

  #[test]
  fn displays_detail() {
    let error = TraceError::InvalidRelation("pair (3, 3) is a self-pair".into());
    assert_eq!(error.to_string(), "invalid independence relation: pair (3, 3) is a self-pair");
  }
}
