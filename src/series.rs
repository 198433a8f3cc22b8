/*!

The formal-power-series collaborator for growth computations.

By the Cartier–Foata identity, the generating function counting congruence
classes by length is the rational series `P(t) = 1 / D(t)`, where
`D(t) = Σ (-1)^k c_k t^k` and `c_k` counts the `k`-cliques of the
independence graph. `D` always has constant term 1 (the empty clique), so its
reciprocal expands by the linear recurrence

```text
a₀ = 1,    aₙ = -Σ_{k≥1} d_k · a_{n-k}
```

on exact integers. The expansion sits behind the `SeriesBackend` seam so that
tests can cross-validate against brute-force stand-ins.

*/

use rug::Integer as BigInteger;

use crate::error::{TraceError, TraceResult};


pub trait SeriesBackend {
  /// The first `precision` coefficients of `1 / D(t)` for the polynomial
  /// denominator `D` given by its coefficient sequence.
  fn reciprocal_coefficients(
    &self,
    denominator: &[BigInteger],
    precision: usize
  ) -> TraceResult<Vec<BigInteger>>;
}

/// The default backend: expansion by the linear recurrence. Demands a unit
/// constant term, which every dependence polynomial has.
pub struct RationalSeries;

impl SeriesBackend for RationalSeries {
  fn reciprocal_coefficients(
    &self,
    denominator: &[BigInteger],
    precision: usize
  ) -> TraceResult<Vec<BigInteger>>
  {
    let constant = match denominator.first() {
      Some(constant) => constant,
      None => {
        return Err(TraceError::InternalInvariant("series denominator is empty"));
      }
    };
    if *constant != 1i32 && *constant != -1i32 {
      return Err(TraceError::InternalInvariant("series denominator must have a unit constant term"));
    }
    let negate = *constant == 1i32;
    let degree = denominator.len() - 1;

    let mut coefficients: Vec<BigInteger> = Vec::with_capacity(precision);
    for n in 0..precision {
      if n == 0 {
        // 1/d₀ = d₀ for a unit.
        coefficients.push(BigInteger::from(constant));
        continue;
      }
      let mut accumulator = BigInteger::new();
      for k in 1..=n.min(degree) {
        accumulator += &denominator[k] * &coefficients[n - k];
      }
      let value = if negate { -accumulator } else { accumulator };
      coefficients.push(value);
    }
    Ok(coefficients)
  }
}

/// The dependence polynomial `D(t) = Σ (-1)^k c_k t^k` from the clique
/// coefficients of the independence graph.
pub(crate) fn alternating_signs(coefficients: &[BigInteger]) -> Vec<BigInteger> {
  coefficients
      .iter()
      .enumerate()
      .map(|(k, coefficient)| {
        if k % 2 == 0 {
          BigInteger::from(coefficient)
        } else {
          BigInteger::from(-coefficient)
        }
      })
      .collect()
}
