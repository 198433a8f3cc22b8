#![allow(dead_code)]
/*!

The combinatorial core of trace monoids (Mazurkiewicz traces): words over a
finite alphabet quotiented by the commutation congruence of an independence
relation. Independent letters may swap freely; dependent letters keep their
relative order. The crate constructs canonical representatives of congruence
classes (two interchangeable algorithms), decomposes traces into maximal
concurrency steps (Foata normal form), builds the induced precedence DAG and
its Hasse diagram, and counts/enumerates congruence classes by length via
the clique polynomial of the independence graph.

*/

#[macro_use]
mod format;

mod alphabet;
mod error;
mod foata;
mod graph;
mod independence;
mod interner;
pub mod logging;
mod monoid;
mod normal_form;
mod series;
mod trace;

pub use rug::Integer as BigInteger;

pub use alphabet::{Alphabet, Generator};
pub use error::{TraceError, TraceResult};
pub use foata::{FoataNormalForm, Step};
pub use format::{DisplayForm, Formattable, Formatter};
pub use graph::{CliqueEnumeration, CliqueOracle, DiGraph, IndependenceGraph};
pub use independence::IndependenceRelation;
pub use monoid::TraceMonoid;
pub use normal_form::Algorithm;
pub use series::{RationalSeries, SeriesBackend};
pub use trace::{Run, RunVec, Trace};
