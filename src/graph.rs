/*!

Graph machinery for the combinatorial core.

`DiGraph` is a plain directed graph over `0..vertex_count` with an edge set,
enough to build a trace's dependency graph (the precedence DAG over letter
occurrences) and its Hasse diagram (the transitive reduction of the induced
partial order).

`IndependenceGraph` is the undirected graph over *generators* with an edge
per independent pair. It exists for enumerative purposes only: its clique
polynomial drives the growth series through the Cartier–Foata identity. The
polynomial is obtained through the `CliqueOracle` seam so that the counting
strategy can be swapped out; the default `CliqueEnumeration` grows cliques by
a DFS over ascending vertex indices, which counts each clique exactly once.

*/

use fnv::FnvHashSet;
use rug::Integer as BigInteger;

use crate::{
  alphabet::Generator,
  independence::IndependenceRelation,
};


// region DiGraph

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiGraph {
  vertex_count: usize,
  edges: FnvHashSet<(usize, usize)>,
}

impl DiGraph {
  pub fn new(vertex_count: usize) -> DiGraph {
    DiGraph {
      vertex_count,
      edges: FnvHashSet::default()
    }
  }

  pub fn vertex_count(&self) -> usize {
    self.vertex_count
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  pub fn add_edge(&mut self, source: usize, target: usize) {
    debug_assert!(source < self.vertex_count && target < self.vertex_count);
    self.edges.insert((source, target));
  }

  pub fn has_edge(&self, source: usize, target: usize) -> bool {
    self.edges.contains(&(source, target))
  }

  /// Returns whether the edge was present.
  pub fn remove_edge(&mut self, source: usize, target: usize) -> bool {
    self.edges.remove(&(source, target))
  }

  /// The edge list in sorted order.
  pub fn edges(&self) -> Vec<(usize, usize)> {
    let mut edges: Vec<_> = self.edges.iter().copied().collect();
    edges.sort_unstable();
    edges
  }

  /// Reachability closure: an edge `u → v` for every nonempty path from `u`
  /// to `v`.
  pub fn transitive_closure(&self) -> DiGraph {
    let mut closure = self.clone();
    for via in 0..self.vertex_count {
      for source in 0..self.vertex_count {
        if !closure.has_edge(source, via) {
          continue;
        }
        for target in 0..self.vertex_count {
          if closure.has_edge(via, target) {
            closure.add_edge(source, target);
          }
        }
      }
    }
    closure
  }

  /// Removes every edge `u → v` for which some intermediate `w` has both
  /// `u → w` and `w → v`. Applied to a transitively closed DAG this yields
  /// its unique transitive reduction.
  pub fn transitive_reduction(&self) -> DiGraph {
    let mut reduced = self.clone();
    for (source, target) in self.edges() {
      for via in 0..self.vertex_count {
        if via != source
            && via != target
            && self.has_edge(source, via)
            && self.has_edge(via, target)
        {
          reduced.remove_edge(source, target);
          break;
        }
      }
    }
    reduced
  }
}

/// The precedence DAG of a linearization: vertices are occurrence positions,
/// with an edge `i → j` for `i < j` exactly when the occurrences carry
/// dependent generators (same-generator pairs included, since dependence is
/// reflexive). Its transitive closure is the happens-before relation of the
/// trace, the same for every congruent linearization up to relabeling.
pub(crate) fn dependency_graph(
  independence: &IndependenceRelation,
  word: &[Generator]
) -> DiGraph
{
  let mut graph = DiGraph::new(word.len());
  for i in 0..word.len() {
    for j in (i + 1)..word.len() {
      if independence.dependent(word[i], word[j]) {
        graph.add_edge(i, j);
      }
    }
  }
  graph
}

// endregion


// region IndependenceGraph

/// The undirected graph over generators with an edge per independent pair.
#[derive(Clone, Debug)]
pub struct IndependenceGraph {
  vertex_count: usize,
  neighbors: Vec<FnvHashSet<Generator>>,
}

impl IndependenceGraph {
  pub fn new(relation: &IndependenceRelation) -> IndependenceGraph {
    let vertex_count = relation.alphabet_size();
    let mut neighbors = vec![FnvHashSet::default(); vertex_count];
    for (g, h) in relation.pairs() {
      neighbors[g as usize].insert(h);
      neighbors[h as usize].insert(g);
    }
    IndependenceGraph {
      vertex_count,
      neighbors
    }
  }

  pub fn vertex_count(&self) -> usize {
    self.vertex_count
  }

  pub fn edge_count(&self) -> usize {
    self.neighbors.iter().map(|adjacent| adjacent.len()).sum::<usize>() / 2
  }

  pub fn adjacent(&self, g: Generator, h: Generator) -> bool {
    self.neighbors[g as usize].contains(&h)
  }

  /// The edge list, each unordered pair once, sorted.
  pub fn edges(&self) -> Vec<(Generator, Generator)> {
    let mut edges = Vec::with_capacity(self.edge_count());
    for (g, adjacent) in self.neighbors.iter().enumerate() {
      for &h in adjacent {
        if (g as Generator) < h {
          edges.push((g as Generator, h));
        }
      }
    }
    edges.sort_unstable();
    edges
  }
}

/// The clique-polynomial collaborator: coefficient `k` counts the `k`-element
/// cliques, with `c₀ = 1` for the empty clique.
pub trait CliqueOracle {
  fn clique_polynomial(&self, graph: &IndependenceGraph) -> Vec<BigInteger>;
}

/// The default oracle: DFS clique growth in ascending vertex order.
pub struct CliqueEnumeration;

impl CliqueEnumeration {
  fn count_extensions(
    graph: &IndependenceGraph,
    candidates: &[Generator],
    size: usize,
    counts: &mut [BigInteger]
  )
  {
    // The clique built so far is itself counted here; the root call counts
    // the empty clique.
    counts[size] += 1;
    for (i, &v) in candidates.iter().enumerate() {
      let extended: Vec<Generator> = candidates[i + 1..]
          .iter()
          .copied()
          .filter(|&u| graph.adjacent(v, u))
          .collect();
      Self::count_extensions(graph, &extended, size + 1, counts);
    }
  }
}

impl CliqueOracle for CliqueEnumeration {
  fn clique_polynomial(&self, graph: &IndependenceGraph) -> Vec<BigInteger> {
    let vertex_count = graph.vertex_count();
    let mut counts = vec![BigInteger::new(); vertex_count + 1];
    let vertices: Vec<Generator> = (0..vertex_count as Generator).collect();
    Self::count_extensions(graph, &vertices, 0, &mut counts);
    // Trim the sizes beyond the largest clique.
    while counts.len() > 1 && counts[counts.len() - 1] == 0 {
      counts.pop();
    }
    counts
  }
}

// endregion


#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::TraceResult;

  // Alphabet {a=0, b=1, c=2}, independence {(a, c)}.
  fn worked_relation() -> IndependenceRelation {
    IndependenceRelation::new(3, vec![(0, 2)]).unwrap()
  }

  fn big(values: &[i32]) -> Vec<BigInteger> {
    values.iter().map(|&v| BigInteger::from(v)).collect()
  }

  #[test]
  fn dependency_graph_of_worked_example() {
    let relation = worked_relation();
    // a c b: a–c independent, both depend on b.
    let graph = dependency_graph(&relation, &[0, 2, 1]);
    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edges(), vec![(0, 2), (1, 2)]);
  }

  #[test]
  fn graph_invariance_across_linearizations() {
    let relation = worked_relation();
    // b a c ≡ b c a; the happens-before closures coincide.
    let left = dependency_graph(&relation, &[1, 0, 2]).transitive_closure();
    let right = dependency_graph(&relation, &[1, 2, 0]).transitive_closure();
    assert_eq!(left.edges(), right.edges());

    let left = dependency_graph(&relation, &[2, 0, 1]).transitive_closure();
    let right = dependency_graph(&relation, &[0, 2, 1]).transitive_closure();
    assert_eq!(left.edges(), right.edges());
  }

  #[test]
  fn repeated_generators_chain() {
    let relation = worked_relation();
    let graph = dependency_graph(&relation, &[0, 0]);
    assert_eq!(graph.edges(), vec![(0, 1)]);
  }

  #[test]
  fn hasse_prunes_transitive_edges() {
    // All three generators pairwise dependent: a chain.
    let relation = IndependenceRelation::new(3, vec![]).unwrap();
    let graph = dependency_graph(&relation, &[0, 1, 2]);
    assert_eq!(graph.edges(), vec![(0, 1), (0, 2), (1, 2)]);
    let hasse = graph.transitive_closure().transitive_reduction();
    assert_eq!(hasse.edges(), vec![(0, 1), (1, 2)]);
  }

  #[test]
  fn closure_supplies_implied_edges() {
    // a–c independent: the 0 → 2 precedence in "a b c" only exists through b.
    let relation = worked_relation();
    let graph = dependency_graph(&relation, &[0, 1, 2]);
    assert_eq!(graph.edges(), vec![(0, 1), (1, 2)]);
    let closure = graph.transitive_closure();
    assert_eq!(closure.edges(), vec![(0, 1), (0, 2), (1, 2)]);
    let hasse = closure.transitive_reduction();
    assert_eq!(hasse.edges(), vec![(0, 1), (1, 2)]);
  }

  #[test]
  fn clique_polynomial_of_worked_example() {
    let graph = IndependenceGraph::new(&worked_relation());
    assert_eq!(graph.edges(), vec![(0, 2)]);
    // Empty clique, three vertices, one edge.
    assert_eq!(CliqueEnumeration.clique_polynomial(&graph), big(&[1, 3, 1]));
  }

  #[test]
  fn clique_polynomial_of_edgeless_graph() {
    let relation = IndependenceRelation::new(4, vec![]).unwrap();
    let graph = IndependenceGraph::new(&relation);
    assert_eq!(CliqueEnumeration.clique_polynomial(&graph), big(&[1, 4]));
  }

  #[test]
  fn clique_polynomial_of_complete_graph() -> TraceResult<()> {
    // All pairs independent over 3 generators: binomial coefficients.
    let relation = IndependenceRelation::new(3, vec![(0, 1), (0, 2), (1, 2)])?;
    let graph = IndependenceGraph::new(&relation);
    assert_eq!(CliqueEnumeration.clique_polynomial(&graph), big(&[1, 3, 3, 1]));
    Ok(())
  }
}
