/// Compressed (CSR) adjacency over an edge list.
///
/// Every edge `e = (a, b)` is recorded under both endpoints, so
/// `neighbors(a)` yields `(b, e)` and `neighbors(b)` yields `(a, e)`.
/// Edges are listed per node in ascending edge order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdjacencyList {
    offsets: Vec<usize>,
    nodes: Vec<usize>,
    edges: Vec<usize>,
}

impl AdjacencyList {
    /// Builds the list from parallel endpoint arrays.
    ///
    /// # Panics
    ///
    /// Panics if an endpoint is not below `node_count`.
    pub fn new(node_count: usize, nodes1: &[usize], nodes2: &[usize]) -> Self {
        debug_assert_eq!(nodes1.len(), nodes2.len());
        let edge_count = nodes1.len().min(nodes2.len());

        let mut offsets = vec![0usize; node_count + 1];
        for e in 0..edge_count {
            offsets[nodes1[e] + 1] += 1;
            offsets[nodes2[e] + 1] += 1;
        }
        for i in 0..node_count {
            offsets[i + 1] += offsets[i];
        }

        let mut fill = offsets.clone();
        let mut nodes = vec![0usize; edge_count * 2];
        let mut edges = vec![0usize; edge_count * 2];
        for e in 0..edge_count {
            let (a, b) = (nodes1[e], nodes2[e]);

            let slot = fill[a];
            nodes[slot] = b;
            edges[slot] = e;
            fill[a] += 1;

            let slot = fill[b];
            nodes[slot] = a;
            edges[slot] = e;
            fill[b] += 1;
        }

        Self {
            offsets,
            nodes,
            edges,
        }
    }

    pub fn node_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn degree(&self, node: usize) -> usize {
        self.offsets[node + 1] - self.offsets[node]
    }

    /// `(other node, edge index)` pairs incident to `node`.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let range = self.offsets[node]..self.offsets[node + 1];
        self.nodes[range.clone()]
            .iter()
            .copied()
            .zip(self.edges[range].iter().copied())
    }
}
