//! Frequency histograms over line edge coordinates.

use std::collections::BTreeMap;

/// An edge coordinate and how many lines share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeCount {
    pub edge: i32,
    pub count: usize,
}

/// Occurrence counts of distinct edge coordinates, kept in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeHistogram {
    bins: BTreeMap<i32, usize>,
}

impl EdgeHistogram {
    /// Count every edge in `edges`.
    pub fn from_edges(edges: impl IntoIterator<Item = i32>) -> Self {
        let mut bins = BTreeMap::new();
        for edge in edges {
            *bins.entry(edge).or_insert(0) += 1;
        }
        Self { bins }
    }

    /// Occurrences of `edge`.
    pub fn count(&self, edge: i32) -> usize {
        self.bins.get(&edge).copied().unwrap_or(0)
    }

    /// Total number of edges counted.
    pub fn total(&self) -> usize {
        self.bins.values().sum()
    }

    /// Number of distinct edges.
    pub fn distinct(&self) -> usize {
        self.bins.len()
    }

    /// Smallest edge seen.
    pub fn min(&self) -> Option<i32> {
        self.bins.keys().next().copied()
    }

    /// Bins holding more than `min_count` occurrences, in ascending edge order.
    pub fn populated(&self, min_count: usize) -> impl DoubleEndedIterator<Item = EdgeCount> + '_ {
        self.bins
            .iter()
            .filter(move |&(_, &count)| count > min_count)
            .map(|(&edge, &count)| EdgeCount { edge, count })
    }

    /// The `n` most frequent edges, ties broken by the smaller edge.
    pub fn most_common(&self, n: usize) -> Vec<EdgeCount> {
        let mut all: Vec<EdgeCount> = self.populated(0).collect();
        all.sort_by(|a, b| b.count.cmp(&a.count).then(a.edge.cmp(&b.edge)));
        all.truncate(n);
        all
    }
}
