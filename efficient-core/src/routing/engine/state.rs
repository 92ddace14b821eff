use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

/// Heap entry: a node keyed by the label value it was pushed with
#[derive(Copy, Clone, Debug)]
pub(super) struct State {
    pub(super) key: f64,
    pub(super) node: NodeIndex,
}

// Min-heap by key, lower node index first on ties
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}
