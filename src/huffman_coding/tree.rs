//! Greedy Huffman tree construction.
//!
//! Nodes live in an arena (`Vec<Node>`) and point at each other by index, so the parent
//! links used to read codes back out never own anything.
//!
//! The active set repeatedly gives up its two lowest weight nodes, which are joined under a
//! new internal node that goes back in. Among equal weights the node inserted last leaves
//! first. Both merge strategies follow that rule, so they build the same tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::{Display, Formatter};

use log::{debug, log_enabled, trace, Level};
use rustc_hash::FxHashMap;

use super::symbol::Symbol;
use crate::error::{HuffError, Result};
use crate::tools::freq_count::{freqs, SymbolCount};

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Leaves keep their symbol. Internal nodes are numbered by merge order, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label<S> {
    Symbol(S),
    Merge(u32),
}

impl<S: Symbol> Display for Label<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Symbol(s) => write!(f, "{:?}", s),
            Label::Merge(k) => write!(f, "N{}", k),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node<S> {
    pub label: Label<S>,
    pub weight: u64,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl<S> Node<S> {
    fn leaf(symbol: S, weight: u64) -> Self {
        Node {
            label: Label::Symbol(symbol),
            weight,
            left: None,
            right: None,
            parent: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// How the two lowest weight nodes are picked at each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Keep the active set sorted by descending weight and pop from the tail.
    #[default]
    Sorted,
    /// Keep the active set in a binary min-heap.
    Heap,
}

/// Heap entry. Lowest weight comes out first, then the highest insertion sequence.
#[derive(Debug, PartialEq, Eq)]
struct Pending {
    weight: u64,
    seq: usize,
    id: NodeId,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
pub struct HuffmanTree<S> {
    nodes: Vec<Node<S>>,
    root: NodeId,
    locations: FxHashMap<S, NodeId>,
}

impl<S: Symbol> HuffmanTree<S> {
    /// Count the symbols in `data` and build the tree for them.
    pub fn build(data: &[S], strategy: MergeStrategy) -> Result<Self> {
        let counts = freqs(data)?;
        Self::from_counts(&counts, strategy)
    }

    /// Build the tree for symbol counts listed in first-appearance order.
    pub fn from_counts(counts: &[SymbolCount<S>], strategy: MergeStrategy) -> Result<Self> {
        if counts.is_empty() {
            return Err(HuffError::EmptyInput);
        }

        let mut tree = HuffmanTree {
            nodes: Vec::with_capacity(counts.len() * 2 - 1),
            root: NodeId(0),
            locations: FxHashMap::default(),
        };
        let mut leaves = Vec::with_capacity(counts.len());
        for c in counts {
            let id = tree.push(Node::leaf(c.symbol, c.count));
            tree.locations.insert(c.symbol, id);
            leaves.push(id);
        }

        tree.root = match strategy {
            MergeStrategy::Sorted => tree.merge_sorted(leaves)?,
            MergeStrategy::Heap => tree.merge_heap(leaves)?,
        };
        debug!(
            "Built a tree of {} nodes for {} symbols, root weight {}.",
            tree.nodes.len(),
            counts.len(),
            tree.node(tree.root).weight
        );
        Ok(tree)
    }

    fn merge_sorted(&mut self, mut active: Vec<NodeId>) -> Result<NodeId> {
        // Stable, so equal weights keep their order and the latest arrival sits nearest the tail
        active.sort_by(|a, b| self.node(*b).weight.cmp(&self.node(*a).weight));
        let mut merges = 0;
        loop {
            let (a, b) = match (active.pop(), active.pop()) {
                (Some(a), Some(b)) => (a, b),
                (Some(root), None) => break Ok(root),
                _ => break Err(HuffError::EmptyInput),
            };
            merges += 1;
            let joined = self.join(a, b, merges);
            active.push(joined);
            active.sort_by(|a, b| self.node(*b).weight.cmp(&self.node(*a).weight));
            self.trace_active(active.iter().copied());
        }
    }

    fn merge_heap(&mut self, leaves: Vec<NodeId>) -> Result<NodeId> {
        let mut seq = leaves.len();
        let mut active = leaves
            .into_iter()
            .enumerate()
            .map(|(i, id)| Pending {
                weight: self.node(id).weight,
                seq: i,
                id,
            })
            .collect::<BinaryHeap<_>>();
        let mut merges = 0;
        loop {
            let (a, b) = match (active.pop(), active.pop()) {
                (Some(a), Some(b)) => (a.id, b.id),
                (Some(root), None) => break Ok(root.id),
                _ => break Err(HuffError::EmptyInput),
            };
            merges += 1;
            let joined = self.join(a, b, merges);
            active.push(Pending {
                weight: self.node(joined).weight,
                seq,
                id: joined,
            });
            seq += 1;
            if log_enabled!(Level::Trace) {
                // Ascending Pending order is heaviest first, the same view the sorted set gives
                let mut order = active.iter().collect::<Vec<_>>();
                order.sort();
                self.trace_active(order.into_iter().map(|p| p.id));
            }
        }
    }

    /// Make a new internal node over `a` (lightest) and `b`.
    fn join(&mut self, a: NodeId, b: NodeId, merge: u32) -> NodeId {
        let (wa, wb) = (self.node(a).weight, self.node(b).weight);
        let (left, right) = if wa <= wb { (a, b) } else { (b, a) };
        let id = self.push(Node {
            label: Label::Merge(merge),
            weight: wa + wb,
            left: Some(left),
            right: Some(right),
            parent: None,
        });
        self.nodes[a.0].parent = Some(id);
        self.nodes[b.0].parent = Some(id);
        id
    }

    fn push(&mut self, node: Node<S>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Log the active set as label:weight pairs, heaviest first.
    fn trace_active(&self, active: impl Iterator<Item = NodeId>) {
        if log_enabled!(Level::Trace) {
            let listing = active
                .map(|id| format!("{}:{}", self.node(id).label, self.node(id).weight))
                .collect::<Vec<_>>();
            trace!("{}", listing.join(" "));
        }
    }

    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Where each original symbol's leaf sits in the arena.
    pub fn locations(&self) -> &FxHashMap<S, NodeId> {
        &self.locations
    }

    /// Leaf for `symbol`, if the symbol was in the input.
    pub fn leaf(&self, symbol: &S) -> Option<NodeId> {
        self.locations.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges between a node and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            depth += 1;
            current = parent;
        }
        depth
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn aardvark_shape_test() {
        let tree = HuffmanTree::build(&chars("aardvark"), MergeStrategy::Sorted).unwrap();
        // 5 leaves and 4 merges
        assert_eq!(tree.len(), 9);
        let root = tree.node(tree.root());
        assert_eq!(root.weight, 8);
        assert_eq!(root.label, Label::Merge(4));
        assert!(root.parent.is_none());

        let depth = |c: char| tree.depth(tree.leaf(&c).unwrap());
        assert_eq!(depth('a'), 1);
        assert_eq!(depth('r'), 2);
        assert_eq!(depth('d'), 3);
        assert_eq!(depth('v'), 4);
        assert_eq!(depth('k'), 4);
    }

    #[test]
    fn internal_nodes_test() {
        let tree = HuffmanTree::build(&chars("abracadabra"), MergeStrategy::Sorted).unwrap();
        for i in 0..tree.len() {
            let node = tree.node(NodeId(i));
            if node.is_leaf() {
                assert!(matches!(node.label, Label::Symbol(_)));
                continue;
            }
            let (left, right) = (node.left.unwrap(), node.right.unwrap());
            let (l, r) = (tree.node(left), tree.node(right));
            assert_eq!(node.weight, l.weight + r.weight);
            assert!(l.weight <= r.weight);
            assert_eq!(l.parent, Some(NodeId(i)));
            assert_eq!(r.parent, Some(NodeId(i)));
        }
    }

    #[test]
    fn merge_labels_unique_test() {
        let tree = HuffmanTree::build(&chars("mississippi river"), MergeStrategy::Heap).unwrap();
        let mut labels = (0..tree.len())
            .filter_map(|i| match tree.node(NodeId(i)).label {
                Label::Merge(k) => Some(k),
                Label::Symbol(_) => None,
            })
            .collect::<Vec<_>>();
        labels.sort_unstable();
        let expected = (1..=labels.len() as u32).collect::<Vec<_>>();
        assert_eq!(labels, expected);
    }

    #[test]
    fn single_symbol_test() {
        let tree = HuffmanTree::build(&chars("aaaa"), MergeStrategy::Sorted).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.leaf(&'a'), Some(tree.root()));
        assert_eq!(tree.node(tree.root()).weight, 4);
    }

    #[test]
    fn strategies_agree_test() {
        let data = chars("she sells sea shells by the sea shore");
        let sorted = HuffmanTree::build(&data, MergeStrategy::Sorted).unwrap();
        let heap = HuffmanTree::build(&data, MergeStrategy::Heap).unwrap();
        assert_eq!(sorted.len(), heap.len());
        for (symbol, &leaf) in sorted.locations() {
            assert_eq!(sorted.depth(leaf), heap.depth(heap.leaf(symbol).unwrap()));
        }
    }

    #[test]
    fn empty_test() {
        let data: Vec<u8> = vec![];
        assert!(matches!(
            HuffmanTree::build(&data, MergeStrategy::Heap),
            Err(HuffError::EmptyInput)
        ));
        assert!(matches!(
            HuffmanTree::<u8>::from_counts(&[], MergeStrategy::Sorted),
            Err(HuffError::EmptyInput)
        ));
    }
}
