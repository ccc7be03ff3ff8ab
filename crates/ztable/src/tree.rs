//! Bucketed binary search tree over leaf percentages
//!
//! Leaves are grouped into buckets of `bucket_size`. Each complete bucket
//! contributes one boundary node carrying the percentage of its last leaf
//! and the index of its first leaf. Adjacent nodes are then merged pairwise,
//! each parent routing on the mean of its children, until one root remains.
//!
//! A trailing incomplete bucket, and the odd node left over at the end of
//! any merged layer, are dropped. Descent therefore only finds an
//! approximate starting point; the query engine finishes with a linear scan.

use crate::leaf::LeafNode;

/// A node of the search tree
///
/// Boundary nodes have no children and a meaningful `index`. Higher nodes
/// always have both children and `index` 0.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    pub value: f64,
    pub index: usize,
    pub left: Option<Box<SearchNode>>,
    pub right: Option<Box<SearchNode>>,
}

impl SearchNode {
    fn boundary(value: f64, index: usize) -> Self {
        Self {
            value,
            index,
            left: None,
            right: None,
        }
    }

    fn join(left: SearchNode, right: SearchNode) -> Self {
        Self {
            value: (left.value + right.value) / 2.0,
            index: 0,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Number of nodes on the longest root-to-boundary path
    pub fn depth(&self) -> usize {
        let left = self.left.as_ref().map_or(0, |n| n.depth());
        let right = self.right.as_ref().map_or(0, |n| n.depth());
        1 + left.max(right)
    }

    /// Number of boundary nodes reachable from this node
    pub fn boundary_count(&self) -> usize {
        if self.is_boundary() {
            return 1;
        }
        self.left.as_ref().map_or(0, |n| n.boundary_count())
            + self.right.as_ref().map_or(0, |n| n.boundary_count())
    }

    /// Walk towards `percentage` and return the boundary node reached.
    pub fn descend(&self, percentage: f64) -> &SearchNode {
        let mut node = self;
        loop {
            let next = if percentage > node.value {
                node.right.as_deref()
            } else if percentage <= node.value {
                node.left.as_deref()
            } else {
                None
            };
            match next {
                Some(child) => node = child,
                None => return node,
            }
        }
    }
}

/// One boundary node per complete bucket.
pub fn boundary_layer(leaves: &[LeafNode], bucket_size: usize) -> Vec<SearchNode> {
    if bucket_size == 0 {
        return Vec::new();
    }
    leaves
        .chunks_exact(bucket_size)
        .enumerate()
        .filter_map(|(bucket, chunk)| {
            chunk
                .last()
                .map(|last| SearchNode::boundary(last.percentage, bucket * bucket_size))
        })
        .collect()
}

/// Merge adjacent pairs until at most one node remains.
pub fn merge_layers(mut layer: Vec<SearchNode>) -> Option<SearchNode> {
    while layer.len() > 1 {
        let mut nodes = layer.into_iter();
        let mut parents = Vec::with_capacity(nodes.len() / 2);
        while let (Some(left), Some(right)) = (nodes.next(), nodes.next()) {
            parents.push(SearchNode::join(left, right));
        }
        layer = parents;
    }
    layer.pop()
}

/// Build the search tree for `leaves`, or `None` if no bucket is complete.
pub fn build_tree(leaves: &[LeafNode], bucket_size: usize) -> Option<SearchNode> {
    let boundaries = boundary_layer(leaves, bucket_size);
    tracing::trace!(
        "Built {} boundary nodes from {} leaves",
        boundaries.len(),
        leaves.len()
    );
    merge_layers(boundaries)
}
