//! The z-table and its two queries
//!
//! A [`ZTable`] is built once and never mutated. Queries borrow it
//! immutably, so a table can be shared across threads without locking.

use crate::cdf::{CdfEvaluator, ErfCdf};
use crate::config::ZTableOptions;
use crate::error::{ZTableError, ZTableResult};
use crate::leaf::{build_leaves, grid_key, LeafNode, ZRange, ZScoreMap};
use crate::tree::{build_tree, SearchNode};

/// Standard normal lookup table over [-4.00, 4.00] at 0.01 resolution
#[derive(Debug, Clone)]
pub struct ZTable {
    leaves: Vec<LeafNode>,
    index: ZScoreMap,
    root: Option<SearchNode>,
    bucket_size: usize,
}

impl ZTable {
    /// Build a table with the closed-form evaluator.
    ///
    /// `None` uses default options.
    pub fn new(options: Option<&ZTableOptions>) -> Self {
        Self::with_evaluator(options, &ErfCdf)
    }

    /// Build a table, sampling cumulative probabilities from `evaluator`.
    pub fn with_evaluator<E>(options: Option<&ZTableOptions>, evaluator: &E) -> Self
    where
        E: CdfEvaluator + ?Sized,
    {
        Self::with_range(options, ZRange::STANDARD, evaluator)
    }

    pub(crate) fn with_range<E>(
        options: Option<&ZTableOptions>,
        range: ZRange,
        evaluator: &E,
    ) -> Self
    where
        E: CdfEvaluator + ?Sized,
    {
        let bucket_size = options.copied().unwrap_or_default().effective_bucket_size();
        let (leaves, index) = build_leaves(range, evaluator);
        let root = build_tree(&leaves, bucket_size);

        tracing::debug!(
            "Built z-table: {} leaves, bucket size {}, tree depth {}",
            leaves.len(),
            bucket_size,
            root.as_ref().map_or(0, SearchNode::depth)
        );

        Self {
            leaves,
            index,
            root,
            bucket_size,
        }
    }

    /// Cumulative probability below `z_score`.
    ///
    /// Returns 0.0 when `z_score` is not one of the sampled grid values.
    /// Inputs are not rounded onto the grid: 0.123 or 1.005 miss rather
    /// than resolving to 0.12 or 1.00. Values within 1e-6 of a hundredth,
    /// such as `0.1 + 0.2`, still hit. Use [`lookup_percentage`](Self::lookup_percentage) to tell a miss
    /// apart from a genuine probability.
    pub fn find_percentage(&self, z_score: f64) -> f64 {
        self.lookup_percentage(z_score).unwrap_or(0.0)
    }

    /// Cumulative probability below `z_score`, or `None` if it is off-grid
    /// or out of range.
    pub fn lookup_percentage(&self, z_score: f64) -> Option<f64> {
        let key = grid_key(z_score)?;
        let &i = self.index.get(&key)?;
        self.leaves.get(i).map(|leaf| leaf.percentage)
    }

    /// The sampled z-score whose percentage is closest to `percentage`.
    ///
    /// Values below the first sample resolve to -4.00 and values above the
    /// last to 4.00. Ties between two neighbours go to the lower z-score.
    pub fn find_z_score(&self, percentage: f64) -> ZTableResult<f64> {
        let Some(root) = self.root.as_ref() else {
            tracing::debug!("No search tree, cannot resolve percentage {}", percentage);
            return Err(ZTableError::z_score_not_found());
        };
        if percentage.is_nan() {
            return Err(ZTableError::z_score_not_found());
        }

        let mut start = root.descend(percentage).index;

        // Descent routes on averaged thresholds and may overshoot by a bucket
        while start > 0 && self.leaves.get(start).is_some_and(|l| percentage < l.percentage) {
            start -= 1;
        }

        if let Some(first) = self.leaves.first() {
            if start == 0 && percentage < first.percentage {
                return Ok(first.z_score);
            }
        }

        for (i, leaf) in self.leaves.iter().enumerate().skip(start) {
            if percentage == leaf.percentage {
                return Ok(leaf.z_score);
            }
            let Some(next) = self.leaves.get(i + 1) else {
                return Ok(leaf.z_score);
            };
            if percentage < next.percentage {
                let below = (percentage - leaf.percentage).abs();
                let above = (next.percentage - percentage).abs();
                return Ok(if below <= above {
                    leaf.z_score
                } else {
                    next.z_score
                });
            }
        }

        tracing::debug!("Scan from leaf {} did not resolve {}", start, percentage);
        Err(ZTableError::z_score_not_found())
    }

    /// Number of sampled z-scores
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Sampled leaves in ascending z-score order
    pub fn leaves(&self) -> &[LeafNode] {
        &self.leaves
    }

    /// Bucket size the search tree was built with
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// Depth of the search tree (0 if there is none)
    pub fn tree_depth(&self) -> usize {
        self.root.as_ref().map_or(0, SearchNode::depth)
    }

    /// Boundary nodes that survived the pairwise merge
    pub fn boundary_count(&self) -> usize {
        self.root.as_ref().map_or(0, SearchNode::boundary_count)
    }
}

impl Default for ZTable {
    fn default() -> Self {
        Self::new(None)
    }
}
