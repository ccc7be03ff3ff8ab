//! Leaf sequence construction
//!
//! Samples the evaluator at every hundredth of a z-score over a closed range
//! and records each sample under its two-decimal key.

use crate::cdf::CdfEvaluator;
use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Mapping from two-decimal z-score key to leaf index
pub type ZScoreMap = HashMap<String, usize>;

/// Distance from an integer number of hundredths still treated as on-grid
const GRID_TOLERANCE: f64 = 1e-6;

/// One sampled z-score and its cumulative probability
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    /// Canonical key, formatted to two decimals
    pub key: String,
    /// Numeric z-score
    pub z_score: f64,
    /// Cumulative probability Φ(z_score)
    pub percentage: f64,
}

/// A closed range of z-scores expressed in hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZRange {
    pub start: i32,
    pub end: i32,
}

impl ZRange {
    /// [-4.00, 4.00]
    pub const STANDARD: ZRange = ZRange {
        start: -400,
        end: 400,
    };

    /// A range that produces no samples.
    #[cfg(test)]
    pub(crate) const EMPTY: ZRange = ZRange { start: 1, end: 0 };

    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Format a z-score as its lookup key.
///
/// Returns `None` for values that do not sit on the 0.01 grid, so that a
/// value like 1.005 is not silently rounded onto a neighbouring sample.
pub fn grid_key(z_score: f64) -> Option<String> {
    if !z_score.is_finite() {
        return None;
    }
    let hundredths = z_score * 100.0;
    let rounded = hundredths.round();
    if (hundredths - rounded).abs() > GRID_TOLERANCE {
        return None;
    }
    Some(format_hundredths(rounded))
}

fn format_hundredths(hundredths: f64) -> String {
    // Adding 0.0 turns -0.0 into 0.0 so the key is never "-0.00"
    format!("{:.2}", hundredths / 100.0 + 0.0)
}

/// Evaluate every sample in `range` and build the ordered leaves plus the
/// key index.
pub fn build_leaves<E>(range: ZRange, evaluator: &E) -> (Vec<LeafNode>, ZScoreMap)
where
    E: CdfEvaluator + ?Sized,
{
    let percentages = evaluate_range(range, evaluator);

    let mut leaves = Vec::with_capacity(percentages.len());
    let mut index = ZScoreMap::with_capacity(percentages.len());

    for (offset, percentage) in percentages.into_iter().enumerate() {
        let hundredths = range.start + offset as i32;
        let key = format_hundredths(f64::from(hundredths));
        index.insert(key.clone(), leaves.len());
        leaves.push(LeafNode {
            key,
            z_score: f64::from(hundredths) / 100.0,
            percentage,
        });
    }

    (leaves, index)
}

/// Evaluate every sample of `range` in order on the current thread.
#[cfg_attr(feature = "parallel", allow(dead_code))]
fn evaluate_serial<E>(range: ZRange, evaluator: &E) -> Vec<f64>
where
    E: CdfEvaluator + ?Sized,
{
    (range.start..=range.end)
        .map(|h| evaluator.cdf(f64::from(h) / 100.0))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_range<E>(range: ZRange, evaluator: &E) -> Vec<f64>
where
    E: CdfEvaluator + ?Sized,
{
    evaluate_serial(range, evaluator)
}

#[cfg(feature = "parallel")]
fn evaluate_range<E>(range: ZRange, evaluator: &E) -> Vec<f64>
where
    E: CdfEvaluator + ?Sized,
{
    (range.start..=range.end)
        .into_par_iter()
        .map(|h| evaluator.cdf(f64::from(h) / 100.0))
        .collect()
}
