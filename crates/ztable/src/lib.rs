//! ztable - Standard normal z-score lookup table
//!
//! Builds Φ(z) for every z in [-4.00, 4.00] at 0.01 resolution and answers
//! two queries:
//!
//! - **find_percentage**: exact lookup of the cumulative probability below a
//!   z-score
//! - **find_z_score**: the sampled z-score whose cumulative probability is
//!   closest to a given percentage
//!
//! # Design
//!
//! The inverse query descends a bucketed binary tree built over the leaf
//! percentages to reach an approximate starting leaf, then finishes with a
//! short linear scan. The tree only ever narrows the scan; results do not
//! depend on the bucket size.
//!
//! ```
//! use ztable::{ZTable, ZTableOptions};
//!
//! let table = ZTable::new(Some(&ZTableOptions::with_bucket_size(10)));
//! assert!((table.find_percentage(0.0) - 0.5).abs() < 1e-12);
//! assert_eq!(table.find_z_score(0.5).unwrap(), 0.0);
//! ```

pub mod cdf;
pub mod config;
pub mod error;
pub mod leaf;
pub mod table;
pub mod tree;

pub use cdf::*;
pub use config::*;
pub use error::*;
pub use leaf::*;
pub use table::*;
pub use tree::*;
