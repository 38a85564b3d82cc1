//! Analysis modules.
//!
//! Reductions over the clone store shared by the collector and the
//! visualizer.

pub mod aggregator;

pub use aggregator::*;
