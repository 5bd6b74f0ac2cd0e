//! Классификация зон по континентам.

pub mod classifier;
pub mod graph;
pub mod overlap;

pub use classifier::{Assignment, ContinentClassifier};
pub use graph::AreaGraph;
pub use overlap::{Overlap, find_overlaps};
