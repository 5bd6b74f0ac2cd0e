//! Раскладка зон в трёхмерном пространстве по направлениям выходов.

pub mod constraints;
pub mod solver;

pub use constraints::{Constraint, extract_constraints};
pub use solver::{Layout, Position, relax_positions, seed_positions};
