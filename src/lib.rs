pub mod config;
pub mod continent;
pub mod direction;
pub mod error;
pub mod layout;
pub mod records;
pub mod report;

pub use config::{AreaMapConfig, ContinentSettings, LayoutSettings};
pub use continent::{AreaGraph, Assignment, ContinentClassifier, find_overlaps};
pub use direction::{Direction, normalize};
pub use error::{MapError, MapResult};
pub use layout::{Constraint, Position, extract_constraints, relax_positions, seed_positions};
pub use records::{AreaCatalog, Database, RoomIndex};
