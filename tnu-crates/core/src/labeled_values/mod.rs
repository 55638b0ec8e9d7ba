//! The values stored on the edges of conditional networks.
mod labeled_value_map;
mod lower_case_value;
mod upper_case_map;

pub use labeled_value_map::*;
pub use lower_case_value::*;
pub use upper_case_map::*;
