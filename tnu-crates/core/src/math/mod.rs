pub(crate) mod extended_int;

pub use extended_int::NEG_INFINITY;
pub use extended_int::POS_INFINITY;
