mod check_error;
mod check_status;
mod inconsistency;
mod propagation_rule;

pub use check_error::*;
pub use check_status::*;
pub(crate) use inconsistency::*;
pub use propagation_rule::*;
