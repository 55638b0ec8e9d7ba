//! The propositional labels which qualify when a value of a conditional network applies, and the
//! case labels which record the contingent durations an upper-case value depends on.
mod case_label;
mod label;
mod literal;
mod proposition;

pub use case_label::*;
pub use label::*;
pub use literal::*;
pub use proposition::*;
