//! The rules and the propagation loop shared by the checkers of conditional networks.
mod case_rules;
mod contingent_links;
mod context;
mod initialisation;
mod label_propagation;
mod observation_rules;
mod propagation;
mod rule_set;

pub(crate) use contingent_links::*;
pub(crate) use context::*;
pub(crate) use initialisation::*;
pub(crate) use propagation::*;
pub use rule_set::*;
