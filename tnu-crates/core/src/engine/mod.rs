mod checker_state;
mod cstn;
mod cstnu;
pub(crate) mod edge_queue;
pub(crate) mod labeled;
mod options;
pub(crate) mod stnu;
pub mod termination;

pub use checker_state::CheckerState;
pub use cstn::CstnChecker;
pub use cstnu::CstnuChecker;
pub use labeled::FullRuleSet;
pub use labeled::RestrictedRuleSet;
pub use labeled::RuleSet;
pub use options::CheckerOptions;
pub use options::StnuAlgorithm;
pub use stnu::StnuChecker;
