//! # tnu-core
//! The propagation core of the checkers for temporal networks: conditional simple temporal
//! networks (CSTN), their extension with contingent links (CSTNU), and simple temporal networks
//! with uncertainty (STNU).
//!
//! A network is a [`graph::TemporalGraph`] whose nodes are timepoints and whose edges carry
//! upper bounds on the distance between them; an edge `X → Y` with value `v` states
//! `Y - X <= v`. In conditional networks the values of an edge are qualified by
//! [`labels::Label`]s over propositions whose truth values are observed during execution.
//!
//! The checkers are:
//! * [`CstnChecker`] decides dynamic consistency of a CSTN by propagating labeled values until a
//!   fixpoint or a negative loop is reached.
//! * [`CstnuChecker`] decides dynamic controllability of a CSTNU; the propagation is extended
//!   with the rules for upper- and lower-case values of contingent links.
//! * [`StnuChecker`] decides dynamic controllability of an STNU with one of the algorithms
//!   listed in [`StnuAlgorithm`].
//!
//! Every check produces a [`CheckStatus`], which holds the verdict together with the statistics
//! of the run.
pub mod containers;
pub(crate) mod engine;
pub mod graph;
pub mod labeled_values;
pub mod labels;
pub(crate) mod math;
pub mod statistics;
pub(crate) mod tnu_asserts;

mod basic_types;

pub use convert_case;

pub use crate::basic_types::ArithmeticRangeError;
pub use crate::basic_types::CheckError;
pub use crate::basic_types::CheckOutcome;
pub use crate::basic_types::CheckStatus;
pub use crate::basic_types::NegativeLoop;
pub use crate::basic_types::PropagationRule;
pub use crate::basic_types::StnuStatistics;
pub use crate::basic_types::StructuralError;
pub use crate::engine::termination;
pub use crate::engine::CheckerOptions;
pub use crate::engine::CheckerState;
pub use crate::engine::CstnChecker;
pub use crate::engine::CstnuChecker;
pub use crate::engine::FullRuleSet;
pub use crate::engine::RestrictedRuleSet;
pub use crate::engine::RuleSet;
pub use crate::engine::StnuAlgorithm;
pub use crate::engine::StnuChecker;
pub use crate::math::NEG_INFINITY;
pub use crate::math::POS_INFINITY;
