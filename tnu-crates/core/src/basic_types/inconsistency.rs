use super::ArithmeticRangeError;
use super::NegativeLoop;

/// The result of applying a propagation rule.
///
/// `Ok(true)` if the rule changed the network, `Ok(false)` if it did not; an [`Inconsistency`]
/// stops the propagation.
pub(crate) type RuleStatus = Result<bool, Inconsistency>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Inconsistency {
    /// A negative loop which holds in at least one scenario.
    NegativeLoop(NegativeLoop),
    Arithmetic(ArithmeticRangeError),
}

impl From<ArithmeticRangeError> for Inconsistency {
    fn from(value: ArithmeticRangeError) -> Self {
        Inconsistency::Arithmetic(value)
    }
}

impl From<NegativeLoop> for Inconsistency {
    fn from(value: NegativeLoop) -> Self {
        Inconsistency::NegativeLoop(value)
    }
}
