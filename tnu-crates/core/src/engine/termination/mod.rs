//! A [`TerminationCondition`] is polled by the checkers at safe points of their propagation. It
//! indicates when a check should stop even though it has not reached a verdict; the check then
//! reports a timeout.

mod indefinite;
mod time_budget;

pub use indefinite::Indefinite;
pub use time_budget::TimeBudget;

/// Determines when a check should give up.
pub trait TerminationCondition {
    /// Returns `true` when the check should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(t) => t.should_stop(),
            None => false,
        }
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for &mut T {
    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }
}
