use super::TerminationCondition;

/// A [`TerminationCondition`] which never triggers; a check runs until it reaches a verdict.
#[derive(Clone, Copy, Debug)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}
