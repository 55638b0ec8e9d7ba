use crate::basic_types::CheckOutcome;

/// The stage a checker is in.
///
/// A checker moves from [`CheckerState::Uninitialized`] through [`CheckerState::Initialized`]
/// and [`CheckerState::Propagating`] to [`CheckerState::Finished`], and never goes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckerState {
    #[default]
    Uninitialized,
    Initialized,
    Propagating,
    Finished(CheckOutcome),
}

impl CheckerState {
    pub fn is_finished(self) -> bool {
        matches!(self, CheckerState::Finished(_))
    }
}
