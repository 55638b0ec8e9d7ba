use std::fmt::Display;
use std::fmt::Formatter;

use crate::labels::CaseLetter;
use crate::labels::Label;

/// The lower bound of a contingent link, stored on the edge from the activation node to the
/// contingent node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowerCaseValue {
    pub letter: CaseLetter,
    pub label: Label,
    pub value: i32,
}

impl Display for LowerCaseValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}:{})",
            self.label,
            self.letter.to_string().to_lowercase(),
            self.value
        )
    }
}
