use std::fmt::Display;
use std::fmt::Formatter;

use enum_map::Enum;
use enumset::EnumSetType;

/// The rewrite rules applied by the labeled checkers.
#[derive(Debug, Hash, Enum, EnumSetType)]
pub enum PropagationRule {
    /// Labeled propagation, including the case-letter generalisation.
    LabelPropagation,
    /// Observation rule on an edge leaving an observer.
    R0,
    /// Observation rule on an edge from an observer to Z, allowing unknown literals.
    QR0,
    /// Observation rule combining an edge with an observation edge into the same node.
    R3,
    /// [`PropagationRule::R3`] for edges into Z, allowing unknown literals.
    QR3,
    /// Moves a lower-case value past its contingent node.
    CrossLowerCase,
    /// Drops a case letter from an upper-case value.
    LetterRemoval,
}

impl Display for PropagationRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PropagationRule::LabelPropagation => "LP",
            PropagationRule::R0 => "R0",
            PropagationRule::QR0 => "qR0",
            PropagationRule::R3 => "R3",
            PropagationRule::QR3 => "qR3",
            PropagationRule::CrossLowerCase => "crossLowerCase",
            PropagationRule::LetterRemoval => "letterRemoval",
        };
        write!(f, "{name}")
    }
}
