use std::cmp::Ordering;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use thiserror::Error;

use super::Literal;
use super::LiteralState;
use super::Proposition;
use super::PropositionSet;

/// A conjunction of literals.
///
/// A proposition occurs at most once; it is straight if only its bit in `straight` is set, negated
/// if only its bit in `negated` is set and unknown if both are set. A label therefore never
/// asserts a literal together with its negation.
///
/// Labels are ordered by their number of literals first, so iterating a map keyed by labels
/// visits the more general labels first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Label {
    straight: u32,
    negated: u32,
}

impl Label {
    /// The label without literals, which holds in every scenario.
    pub const EMPTY: Label = Label {
        straight: 0,
        negated: 0,
    };

    pub fn from_literal(literal: Literal) -> Label {
        let mask = literal.proposition.mask();
        match literal.state {
            LiteralState::Straight => Label {
                straight: mask,
                negated: 0,
            },
            LiteralState::Negated => Label {
                straight: 0,
                negated: mask,
            },
            LiteralState::Unknown => Label {
                straight: mask,
                negated: mask,
            },
        }
    }

    /// The conjunction of `literals`, or `None` if two of them contradict each other.
    pub fn from_literals(literals: impl IntoIterator<Item = Literal>) -> Option<Label> {
        literals
            .into_iter()
            .try_fold(Label::EMPTY, |label, literal| {
                label.conjunction(Label::from_literal(literal))
            })
    }

    pub fn is_empty(self) -> bool {
        self.propositions_mask() == 0
    }

    /// The number of literals.
    pub fn len(self) -> usize {
        self.propositions_mask().count_ones() as usize
    }

    fn propositions_mask(self) -> u32 {
        self.straight | self.negated
    }

    fn unknown_mask(self) -> u32 {
        self.straight & self.negated
    }

    /// The propositions which occur in the label, in any state.
    pub fn propositions(self) -> PropositionSet {
        PropositionSet::from_mask(self.propositions_mask())
    }

    /// The propositions which occur as unknown literal.
    pub fn unknown_propositions(self) -> PropositionSet {
        PropositionSet::from_mask(self.unknown_mask())
    }

    pub fn state(self, proposition: Proposition) -> Option<LiteralState> {
        let mask = proposition.mask();
        match (self.straight & mask != 0, self.negated & mask != 0) {
            (true, false) => Some(LiteralState::Straight),
            (false, true) => Some(LiteralState::Negated),
            (true, true) => Some(LiteralState::Unknown),
            (false, false) => None,
        }
    }

    /// The literals in increasing order of proposition.
    pub fn literals(self) -> impl Iterator<Item = Literal> {
        self.propositions().iter().filter_map(move |proposition| {
            self.state(proposition).map(|state| Literal { proposition, state })
        })
    }

    pub fn contains(self, literal: Literal) -> bool {
        self.state(literal.proposition) == Some(literal.state)
    }

    pub fn contains_proposition(self, proposition: Proposition) -> bool {
        self.propositions_mask() & proposition.mask() != 0
    }

    pub fn contains_unknown(self) -> bool {
        self.unknown_mask() != 0
    }

    /// The label without any literal over `proposition`.
    pub fn remove(self, proposition: Proposition) -> Label {
        self.remove_propositions(PropositionSet::from_mask(proposition.mask()))
    }

    /// The label without any literal over the propositions of `propositions`.
    pub fn remove_propositions(self, propositions: PropositionSet) -> Label {
        Label {
            straight: self.straight & !propositions.mask(),
            negated: self.negated & !propositions.mask(),
        }
    }

    /// The label with the state of `literal` for its proposition, replacing the current one.
    pub(crate) fn with_literal(self, literal: Literal) -> Label {
        let without = self.remove(literal.proposition);
        let added = Label::from_literal(literal);
        Label {
            straight: without.straight | added.straight,
            negated: without.negated | added.negated,
        }
    }

    /// The conjunction of two labels, or `None` if a proposition has different states in them.
    pub fn conjunction(self, other: Label) -> Option<Label> {
        let common = self.propositions_mask() & other.propositions_mask();
        let differing = (self.straight ^ other.straight) | (self.negated ^ other.negated);
        if differing & common != 0 {
            return None;
        }
        Some(Label {
            straight: self.straight | other.straight,
            negated: self.negated | other.negated,
        })
    }

    /// The conjunction of two labels in which a proposition with different states becomes
    /// unknown.
    pub fn conjunction_extended(self, other: Label) -> Label {
        Label {
            straight: self.straight | other.straight,
            negated: self.negated | other.negated,
        }
    }

    /// Whether every literal of `other` is a literal of `self`.
    ///
    /// A label subsumes another if it describes a subset of its scenarios.
    pub fn subsumes(self, other: Label) -> bool {
        let mask = other.propositions_mask();
        self.straight & mask == other.straight && self.negated & mask == other.negated
    }

    /// Whether some scenario satisfies both labels; an unknown literal is consistent with any
    /// state of its proposition.
    pub fn is_consistent_with(self, other: Label) -> bool {
        let self_straight = self.straight & !self.negated;
        let self_negated = self.negated & !self.straight;
        let other_straight = other.straight & !other.negated;
        let other_negated = other.negated & !other.straight;
        (self_straight & other_negated) | (self_negated & other_straight) == 0
    }

    /// Two bits per proposition, the first proposition being the most significant.
    fn order_key(self) -> u64 {
        (0..Proposition::MAX).fold(0, |key, index| {
            let straight = u64::from((self.straight >> index) & 1);
            let negated = u64::from((self.negated >> index) & 1);
            (key << 2) | (straight << 1) | negated
        })
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| other.order_key().cmp(&self.order_key()))
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "⊡");
        }
        for literal in self.literals() {
            write!(f, "{literal}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelParseError {
    #[error("'{0}' is not a proposition")]
    InvalidProposition(char),
    #[error("the label ends with a dangling '{0}'")]
    DanglingModifier(char),
    #[error("proposition '{0}' occurs with two different states")]
    Contradiction(Proposition),
}

impl FromStr for Label {
    type Err = LabelParseError;

    /// Parses labels such as `a¬b¿c`; `!` and `?` can be used instead of `¬` and `¿`, and `⊡`
    /// (or the empty string) is the empty label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut label = Label::EMPTY;
        let mut modifier = None;

        for c in s.chars().filter(|c| !c.is_whitespace() && *c != '⊡') {
            match c {
                '¬' | '!' | '¿' | '?' => {
                    if let Some(previous) = modifier {
                        return Err(LabelParseError::DanglingModifier(previous));
                    }
                    modifier = Some(c);
                }
                _ => {
                    let proposition =
                        Proposition::from_char(c).ok_or(LabelParseError::InvalidProposition(c))?;
                    let state = match modifier.take() {
                        Some('¬' | '!') => LiteralState::Negated,
                        Some(_) => LiteralState::Unknown,
                        None => LiteralState::Straight,
                    };
                    label = label
                        .conjunction(Label::from_literal(Literal { proposition, state }))
                        .ok_or(LabelParseError::Contradiction(proposition))?;
                }
            }
        }

        match modifier {
            Some(dangling) => Err(LabelParseError::DanglingModifier(dangling)),
            None => Ok(label),
        }
    }
}
