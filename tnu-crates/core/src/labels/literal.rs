use std::fmt::Display;
use std::fmt::Formatter;

use super::Proposition;

/// The state of a proposition in a [`Label`](super::Label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralState {
    Straight,
    Negated,
    /// The proposition is both required true and false by the values a derivation combined; only
    /// occurs in values derived towards Z.
    Unknown,
}

impl LiteralState {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            LiteralState::Straight => "",
            LiteralState::Negated => "¬",
            LiteralState::Unknown => "¿",
        }
    }
}

/// A proposition together with its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub proposition: Proposition,
    pub state: LiteralState,
}

impl Literal {
    pub fn straight(proposition: Proposition) -> Literal {
        Literal {
            proposition,
            state: LiteralState::Straight,
        }
    }

    pub fn negated(proposition: Proposition) -> Literal {
        Literal {
            proposition,
            state: LiteralState::Negated,
        }
    }

    pub fn unknown(proposition: Proposition) -> Literal {
        Literal {
            proposition,
            state: LiteralState::Unknown,
        }
    }

    /// The literal over the same proposition with the opposite state; an unknown literal is its
    /// own complement.
    pub fn complement(self) -> Literal {
        let state = match self.state {
            LiteralState::Straight => LiteralState::Negated,
            LiteralState::Negated => LiteralState::Straight,
            LiteralState::Unknown => LiteralState::Unknown,
        };
        Literal {
            proposition: self.proposition,
            state,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.state.symbol(), self.proposition)
    }
}
