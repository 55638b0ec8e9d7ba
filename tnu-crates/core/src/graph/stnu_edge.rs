use std::fmt::Display;
use std::fmt::Formatter;

use super::ConstraintKind;
use super::EdgeData;
use super::NodeId;
use crate::math::extended_int::ExtendedInt;
use crate::math::POS_INFINITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKind {
    Lower,
    Upper,
}

/// The case value of an edge of a contingent link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseValue {
    pub kind: CaseKind,
    /// The contingent node of the link.
    pub contingent: NodeId,
    pub value: i32,
}

/// An edge of a network without propositions: one ordinary value, and a case value if the edge
/// belongs to a contingent link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StnuEdge {
    kind: ConstraintKind,
    /// `+∞` if the edge has no ordinary value.
    value: i32,
    case: Option<CaseValue>,
}

impl StnuEdge {
    pub fn new(kind: ConstraintKind) -> StnuEdge {
        StnuEdge {
            kind,
            value: POS_INFINITY,
            case: None,
        }
    }

    pub fn ordinary(value: i32) -> StnuEdge {
        StnuEdge {
            value,
            ..StnuEdge::new(ConstraintKind::Ordinary)
        }
    }

    /// A contingent edge with the raw bound `value`; the checker derives the case values from the
    /// raw bounds of the link.
    pub fn contingent(value: i32) -> StnuEdge {
        StnuEdge {
            value,
            ..StnuEdge::new(ConstraintKind::Contingent)
        }
    }

    pub fn value(&self) -> Option<i32> {
        (self.value != POS_INFINITY).then_some(self.value)
    }

    pub fn set_value(&mut self, value: i32) {
        self.value = value;
    }

    /// Lowers the ordinary value to `value`; returns whether it changed.
    pub fn update_value(&mut self, value: i32) -> bool {
        if value < self.value {
            self.value = value;
            true
        } else {
            false
        }
    }

    pub fn case_value(&self) -> Option<CaseValue> {
        self.case
    }

    pub fn lower_case_value(&self) -> Option<CaseValue> {
        self.case.filter(|case| case.kind == CaseKind::Lower)
    }

    pub fn upper_case_value(&self) -> Option<CaseValue> {
        self.case.filter(|case| case.kind == CaseKind::Upper)
    }

    pub fn set_case_value(&mut self, case: Option<CaseValue>) {
        self.case = case;
    }

    /// The weight of the edge when lower-case values are read as ordinary ones.
    pub(crate) fn lower_or_ordinary_weight(&self) -> Option<i32> {
        let lower = self.lower_case_value().map(|case| case.value);
        match (self.value(), lower) {
            (Some(value), Some(lower)) => Some(value.min(lower)),
            (value, lower) => value.or(lower),
        }
    }
}

impl EdgeData for StnuEdge {
    fn kind(&self) -> ConstraintKind {
        self.kind
    }

    fn set_kind(&mut self, kind: ConstraintKind) {
        self.kind = kind;
    }

    fn is_empty(&self) -> bool {
        self.value == POS_INFINITY && self.case.is_none()
    }

    fn node_moved(&mut self, from: NodeId, to: NodeId) {
        if let Some(case) = self.case.as_mut() {
            if case.contingent == from {
                case.contingent = to;
            }
        }
    }
}

impl Display for StnuEdge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}", self.kind, ExtendedInt(self.value))?;
        match self.case {
            Some(CaseValue {
                kind: CaseKind::Lower,
                contingent,
                value,
            }) => write!(f, " lc({contingent}):{value}"),
            Some(CaseValue {
                kind: CaseKind::Upper,
                contingent,
                value,
            }) => write!(f, " UC({contingent}):{value}"),
            None => Ok(()),
        }
    }
}
