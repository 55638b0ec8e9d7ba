use std::fmt::Display;
use std::fmt::Formatter;

use super::ConstraintKind;
use super::EdgeData;
use crate::labeled_values::LabeledValueMap;
use crate::labeled_values::LowerCaseValue;
use crate::labeled_values::UpperCaseMap;
use crate::labels::CaseLabel;
use crate::labels::Label;

/// An edge of a conditional network.
///
/// Besides its ordinary values, an edge of a network with contingent links can hold upper-case
/// values and at most one lower-case value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledEdge {
    kind: ConstraintKind,
    values: LabeledValueMap,
    upper_case: UpperCaseMap,
    lower_case: Option<LowerCaseValue>,
}

impl LabeledEdge {
    pub fn new(kind: ConstraintKind) -> LabeledEdge {
        LabeledEdge {
            kind,
            ..Default::default()
        }
    }

    /// An ordinary edge holding `value` in the scenarios of `label`.
    pub fn ordinary(label: Label, value: i32) -> LabeledEdge {
        LabeledEdge::new(ConstraintKind::Ordinary).with_value(label, value)
    }

    /// A contingent edge holding `value` in the scenarios of `label`.
    pub fn contingent(label: Label, value: i32) -> LabeledEdge {
        LabeledEdge::new(ConstraintKind::Contingent).with_value(label, value)
    }

    pub fn with_value(mut self, label: Label, value: i32) -> LabeledEdge {
        let _ = self.merge_labeled_value(label, value);
        self
    }

    pub fn values(&self) -> &LabeledValueMap {
        &self.values
    }

    pub fn upper_case_values(&self) -> &UpperCaseMap {
        &self.upper_case
    }

    pub fn lower_case_value(&self) -> Option<LowerCaseValue> {
        self.lower_case
    }

    pub fn set_lower_case_value(&mut self, lower_case: Option<LowerCaseValue>) {
        self.lower_case = lower_case;
    }

    /// Merges an ordinary value; upper-case values which become redundant are removed.
    pub fn merge_labeled_value(&mut self, label: Label, value: i32) -> bool {
        if self.values.merge(label, value) {
            let _ = self.upper_case.remove_dominated_by_ordinary(label, value);
            true
        } else {
            false
        }
    }

    /// Merges an upper-case value; with an empty case label this is an ordinary value.
    pub fn merge_upper_case_value(&mut self, case_label: CaseLabel, label: Label, value: i32) -> bool {
        if case_label.is_empty() {
            return self.merge_labeled_value(label, value);
        }
        if self.values.is_dominated(label, value) {
            return false;
        }
        self.upper_case.merge(case_label, label, value)
    }

    pub fn remove_labeled_value(&mut self, label: Label) -> Option<i32> {
        self.values.remove(label)
    }

    pub fn remove_upper_case_value(&mut self, case_label: CaseLabel, label: Label) -> Option<i32> {
        self.upper_case.remove(case_label, label)
    }

    /// Every ordinary and upper-case value; ordinary values have the empty case label.
    pub fn values_with_case(&self) -> Vec<(CaseLabel, Label, i32)> {
        self.values
            .iter()
            .map(|(label, value)| (CaseLabel::EMPTY, label, value))
            .chain(self.upper_case.iter())
            .collect()
    }

    /// The minimum of the ordinary values.
    pub fn min_value(&self) -> Option<i32> {
        self.values.min_value()
    }

    pub fn clear_case_values(&mut self) {
        self.upper_case.clear();
        self.lower_case = None;
    }

    /// Removes the values, of any case, whose label contains an unknown literal.
    pub fn remove_unknown_labels(&mut self) -> bool {
        let ordinary = self.values.remove_unknown_labels();
        let upper_case = self.upper_case.remove_unknown_labels();
        ordinary || upper_case
    }
}

impl EdgeData for LabeledEdge {
    fn kind(&self) -> ConstraintKind {
        self.kind
    }

    fn set_kind(&mut self, kind: ConstraintKind) {
        self.kind = kind;
    }

    fn is_empty(&self) -> bool {
        self.values.is_empty() && self.upper_case.is_empty() && self.lower_case.is_none()
    }
}

impl Display for LabeledEdge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}", self.kind, self.values)?;
        for (case_label, label, value) in self.upper_case.iter() {
            write!(f, " ({label}, {case_label}:{value})")?;
        }
        if let Some(lower_case) = self.lower_case {
            write!(f, " {lower_case}")?;
        }
        Ok(())
    }
}
