use std::collections::BTreeMap;

use super::LabeledValueMap;
use crate::labels::CaseLabel;
use crate::labels::Label;
use crate::math::POS_INFINITY;

/// The upper-case values of an edge, grouped by the case letters they depend on.
///
/// An entry `(A1, l1, v1)` makes `(A2, l2, v2)` redundant if `A1` is a subset of `A2`, `l2`
/// subsumes `l1` and `v1 <= v2`. The empty case label is never used as a key: ordinary values
/// live in the [`LabeledValueMap`] of the edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpperCaseMap {
    values: BTreeMap<CaseLabel, LabeledValueMap>,
}

impl UpperCaseMap {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The number of stored values.
    pub fn len(&self) -> usize {
        self.values.values().map(LabeledValueMap::len).sum()
    }

    pub fn merge(&mut self, case_label: CaseLabel, label: Label, value: i32) -> bool {
        if case_label.is_empty() || value == POS_INFINITY || self.is_dominated(case_label, label, value)
        {
            return false;
        }

        for (_, map) in self
            .values
            .iter_mut()
            .filter(|(present, _)| case_label.is_subset_of(**present))
        {
            let _ = map.remove_dominated_by(label, value);
        }
        let changed = self.values.entry(case_label).or_default().merge(label, value);
        self.values.retain(|_, map| !map.is_empty());

        changed
    }

    pub fn is_dominated(&self, case_label: CaseLabel, label: Label, value: i32) -> bool {
        self.values
            .iter()
            .filter(|(present, _)| present.is_subset_of(case_label))
            .any(|(_, map)| map.is_dominated(label, value))
    }

    /// Removes the values made redundant by the ordinary value `(label, value)`.
    pub fn remove_dominated_by_ordinary(&mut self, label: Label, value: i32) -> bool {
        let mut changed = false;
        for map in self.values.values_mut() {
            changed |= map.remove_dominated_by(label, value);
        }
        self.values.retain(|_, map| !map.is_empty());
        changed
    }

    pub fn get(&self, case_label: CaseLabel, label: Label) -> Option<i32> {
        self.values.get(&case_label).and_then(|map| map.get(label))
    }

    pub fn remove(&mut self, case_label: CaseLabel, label: Label) -> Option<i32> {
        let map = self.values.get_mut(&case_label)?;
        let removed = map.remove(label);
        if map.is_empty() {
            let _ = self.values.remove(&case_label);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (CaseLabel, Label, i32)> + '_ {
        self.values.iter().flat_map(|(&case_label, map)| {
            map.iter().map(move |(label, value)| (case_label, label, value))
        })
    }

    pub fn min_value(&self) -> Option<i32> {
        self.values.values().filter_map(LabeledValueMap::min_value).min()
    }

    /// Removes the values whose label contains an unknown literal.
    pub fn remove_unknown_labels(&mut self) -> bool {
        let mut changed = false;
        for map in self.values.values_mut() {
            changed |= map.remove_unknown_labels();
        }
        self.values.retain(|_, map| !map.is_empty());
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::CaseLetter;

    fn label(s: &str) -> Label {
        s.parse().expect("valid label")
    }

    fn case_label(indices: &[usize]) -> CaseLabel {
        indices
            .iter()
            .filter_map(|&index| CaseLetter::from_index(index))
            .fold(CaseLabel::EMPTY, |case_label, letter| {
                case_label.union(CaseLabel::from_letter(letter))
            })
    }

    #[test]
    fn fewer_letters_dominate() {
        let mut map = UpperCaseMap::default();
        assert!(map.merge(case_label(&[0, 1]), label("a"), -3));
        assert!(map.merge(case_label(&[0]), label("a"), -4));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(case_label(&[0]), label("a")), Some(-4));
        assert!(!map.merge(case_label(&[0, 2]), label("ab"), -2));
    }

    #[test]
    fn more_letters_with_better_value_are_kept() {
        let mut map = UpperCaseMap::default();
        assert!(map.merge(case_label(&[0]), Label::EMPTY, -4));
        assert!(map.merge(case_label(&[0, 1]), Label::EMPTY, -9));
        assert_eq!(map.len(), 2);
        assert_eq!(map.min_value(), Some(-9));
    }

    #[test]
    fn ordinary_values_remove_upper_case_values() {
        let mut map = UpperCaseMap::default();
        let _ = map.merge(case_label(&[0]), label("a"), -4);
        let _ = map.merge(case_label(&[1]), label("b"), -6);

        assert!(map.remove_dominated_by_ordinary(Label::EMPTY, -5));
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(case_label(&[1]), label("b"), -6)]);
        assert!(!map.merge(CaseLabel::EMPTY, Label::EMPTY, -10));
    }
}
