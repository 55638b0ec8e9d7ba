use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::labels::Literal;
use crate::labels::LiteralState;
use crate::labels::Label;
use crate::math::extended_int::ExtendedInt;
use crate::math::POS_INFINITY;
use crate::tnu_asserts::tnu_assert_advanced;

/// The values of an edge, each holding in the scenarios of its label.
///
/// The map never holds two entries `(l1, v1)` and `(l2, v2)` where `l1` subsumes `l2` and
/// `v1 >= v2`: the more specific entry would not tell anything new.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledValueMap {
    values: BTreeMap<Label, i32>,
}

impl LabeledValueMap {
    pub fn new() -> LabeledValueMap {
        LabeledValueMap::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Adds `(label, value)` unless an entry with a more general label and a value which is not
    /// larger is present. Entries which become redundant are removed.
    ///
    /// Afterwards, two entries which only differ in the state of one proposition are merged into
    /// one entry without that proposition.
    ///
    /// Returns whether the map changed. Adding `+∞` never changes the map.
    pub fn merge(&mut self, label: Label, value: i32) -> bool {
        if value == POS_INFINITY || self.is_dominated(label, value) {
            return false;
        }

        self.remove_dominated_by(label, value);
        let _ = self.values.insert(label, value);
        self.simplify(label, value);

        tnu_assert_advanced!(self.is_minimal());
        true
    }

    fn simplify(&mut self, label: Label, value: i32) {
        let flippable = label
            .literals()
            .filter(|literal| literal.state != LiteralState::Unknown)
            .collect::<Vec<Literal>>();

        for literal in flippable {
            let twin = label.with_literal(literal.complement());
            if let Some(&twin_value) = self.values.get(&twin) {
                let _ = self.merge(label.remove(literal.proposition), value.max(twin_value));
            }
        }
    }

    /// Whether an entry `(l, v)` is present with `label` subsuming `l` and `v <= value`.
    pub fn is_dominated(&self, label: Label, value: i32) -> bool {
        self.values
            .iter()
            .any(|(&present, &present_value)| label.subsumes(present) && present_value <= value)
    }

    /// Removes the entries `(l, v)` with `l` subsuming `label` and `v >= value`.
    ///
    /// Returns whether an entry was removed.
    pub fn remove_dominated_by(&mut self, label: Label, value: i32) -> bool {
        let size_before = self.values.len();
        self.values
            .retain(|present, present_value| !(present.subsumes(label) && *present_value >= value));
        size_before != self.values.len()
    }

    pub fn get(&self, label: Label) -> Option<i32> {
        self.values.get(&label).copied()
    }

    pub fn remove(&mut self, label: Label) -> Option<i32> {
        self.values.remove(&label)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// The entries, the more general labels first.
    pub fn iter(&self) -> impl Iterator<Item = (Label, i32)> + '_ {
        self.values.iter().map(|(&label, &value)| (label, value))
    }

    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.values.keys().copied()
    }

    pub fn min_value(&self) -> Option<i32> {
        self.values.values().copied().min()
    }

    pub fn max_value(&self) -> Option<i32> {
        self.values.values().copied().max()
    }

    /// The minimum value among the entries whose label is consistent with `label`.
    pub fn min_value_consistent_with(&self, label: Label) -> Option<i32> {
        self.iter()
            .filter(|(present, _)| present.is_consistent_with(label))
            .map(|(_, value)| value)
            .min()
    }

    /// The minimum value among the entries which hold whenever `label` holds, that is, whose
    /// label is subsumed by `label`.
    pub fn min_value_subsumed_by(&self, label: Label) -> Option<i32> {
        self.iter()
            .filter(|(present, _)| label.subsumes(*present))
            .map(|(_, value)| value)
            .min()
    }

    /// Removes the entries whose label contains an unknown literal.
    ///
    /// Returns whether an entry was removed.
    pub fn remove_unknown_labels(&mut self) -> bool {
        let size_before = self.values.len();
        self.values.retain(|label, _| !label.contains_unknown());
        size_before != self.values.len()
    }

    fn is_minimal(&self) -> bool {
        self.values.iter().all(|(&first, &first_value)| {
            self.values.iter().all(|(&second, &second_value)| {
                first == second || !(first.subsumes(second) && first_value >= second_value)
            })
        })
    }
}

impl Display for LabeledValueMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (label, value) in self.iter() {
            write!(f, "({label}, {}) ", ExtendedInt(value))?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::Rng;
    use rand::SeedableRng;

    use super::*;
    use crate::labels::Proposition;
    use crate::math::NEG_INFINITY;

    fn label(s: &str) -> Label {
        s.parse().expect("valid label")
    }

    #[test]
    fn more_general_smaller_value_dominates() {
        let mut map = LabeledValueMap::new();
        assert!(map.merge(label("a"), 5));
        assert!(!map.merge(label("ab"), 7));
        assert!(map.merge(label("ab"), 3));
        assert!(map.merge(label("⊡"), 2));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(Label::EMPTY), Some(2));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut map = LabeledValueMap::new();
        assert!(map.merge(label("a¬b"), -4));
        let snapshot = map.clone();

        assert!(!map.merge(label("a¬b"), -4));
        assert_eq!(map, snapshot);
    }

    #[test]
    fn complementary_entries_are_simplified() {
        let mut map = LabeledValueMap::new();
        assert!(map.merge(label("ab"), 4));
        assert!(map.merge(label("a¬b"), 6));

        assert_eq!(map.get(label("a")), Some(6));
        assert_eq!(map.get(label("ab")), Some(4));
        assert_eq!(map.get(label("a¬b")), None);
    }

    #[test]
    fn plus_infinity_is_ignored_and_minus_infinity_is_kept() {
        let mut map = LabeledValueMap::new();
        assert!(!map.merge(label("a"), POS_INFINITY));
        assert!(map.merge(label("¿a"), NEG_INFINITY));
        assert_eq!(map.min_value(), Some(NEG_INFINITY));

        assert!(map.remove_unknown_labels());
        assert!(map.is_empty());
    }

    #[test]
    fn queries_for_applicable_values() {
        let mut map = LabeledValueMap::new();
        let _ = map.merge(label("a"), 3);
        let _ = map.merge(label("¬a"), -1);
        let _ = map.merge(label("b"), 1);

        assert_eq!(map.min_value(), Some(-1));
        assert_eq!(map.max_value(), Some(3));
        assert_eq!(map.min_value_consistent_with(label("a")), Some(1));
        assert_eq!(map.min_value_subsumed_by(label("ab")), Some(1));
        assert_eq!(map.min_value_subsumed_by(label("a")), Some(3));
        assert_eq!(map.min_value_subsumed_by(label("c")), Some(3));
    }

    #[test]
    fn twin_labels_merge_into_their_common_part() {
        let mut map = LabeledValueMap::new();
        let _ = map.merge(label("a"), 3);
        let _ = map.merge(label("¬a"), -1);

        assert_eq!(map.get(Label::EMPTY), Some(3));
        assert_eq!(map.get(label("a")), None);
        assert_eq!(map.get(label("¬a")), Some(-1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn random_merges_keep_the_map_minimal() {
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..50 {
            let mut map = LabeledValueMap::new();
            let mut merged = Vec::new();
            for _ in 0..40 {
                let literals = (0..3).filter_map(|index| {
                    let proposition = Proposition::from_index(index)?;
                    match rng.gen_range(0..3) {
                        0 => Some(Literal::straight(proposition)),
                        1 => Some(Literal::negated(proposition)),
                        _ => None,
                    }
                });
                let label = Label::from_literals(literals).expect("one literal per proposition");
                let value = rng.gen_range(-10..10);
                let _ = map.merge(label, value);
                merged.push((label, value));
            }

            assert!(map.is_minimal());
            // Every merged value is still implied by the map.
            for (label, value) in merged {
                assert!(map.min_value_subsumed_by(label).is_some_and(|bound| bound <= value));
            }
        }
    }
}
