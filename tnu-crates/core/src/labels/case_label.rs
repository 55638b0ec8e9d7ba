use std::fmt::Display;
use std::fmt::Formatter;

/// The letter identifying a contingent node in upper- and lower-case values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseLetter(u8);

impl CaseLetter {
    /// The number of distinct case letters, and hence of contingent nodes in one network.
    pub const MAX: usize = 64;

    pub fn from_index(index: usize) -> Option<CaseLetter> {
        (index < Self::MAX).then(|| CaseLetter(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for CaseLetter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 < 26 {
            write!(f, "{}", (b'A' + self.0) as char)
        } else {
            write!(f, "C{}", self.0)
        }
    }
}

/// A set of [`CaseLetter`]s; the contingent durations an upper-case value depends on.
///
/// The empty case label marks an ordinary value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseLabel(u64);

impl CaseLabel {
    pub const EMPTY: CaseLabel = CaseLabel(0);

    pub fn from_letter(letter: CaseLetter) -> CaseLabel {
        CaseLabel(1 << letter.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(self, letter: CaseLetter) -> bool {
        self.0 & (1 << letter.0) != 0
    }

    pub fn union(self, other: CaseLabel) -> CaseLabel {
        CaseLabel(self.0 | other.0)
    }

    pub fn intersects(self, other: CaseLabel) -> bool {
        self.0 & other.0 != 0
    }

    pub fn remove(self, letter: CaseLetter) -> CaseLabel {
        CaseLabel(self.0 & !(1 << letter.0))
    }

    pub fn is_subset_of(self, other: CaseLabel) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn letters(self) -> impl Iterator<Item = CaseLetter> {
        (0..CaseLetter::MAX)
            .filter(move |index| self.0 & (1 << index) != 0)
            .filter_map(CaseLetter::from_index)
    }
}

impl Display for CaseLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "◇");
        }
        for letter in self.letters() {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(index: usize) -> CaseLetter {
        CaseLetter::from_index(index).expect("valid letter")
    }

    #[test]
    fn set_operations() {
        let ab = CaseLabel::from_letter(letter(0)).union(CaseLabel::from_letter(letter(1)));
        let c = CaseLabel::from_letter(letter(2));

        assert_eq!(ab.len(), 2);
        assert!(!ab.intersects(c));
        assert!(ab.intersects(CaseLabel::from_letter(letter(1))));
        assert!(CaseLabel::from_letter(letter(1)).is_subset_of(ab));
        assert!(CaseLabel::EMPTY.is_subset_of(c));
        assert_eq!(ab.remove(letter(0)), CaseLabel::from_letter(letter(1)));
        assert_eq!(ab.to_string(), "AB");
        assert_eq!(CaseLetter::from_index(64), None);
    }
}
