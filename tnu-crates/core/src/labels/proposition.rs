use std::fmt::Display;
use std::fmt::Formatter;

/// A proposition which is observed at run time, written as one of the characters `a`-`z` or
/// `A`-`F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Proposition(u8);

impl Proposition {
    /// The number of distinct propositions.
    pub const MAX: usize = 32;

    pub fn from_index(index: usize) -> Option<Proposition> {
        (index < Self::MAX).then(|| Proposition(index as u8))
    }

    pub fn from_char(c: char) -> Option<Proposition> {
        match c {
            'a'..='z' => Some(Proposition(c as u8 - b'a')),
            'A'..='F' => Some(Proposition(c as u8 - b'A' + 26)),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn as_char(self) -> char {
        if self.0 < 26 {
            (b'a' + self.0) as char
        } else {
            (b'A' + self.0 - 26) as char
        }
    }

    pub(crate) fn mask(self) -> u32 {
        1 << self.0
    }
}

impl Display for Proposition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A set of [`Proposition`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PropositionSet(u32);

impl PropositionSet {
    pub const EMPTY: PropositionSet = PropositionSet(0);

    pub(crate) fn from_mask(mask: u32) -> PropositionSet {
        PropositionSet(mask)
    }

    pub(crate) fn mask(self) -> u32 {
        self.0
    }

    pub fn insert(&mut self, proposition: Proposition) {
        self.0 |= proposition.mask();
    }

    pub fn contains(self, proposition: Proposition) -> bool {
        self.0 & proposition.mask() != 0
    }

    pub fn union(self, other: PropositionSet) -> PropositionSet {
        PropositionSet(self.0 | other.0)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The propositions in increasing order.
    pub fn iter(self) -> impl Iterator<Item = Proposition> {
        (0..Proposition::MAX)
            .filter(move |index| self.0 & (1 << index) != 0)
            .filter_map(Proposition::from_index)
    }
}

impl FromIterator<Proposition> for PropositionSet {
    fn from_iter<T: IntoIterator<Item = Proposition>>(iter: T) -> Self {
        let mut set = PropositionSet::EMPTY;
        iter.into_iter().for_each(|proposition| set.insert(proposition));
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_round_trip() {
        for c in ('a'..='z').chain('A'..='F') {
            let proposition = Proposition::from_char(c).expect("valid proposition");
            assert_eq!(proposition.as_char(), c);
        }
        assert_eq!(Proposition::from_char('G'), None);
        assert_eq!(Proposition::from_char('F').map(Proposition::index), Some(31));
    }

    #[test]
    fn set_iterates_in_order() {
        let set: PropositionSet = ['q', 'a', 'C']
            .into_iter()
            .filter_map(Proposition::from_char)
            .collect();

        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().map(Proposition::as_char).collect::<String>(), "aqC");
    }
}
