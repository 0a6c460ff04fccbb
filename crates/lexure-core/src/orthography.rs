// Visual-letter similarity classes.
//
// Characters that are easy to mistake for one another (base letter plus its
// diacritic variants, digit/letter confusables) are grouped; a substitution
// within a group is charged the reduced `visually_similar` cost instead of
// the full `base_cost`.

use hashbrown::HashMap;

/// Default similarity groups: each string is one class of mutually
/// confusable characters. Lower and upper case are separate classes on
/// purpose; case folding is handled by the folded shadow dictionary, not by
/// the cost model.
pub const DEFAULT_VISUAL_GROUPS: &[&str] = &[
    "a\u{00e0}\u{00e1}\u{00e2}\u{00e3}\u{00e4}\u{00e5}\u{0101}\u{0103}\u{0105}",
    "A\u{00c0}\u{00c1}\u{00c2}\u{00c3}\u{00c4}\u{00c5}\u{0100}\u{0102}\u{0104}",
    "c\u{00e7}\u{0107}\u{010d}",
    "C\u{00c7}\u{0106}\u{010c}",
    "d\u{010f}\u{0111}",
    "e\u{00e8}\u{00e9}\u{00ea}\u{00eb}\u{0113}\u{0117}\u{0119}\u{011b}",
    "E\u{00c8}\u{00c9}\u{00ca}\u{00cb}\u{0112}\u{0116}\u{0118}\u{011a}",
    "g\u{011d}\u{011f}\u{0121}\u{0123}",
    "i\u{00ec}\u{00ed}\u{00ee}\u{00ef}\u{0129}\u{012b}\u{012d}\u{012f}\u{0131}l1",
    "I\u{00cc}\u{00cd}\u{00ce}\u{00cf}\u{0128}\u{012a}\u{012c}\u{012e}l1",
    "l\u{013a}\u{013c}\u{013e}\u{0142}1iI",
    "n\u{00f1}\u{0144}\u{0146}\u{0148}",
    "N\u{00d1}\u{0143}\u{0145}\u{0147}",
    "o\u{00f2}\u{00f3}\u{00f4}\u{00f5}\u{00f6}\u{00f8}\u{014d}\u{014f}\u{0151}0",
    "O\u{00d2}\u{00d3}\u{00d4}\u{00d5}\u{00d6}\u{00d8}\u{014c}\u{014e}\u{0150}0",
    "r\u{0155}\u{0157}\u{0159}",
    "s\u{015b}\u{015d}\u{015f}\u{0161}",
    "S\u{015a}\u{015c}\u{015e}\u{0160}5",
    "t\u{0163}\u{0165}\u{0167}",
    "u\u{00f9}\u{00fa}\u{00fb}\u{00fc}\u{0169}\u{016b}\u{016d}\u{016f}\u{0171}\u{0173}v",
    "U\u{00d9}\u{00da}\u{00db}\u{00dc}\u{0168}\u{016a}\u{016c}\u{016e}\u{0170}\u{0172}V",
    "y\u{00fd}\u{00ff}\u{0177}",
    "Y\u{00dd}\u{0178}\u{0176}",
    "z\u{017a}\u{017c}\u{017e}",
    "Z\u{0179}\u{017b}\u{017d}2",
];

/// Per-character similarity bitmasks.
///
/// A character may belong to several groups; its mask is the OR of the group
/// bits. Two characters are visually similar iff their masks intersect.
#[derive(Debug, Clone, Default)]
pub struct VisualLetterMap {
    masks: HashMap<char, u64>,
}

impl VisualLetterMap {
    /// Compile a similarity map from character groups. Groups beyond 64 are
    /// folded onto the existing bits, which keeps masks well-defined at the
    /// price of occasional false positives on absurdly large tables.
    pub fn from_groups<S: AsRef<str>>(groups: &[S]) -> Self {
        let mut masks: HashMap<char, u64> = HashMap::new();
        for (i, group) in groups.iter().enumerate() {
            let bit = 1u64 << (i % 64);
            for ch in group.as_ref().chars() {
                *masks.entry(ch).or_insert(0) |= bit;
            }
        }
        Self { masks }
    }

    /// The standard Latin diacritic/confusable table.
    pub fn standard() -> Self {
        Self::from_groups(DEFAULT_VISUAL_GROUPS)
    }

    /// Similarity mask for a character; `0` if the character belongs to no
    /// group.
    pub fn mask(&self, ch: char) -> u64 {
        self.masks.get(&ch).copied().unwrap_or(0)
    }

    /// Returns `true` if the two characters share a similarity group.
    pub fn similar(&self, a: char, b: char) -> bool {
        self.mask(a) & self.mask(b) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diacritic_variants_are_similar() {
        let map = VisualLetterMap::standard();
        assert!(map.similar('a', '\u{00e4}'));
        assert!(map.similar('e', '\u{00e9}'));
        assert!(map.similar('o', '0'));
    }

    #[test]
    fn unrelated_letters_are_not_similar() {
        let map = VisualLetterMap::standard();
        assert!(!map.similar('a', 'b'));
        assert!(!map.similar('x', 'q'));
    }

    #[test]
    fn case_classes_are_distinct() {
        let map = VisualLetterMap::standard();
        assert!(!map.similar('a', 'A'));
    }

    #[test]
    fn multi_group_membership() {
        // 'l', '1', and 'i' are mutual confusables through shared groups.
        let map = VisualLetterMap::standard();
        assert!(map.similar('l', '1'));
        assert!(map.similar('l', 'i'));
    }

    #[test]
    fn unknown_char_has_empty_mask() {
        let map = VisualLetterMap::standard();
        assert_eq!(map.mask('\u{4e00}'), 0);
    }

    #[test]
    fn custom_groups() {
        let map = VisualLetterMap::from_groups(&["ab", "bc"]);
        assert!(map.similar('a', 'b'));
        assert!(map.similar('b', 'c'));
        assert!(!map.similar('a', 'c'));
    }
}
