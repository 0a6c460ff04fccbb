// Trie alphabet metadata: the special marker characters a dictionary is
// compiled with.

use serde::{Deserialize, Serialize};

/// Metadata carried alongside a compiled trie.
///
/// The three marker characters are ordinary trie edges with reserved
/// meaning: words inserted under `strip_case_and_accents_prefix` form the
/// case/accent-folded shadow dictionary, `compound_character` marks compound
/// joint points, and `forbidden_word_prefix` marks words that must never be
/// offered as suggestions. The suggestion search treats all three as
/// non-letters and never crosses them with an ordinary edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrieInfo {
    /// Prefix edge under which case/accent-folded entries are stored.
    pub strip_case_and_accents_prefix: char,
    /// Marker edge joining the parts of a compound word.
    pub compound_character: char,
    /// Prefix edge under which forbidden words are stored.
    pub forbidden_word_prefix: char,
}

impl Default for TrieInfo {
    fn default() -> Self {
        Self {
            strip_case_and_accents_prefix: '~',
            compound_character: '+',
            forbidden_word_prefix: '!',
        }
    }
}

impl TrieInfo {
    /// The marker characters as a slice, for building "do not edit across
    /// this" character sets.
    pub fn special_characters(&self) -> [char; 3] {
        [
            self.strip_case_and_accents_prefix,
            self.compound_character,
            self.forbidden_word_prefix,
        ]
    }

    /// Returns `true` if `ch` is one of the marker characters.
    pub fn is_special(&self, ch: char) -> bool {
        self.special_characters().contains(&ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_markers() {
        let info = TrieInfo::default();
        assert_eq!(info.strip_case_and_accents_prefix, '~');
        assert_eq!(info.compound_character, '+');
        assert_eq!(info.forbidden_word_prefix, '!');
    }

    #[test]
    fn special_characters_cover_all_markers() {
        let info = TrieInfo::default();
        assert!(info.is_special('~'));
        assert!(info.is_special('+'));
        assert!(info.is_special('!'));
        assert!(!info.is_special('a'));
    }

    #[test]
    fn deserialize_partial() {
        let info: TrieInfo = serde_json::from_str(r#"{"compound_character": "*"}"#).unwrap();
        assert_eq!(info.compound_character, '*');
        assert_eq!(info.strip_case_and_accents_prefix, '~');
    }

    #[test]
    fn roundtrip_serde() {
        let info = TrieInfo {
            strip_case_and_accents_prefix: '_',
            compound_character: '*',
            forbidden_word_prefix: '?',
        };
        let json = serde_json::to_string(&info).unwrap();
        let back: TrieInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
