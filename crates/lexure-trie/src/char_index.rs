// Symbol table: maps characters to trie step indices and back.
//
// Slot 0 is reserved. Indices below 0x80 are direct one-step symbols;
// larger indices are spread over several steps by the chain encoding in
// [`crate::utf8`]. Index assignment is first-come, so the most frequent
// characters of a word list naturally land in the cheap direct range.

use std::borrow::Cow;

use hashbrown::HashMap;
use unicode_normalization::{IsNormalized, UnicodeNormalization, is_nfc_quick};

use crate::utf8::{MAX_SCALAR, encode_scalar_into};

/// First index that no longer fits in a single step byte.
pub const FIRST_CHAINED_INDEX: u32 = 0x80;

/// NFC-normalize a word for table lookup and insertion, borrowing when it is
/// already normalized (the common case).
pub fn normalize_nfc(word: &str) -> Cow<'_, str> {
    match is_nfc_quick(word.chars()) {
        IsNormalized::Yes => Cow::Borrowed(word),
        _ => Cow::Owned(word.nfc().collect()),
    }
}

/// Character-to-index table with the reverse mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct CharIndexTable {
    /// Index to character; slot 0 reserved and empty.
    chars: Vec<String>,
    lookup: HashMap<char, u32>,
}

impl Default for CharIndexTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CharIndexTable {
    pub fn new() -> Self {
        Self {
            chars: vec![String::new()],
            lookup: HashMap::new(),
        }
    }

    /// Rebuild a table from its serialized character list. Slot 0 must be
    /// empty and every other slot must hold exactly one character.
    pub fn from_chars(chars: Vec<String>) -> Result<Self, String> {
        let mut lookup = HashMap::with_capacity(chars.len());
        for (i, s) in chars.iter().enumerate() {
            if i == 0 {
                if !s.is_empty() {
                    return Err("reserved slot 0 is not empty".to_string());
                }
                continue;
            }
            let mut it = s.chars();
            let (Some(ch), None) = (it.next(), it.next()) else {
                return Err(format!("slot {i} is not a single character: {s:?}"));
            };
            lookup.insert(ch, i as u32);
        }
        if chars.is_empty() {
            return Err("character table is empty".to_string());
        }
        Ok(Self { chars, lookup })
    }

    /// Number of slots, including the reserved one.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.len() <= 1
    }

    /// `true` once indices past the direct range exist, i.e. some symbols
    /// need chain steps.
    pub fn needs_chaining(&self) -> bool {
        self.chars.len() as u32 > FIRST_CHAINED_INDEX
    }

    /// The serialized character list (slot 0 first).
    pub fn chars(&self) -> &[String] {
        &self.chars
    }

    /// Character stored at `idx`, if any.
    pub fn char_at(&self, idx: u32) -> Option<&str> {
        self.chars.get(idx as usize).map(String::as_str)
    }

    /// Index assigned to `ch`, if it appears in the table.
    pub fn index_of(&self, ch: char) -> Option<u32> {
        self.lookup.get(&ch).copied()
    }

    /// Index for `ch`, assigning the next free slot on first sight.
    pub fn get_or_add(&mut self, ch: char) -> u32 {
        if let Some(&idx) = self.lookup.get(&ch) {
            return idx;
        }
        let idx = self.chars.len() as u32;
        assert!(idx <= MAX_SCALAR, "character table exceeds the chain encoding range");
        self.chars.push(ch.to_string());
        self.lookup.insert(ch, idx);
        idx
    }

    /// Append the step bytes for `ch` to `out`, assigning an index if
    /// needed.
    pub fn append_char_steps(&mut self, ch: char, out: &mut Vec<u8>) {
        let idx = self.get_or_add(ch);
        encode_scalar_into(idx, out);
    }

    /// Encode a (pre-normalized) word into step bytes for lookup. Returns
    /// `false` if any character is not in the table.
    pub fn encode_word(&self, word: &str, out: &mut Vec<u8>) -> bool {
        for ch in word.chars() {
            let Some(idx) = self.index_of(ch) else {
                return false;
            };
            encode_scalar_into(idx, out);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_indices_in_first_come_order() {
        let mut table = CharIndexTable::new();
        assert_eq!(table.get_or_add('c'), 1);
        assert_eq!(table.get_or_add('a'), 2);
        assert_eq!(table.get_or_add('c'), 1);
        assert_eq!(table.len(), 3);
        assert_eq!(table.char_at(1), Some("c"));
        assert_eq!(table.index_of('a'), Some(2));
        assert_eq!(table.index_of('x'), None);
    }

    #[test]
    fn chaining_starts_past_direct_range() {
        let mut table = CharIndexTable::new();
        for i in 0..130u32 {
            let ch = char::from_u32(0x3041 + i).unwrap();
            table.get_or_add(ch);
        }
        assert!(table.needs_chaining());
        let mut out = Vec::new();
        // Index 1 is direct, index 0x80 takes two steps.
        assert!(table.encode_word("\u{3041}", &mut out));
        assert_eq!(out.len(), 1);
        out.clear();
        let chained = char::from_u32(0x3041 + 0x7F).unwrap(); // index 0x80
        assert!(table.encode_word(&chained.to_string(), &mut out));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn encode_word_rejects_unknown_chars() {
        let mut table = CharIndexTable::new();
        table.get_or_add('a');
        let mut out = Vec::new();
        assert!(!table.encode_word("ab", &mut out));
    }

    #[test]
    fn from_chars_roundtrip() {
        let mut table = CharIndexTable::new();
        for ch in "word".chars() {
            table.get_or_add(ch);
        }
        let rebuilt = CharIndexTable::from_chars(table.chars().to_vec()).unwrap();
        assert_eq!(rebuilt, table);
    }

    #[test]
    fn from_chars_rejects_bad_tables() {
        assert!(CharIndexTable::from_chars(vec![]).is_err());
        assert!(CharIndexTable::from_chars(vec!["x".to_string()]).is_err());
        assert!(
            CharIndexTable::from_chars(vec![String::new(), "ab".to_string()]).is_err()
        );
    }

    #[test]
    fn nfc_normalization_borrows_when_clean() {
        assert!(matches!(normalize_nfc("plain"), Cow::Borrowed(_)));
        // 'e' + combining acute composes to a single code point.
        let decomposed = "cafe\u{301}";
        let normalized = normalize_nfc(decomposed);
        assert_eq!(normalized.as_ref(), "caf\u{e9}");
    }
}
