// Compiles word lists (or a generic trie) into the flat blob layout.
//
// During the build each node is its own `Vec<u32>` row: slot 0 holds the
// end-of-word flag, every further slot packs `(child row << 8) | step byte`.
// `build` flattens the rows into one contiguous table, rewriting row numbers
// into slot offsets. Row 1 is a shared terminal: every word that ends with
// no continuation points at it, which collapses the long tail of one-node
// leaves.

use lexure_core::TrieInfo;

use crate::blob::{
    NODE_CHILD_REF_SHIFT, NODE_MASK_CHILD_CHAR_INDEX, NODE_MASK_EOW, NODE_MASK_NUM_CHILDREN,
    TrieBlob,
};
use crate::char_index::{CharIndexTable, normalize_nfc};
use crate::trie_node::TrieNode;

/// Row index of the shared end-of-word leaf.
const ROW_EOW: usize = 1;

/// Mutable trie under construction.
pub struct TrieBuilder {
    rows: Vec<Vec<u32>>,
    char_index: CharIndexTable,
    info: TrieInfo,
}

impl TrieBuilder {
    pub fn new(info: TrieInfo) -> Self {
        Self {
            rows: vec![vec![0], vec![NODE_MASK_EOW]],
            char_index: CharIndexTable::new(),
            info,
        }
    }

    /// Insert one word. Whitespace is trimmed, empty words are ignored, and
    /// the word is NFC-normalized before encoding.
    pub fn insert(&mut self, word: &str) {
        let word = word.trim();
        if word.is_empty() {
            return;
        }
        let normalized = normalize_nfc(word);
        let mut seq = Vec::with_capacity(normalized.len());
        for ch in normalized.chars() {
            self.char_index.append_char_steps(ch, &mut seq);
        }

        let len = seq.len();
        let mut row = 0usize;
        for (p, &byte) in seq.iter().enumerate() {
            let last_step = p + 1 == len;
            match self.find_child_slot(row, byte) {
                Some(slot) => {
                    let mut child =
                        (self.rows[row][slot] >> NODE_CHILD_REF_SHIFT) as usize;
                    if child == ROW_EOW && !last_step {
                        // The shared terminal is about to gain children:
                        // give this word its own end-of-word row.
                        child = self.rows.len();
                        self.rows.push(vec![NODE_MASK_EOW]);
                        self.rows[row][slot] =
                            ((child as u32) << NODE_CHILD_REF_SHIFT) | byte as u32;
                    }
                    row = child;
                }
                None => {
                    let child = if last_step {
                        ROW_EOW
                    } else {
                        self.rows.push(vec![0]);
                        self.rows.len() - 1
                    };
                    self.rows[row]
                        .push(((child as u32) << NODE_CHILD_REF_SHIFT) | byte as u32);
                    row = child;
                }
            }
        }
        if row != ROW_EOW {
            self.rows[row][0] |= NODE_MASK_EOW;
        }
    }

    /// Insert every word of a stream.
    pub fn insert_all<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.insert(word.as_ref());
        }
    }

    /// Compile a generic trie tree instead of a word stream. Both paths
    /// produce observationally identical blobs.
    pub fn from_trie_root(root: &TrieNode, info: TrieInfo) -> Self {
        let mut builder = Self::new(info);
        builder.fill_row(0, root);
        builder
    }

    fn fill_row(&mut self, row: usize, node: &TrieNode) {
        if node.end_of_word {
            self.rows[row][0] |= NODE_MASK_EOW;
        }
        for (&ch, child) in &node.children {
            let target = if child.end_of_word && child.children.is_empty() {
                ROW_EOW
            } else {
                let idx = self.rows.len();
                self.rows.push(vec![0]);
                self.fill_row(idx, child);
                idx
            };
            self.wire_char(row, ch, target);
        }
    }

    /// Wire `ch` from `row` to `target`, creating chain-step rows for
    /// multi-byte indices as needed. Chain prefixes are shared between
    /// sibling characters.
    fn wire_char(&mut self, mut row: usize, ch: char, target: usize) {
        let mut seq = Vec::with_capacity(4);
        self.char_index.append_char_steps(ch, &mut seq);
        for &byte in &seq[..seq.len() - 1] {
            row = match self.find_child_slot(row, byte) {
                Some(slot) => (self.rows[row][slot] >> NODE_CHILD_REF_SHIFT) as usize,
                None => {
                    let idx = self.rows.len();
                    self.rows.push(vec![0]);
                    self.rows[row]
                        .push(((idx as u32) << NODE_CHILD_REF_SHIFT) | byte as u32);
                    idx
                }
            };
        }
        let last = seq[seq.len() - 1];
        self.rows[row].push(((target as u32) << NODE_CHILD_REF_SHIFT) | last as u32);
    }

    fn find_child_slot(&self, row: usize, byte: u8) -> Option<usize> {
        let node = &self.rows[row];
        (1..node.len())
            .rev()
            .find(|&i| node[i] & NODE_MASK_CHILD_CHAR_INDEX == byte as u32)
    }

    /// Flatten the rows into the immutable blob, rewriting row numbers into
    /// slot offsets.
    pub fn build(self) -> TrieBlob {
        let mut offsets = Vec::with_capacity(self.rows.len());
        let mut total = 0u64;
        for row in &self.rows {
            offsets.push(total as u32);
            total += row.len() as u64;
        }
        assert!(
            total <= 1 << 24,
            "trie exceeds the 24-bit node offset space"
        );

        let mut nodes = Vec::with_capacity(total as usize);
        for row in &self.rows {
            let count = (row.len() - 1) as u32;
            debug_assert!(count <= NODE_MASK_NUM_CHILDREN);
            nodes.push(count | (row[0] & NODE_MASK_EOW));
            for &entry in &row[1..] {
                let child = (entry >> NODE_CHILD_REF_SHIFT) as usize;
                let byte = entry & NODE_MASK_CHILD_CHAR_INDEX;
                nodes.push((offsets[child] << NODE_CHILD_REF_SHIFT) | byte);
            }
        }
        TrieBlob::from_parts(nodes, self.char_index, self.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(words: &[&str]) -> TrieBlob {
        let mut builder = TrieBuilder::new(TrieInfo::default());
        builder.insert_all(words);
        builder.build()
    }

    #[test]
    fn empty_builder_accepts_nothing() {
        let blob = build(&[]);
        assert!(!blob.has(""));
        assert!(!blob.has("a"));
        assert_eq!(blob.words().count(), 0);
    }

    #[test]
    fn membership_after_build() {
        let blob = build(&["cat", "car", "cart", "dog"]);
        for word in ["cat", "car", "cart", "dog"] {
            assert!(blob.has(word), "missing {word}");
        }
        for word in ["ca", "c", "do", "dogs", "cats", ""] {
            assert!(!blob.has(word), "unexpected {word}");
        }
    }

    #[test]
    fn shared_terminal_splits_when_extended() {
        // "car" ends at the shared leaf; "cart" must split it.
        let blob = build(&["car", "cart"]);
        assert!(blob.has("car"));
        assert!(blob.has("cart"));
    }

    #[test]
    fn prefix_inserted_after_longer_word() {
        let blob = build(&["cart", "car"]);
        assert!(blob.has("car"));
        assert!(blob.has("cart"));
    }

    #[test]
    fn duplicate_inserts_are_idempotent() {
        let a = build(&["one", "two"]);
        let b = build(&["one", "two", "one", "two"]);
        assert_eq!(a.words().collect::<Vec<_>>(), b.words().collect::<Vec<_>>());
    }

    #[test]
    fn builds_from_generic_trie() {
        let words = ["alpha", "beta", "beton"];
        let root = TrieNode::from_words(words);
        let from_tree = TrieBuilder::from_trie_root(&root, TrieInfo::default()).build();
        let from_list = build(&words);
        for word in words {
            assert!(from_tree.has(word));
            assert!(from_list.has(word));
        }
        let mut a: Vec<String> = from_tree.words().collect();
        let mut b: Vec<String> = from_list.words().collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn large_alphabet_uses_chains() {
        let mut builder = TrieBuilder::new(TrieInfo::default());
        let mut words = Vec::new();
        for i in 0..200u32 {
            let ch = char::from_u32(0x0391 + i).unwrap();
            words.push(format!("w{ch}end"));
        }
        builder.insert_all(&words);
        let blob = builder.build();
        for word in &words {
            assert!(blob.has(word), "missing {word}");
        }
        assert!(!blob.has("w\u{1000}end"));
    }

    #[test]
    fn normalizes_on_insert_and_lookup() {
        let blob = build(&["cafe\u{301}"]); // decomposed é
        assert!(blob.has("caf\u{e9}"));
        assert!(blob.has("cafe\u{301}"));
    }
}
