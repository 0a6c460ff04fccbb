// The immutable trie blob: flat `u32` node table plus symbol table.
//
// Node layout, in order within the table:
//   slot 0:  child count (low 8 bits) | end-of-word flag (bit 8)
//   slot 1+: step byte (low 8 bits) | child node offset (high 24 bits)
//
// Child slot order is insertion-defined, never sorted; traversal scans
// linearly. Offsets address `u32` slots, so a blob can hold at most 2^24
// slots.

use lexure_core::TrieInfo;

use crate::TrieBlobError;
use crate::char_index::{CharIndexTable, normalize_nfc};
use crate::format;
use crate::node::TrieNodeRef;
use crate::trie_node::TrieNode;
use crate::utf8::Utf8Accumulator;

pub const NODE_MASK_NUM_CHILDREN: u32 = 0x0000_00FF;
pub const NODE_MASK_EOW: u32 = 0x0000_0100;
pub const NODE_CHILD_REF_SHIFT: u32 = 8;
pub const NODE_MASK_CHILD_CHAR_INDEX: u32 = 0x0000_00FF;

/// Immutable, array-backed trie.
///
/// Built once by [`crate::TrieBuilder`], then shared read-only: concurrent
/// lookups and suggestion searches borrow the same blob without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct TrieBlob {
    pub(crate) nodes: Vec<u32>,
    pub(crate) char_index: CharIndexTable,
    pub(crate) info: TrieInfo,
}

impl TrieBlob {
    pub(crate) fn from_parts(nodes: Vec<u32>, char_index: CharIndexTable, info: TrieInfo) -> Self {
        Self {
            nodes,
            char_index,
            info,
        }
    }

    /// Build a blob straight from a word stream.
    pub fn from_word_list<I, S>(words: I, info: TrieInfo) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = crate::TrieBuilder::new(info);
        builder.insert_all(words);
        builder.build()
    }

    /// Build a blob from a generic trie tree.
    pub fn from_trie_root(root: &TrieNode, info: TrieInfo) -> Self {
        crate::TrieBuilder::from_trie_root(root, info).build()
    }

    pub fn info(&self) -> &TrieInfo {
        &self.info
    }

    pub fn char_index(&self) -> &CharIndexTable {
        &self.char_index
    }

    /// Number of `u32` slots in the node table.
    pub fn node_slots(&self) -> usize {
        self.nodes.len()
    }

    /// Exact membership test. The word is NFC-normalized; a character absent
    /// from the symbol table means the word cannot be present.
    pub fn has(&self, word: &str) -> bool {
        let normalized = normalize_nfc(word);
        let mut seq = Vec::with_capacity(normalized.len());
        if !self.char_index.encode_word(&normalized, &mut seq) {
            return false;
        }

        let nodes = &self.nodes;
        let mut node_idx = 0usize;
        let mut header = nodes[0];
        for &byte in &seq {
            let count = (header & NODE_MASK_NUM_CHILDREN) as usize;
            let mut next = None;
            for i in (1..=count).rev() {
                let entry = nodes[node_idx + i];
                if entry & NODE_MASK_CHILD_CHAR_INDEX == byte as u32 {
                    next = Some((entry >> NODE_CHILD_REF_SHIFT) as usize);
                    break;
                }
            }
            match next {
                Some(idx) => {
                    node_idx = idx;
                    header = nodes[node_idx];
                }
                None => return false,
            }
        }
        header & NODE_MASK_EOW != 0
    }

    /// Enumerate every stored word. The iterator is restartable (each call
    /// starts fresh) and its order is deterministic for a fixed blob, but
    /// callers must not rely on any particular order.
    pub fn words(&self) -> Words<'_> {
        Words {
            blob: self,
            stack: vec![Frame {
                node_idx: 0,
                pos: 0,
                word_len: 0,
                acc: Utf8Accumulator::new(),
                visited: false,
            }],
            word: String::new(),
        }
    }

    /// View of the root node.
    pub fn root(&self) -> TrieNodeRef<'_> {
        TrieNodeRef::new(self, 0)
    }

    /// Materialize a node view from an opaque id previously obtained from
    /// [`TrieNodeRef::id`], for restartable external walks.
    pub fn resolve_id(&self, id: u32) -> TrieNodeRef<'_> {
        debug_assert!((id as usize) < self.nodes.len());
        TrieNodeRef::new(self, id)
    }

    /// Serialize to the stable binary form.
    pub fn encode_bin(&self) -> Vec<u8> {
        format::encode(self)
    }

    /// Decode a blob previously produced by [`TrieBlob::encode_bin`].
    /// Malformed input is a fatal error; see [`TrieBlobError`].
    pub fn decode_bin(data: &[u8]) -> Result<Self, TrieBlobError> {
        format::decode(data)
    }
}

struct Frame {
    node_idx: u32,
    pos: u32,
    word_len: usize,
    acc: Utf8Accumulator,
    visited: bool,
}

/// Depth-first word enumeration over a [`TrieBlob`].
pub struct Words<'t> {
    blob: &'t TrieBlob,
    stack: Vec<Frame>,
    word: String,
}

impl Iterator for Words<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let top = self.stack.len().checked_sub(1)?;
            let node_idx = self.stack[top].node_idx as usize;
            let header = self.blob.nodes[node_idx];

            if !self.stack[top].visited {
                self.stack[top].visited = true;
                if header & NODE_MASK_EOW != 0 {
                    let len = self.stack[top].word_len;
                    self.word.truncate(len);
                    return Some(self.word.clone());
                }
            }

            let count = header & NODE_MASK_NUM_CHILDREN;
            if self.stack[top].pos >= count {
                self.stack.pop();
                continue;
            }
            self.stack[top].pos += 1;

            let entry = self.blob.nodes[node_idx + self.stack[top].pos as usize];
            let byte = (entry & NODE_MASK_CHILD_CHAR_INDEX) as u8;
            let child = entry >> NODE_CHILD_REF_SHIFT;
            let parent_len = self.stack[top].word_len;
            let mut acc = self.stack[top].acc;

            self.word.truncate(parent_len);
            match acc.decode(byte) {
                Some(idx) => {
                    if let Some(letter) = self.blob.char_index.char_at(idx) {
                        self.word.push_str(letter);
                    }
                    self.stack.push(Frame {
                        node_idx: child,
                        pos: 0,
                        word_len: self.word.len(),
                        acc: Utf8Accumulator::new(),
                        visited: false,
                    });
                }
                None => {
                    // Mid-chain: carry the partial state down unchanged.
                    self.stack.push(Frame {
                        node_idx: child,
                        pos: 0,
                        word_len: parent_len,
                        acc,
                        visited: false,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrieBuilder;

    fn build(words: &[&str]) -> TrieBlob {
        let mut builder = TrieBuilder::new(TrieInfo::default());
        builder.insert_all(words);
        builder.build()
    }

    #[test]
    fn words_yields_every_inserted_word() {
        let words = ["cat", "car", "cart", "dog", "door"];
        let blob = build(&words);
        let mut got: Vec<String> = blob.words().collect();
        got.sort();
        let mut want: Vec<String> = words.iter().map(|s| s.to_string()).collect();
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn words_order_is_deterministic() {
        let blob = build(&["cat", "car", "cart"]);
        let first: Vec<String> = blob.words().collect();
        let second: Vec<String> = blob.words().collect();
        assert_eq!(first, second);
        // Insertion-order DFS: the first word inserted comes out first.
        assert_eq!(first[0], "cat");
    }

    #[test]
    fn words_restart_from_scratch() {
        let blob = build(&["ab", "cd"]);
        let mut iter = blob.words();
        assert!(iter.next().is_some());
        assert_eq!(blob.words().count(), 2);
    }

    #[test]
    fn words_with_chained_alphabet() {
        let mut builder = TrieBuilder::new(TrieInfo::default());
        let mut words: Vec<String> = Vec::new();
        // Mixed Latin/Greek/Hiragana, comfortably past the direct range.
        for i in 0..64u32 {
            words.push(format!("a{}", char::from_u32(0x0391 + i).unwrap()));
        }
        for i in 0..64u32 {
            words.push(format!("b{}", char::from_u32(0x3041 + i).unwrap()));
        }
        for i in 0..26u32 {
            words.push(format!("c{}", char::from_u32('a' as u32 + i).unwrap()));
        }
        builder.insert_all(&words);
        let blob = builder.build();
        assert!(blob.char_index().needs_chaining());

        let mut got: Vec<String> = blob.words().collect();
        got.sort();
        words.sort();
        assert_eq!(got, words);
        for word in &words {
            assert!(blob.has(word), "missing {word}");
        }
    }

    #[test]
    fn has_rejects_prefixes_and_extensions() {
        let blob = build(&["word"]);
        assert!(blob.has("word"));
        assert!(!blob.has("wor"));
        assert!(!blob.has("words"));
        assert!(!blob.has("sword"));
    }

    #[test]
    fn resolve_id_roundtrip() {
        let blob = build(&["ab", "ac"]);
        let root = blob.root();
        let child = root.get('a').unwrap();
        let resolved = blob.resolve_id(child.id());
        assert_eq!(resolved.id(), child.id());
        assert!(resolved.has_child('b'));
        assert!(resolved.has_child('c'));
    }
}
