// Lazily memoizing node views over the raw blob arrays.
//
// A view never copies the node table; derived data (resolved entries, the
// char-to-slot map, the chained/direct classification) is computed on first
// access, cached in the view, and shared with clones through `Rc`. Views are
// per-query values: the blob itself is freely shared across threads, the
// views are not.

use std::cell::OnceCell;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::blob::{
    NODE_CHILD_REF_SHIFT, NODE_MASK_CHILD_CHAR_INDEX, NODE_MASK_EOW, NODE_MASK_NUM_CHILDREN,
    TrieBlob,
};
use crate::utf8::Utf8Accumulator;

/// Read-only view of one trie node.
#[derive(Clone)]
pub struct TrieNodeRef<'t> {
    blob: &'t TrieBlob,
    node_idx: u32,
    header: u32,
    entries: OnceCell<Rc<[(char, u32)]>>,
    keys: OnceCell<Rc<[char]>>,
    char_map: OnceCell<Rc<HashMap<char, u32>>>,
    chained: OnceCell<bool>,
}

impl<'t> TrieNodeRef<'t> {
    pub(crate) fn new(blob: &'t TrieBlob, node_idx: u32) -> Self {
        let header = blob.nodes[node_idx as usize];
        Self {
            blob,
            node_idx,
            header,
            entries: OnceCell::new(),
            keys: OnceCell::new(),
            char_map: OnceCell::new(),
            chained: OnceCell::new(),
        }
    }

    /// Opaque node id, resolvable through [`TrieBlob::resolve_id`].
    pub fn id(&self) -> u32 {
        self.node_idx
    }

    /// End-of-word flag: a complete accepted word ends at this node.
    pub fn eow(&self) -> bool {
        self.header & NODE_MASK_EOW != 0
    }

    /// Raw child slot count. For chained nodes this counts first-level
    /// chain steps, not resolved characters; see [`TrieNodeRef::size`].
    fn raw_count(&self) -> u32 {
        self.header & NODE_MASK_NUM_CHILDREN
    }

    pub fn has_children(&self) -> bool {
        self.raw_count() > 0
    }

    /// Number of child characters reachable from this node.
    pub fn size(&self) -> usize {
        self.node_entries().len()
    }

    /// Child symbols in stored order.
    pub fn keys(&self) -> impl Iterator<Item = char> {
        let keys = self.shared_keys();
        (0..keys.len()).map(move |i| keys[i])
    }

    /// The child symbols as a shared slice; repeated calls return the same
    /// allocation.
    pub fn shared_keys(&self) -> Rc<[char]> {
        Rc::clone(self.keys.get_or_init(|| {
            self.node_entries().iter().map(|&(ch, _)| ch).collect()
        }))
    }

    /// `(symbol, child)` pairs in stored order.
    pub fn entries(&self) -> impl Iterator<Item = (char, TrieNodeRef<'t>)> {
        let pairs = Rc::clone(self.node_entries());
        let blob = self.blob;
        (0..pairs.len()).map(move |i| {
            let (ch, idx) = pairs[i];
            (ch, TrieNodeRef::new(blob, idx))
        })
    }

    /// Child views in stored order.
    pub fn values(&self) -> impl Iterator<Item = TrieNodeRef<'t>> {
        self.entries().map(|(_, node)| node)
    }

    /// Child view for a symbol, if present.
    pub fn get(&self, ch: char) -> Option<TrieNodeRef<'t>> {
        let slot = *self.char_slot_map().get(&ch)?;
        Some(self.child(slot as usize))
    }

    pub fn has_child(&self, ch: char) -> bool {
        self.char_slot_map().contains_key(&ch)
    }

    /// Child view by slot index (the position within [`TrieNodeRef::keys`]).
    ///
    /// Panics if `slot` is out of range, like any slice index.
    pub fn child(&self, slot: usize) -> TrieNodeRef<'t> {
        if !self.contains_chained() && self.entries.get().is_none() {
            // Direct node, entries not resolved yet: a plain shift decode
            // is cheaper than materializing the entry table.
            let entry = self.blob.nodes[self.node_idx as usize + 1 + slot];
            return TrieNodeRef::new(self.blob, entry >> NODE_CHILD_REF_SHIFT);
        }
        let (_, idx) = self.node_entries()[slot];
        TrieNodeRef::new(self.blob, idx)
    }

    /// Classify the node once: `true` if any child slot starts a multi-byte
    /// chain.
    fn contains_chained(&self) -> bool {
        *self.chained.get_or_init(|| {
            if self.raw_count() == 0 || !self.blob.char_index.needs_chaining() {
                return false;
            }
            let offset = self.node_idx as usize;
            (1..=self.raw_count() as usize).any(|i| {
                let byte = (self.blob.nodes[offset + i] & NODE_MASK_CHILD_CHAR_INDEX) as u8;
                Utf8Accumulator::is_multi_byte(byte)
            })
        })
    }

    fn node_entries(&self) -> &Rc<[(char, u32)]> {
        self.entries.get_or_init(|| {
            if self.contains_chained() {
                self.walk_chained_entries().into()
            } else {
                self.direct_entries().into()
            }
        })
    }

    fn direct_entries(&self) -> Vec<(char, u32)> {
        let offset = self.node_idx as usize;
        let count = self.raw_count() as usize;
        let mut out = Vec::with_capacity(count);
        for i in 1..=count {
            let entry = self.blob.nodes[offset + i];
            let idx = entry & NODE_MASK_CHILD_CHAR_INDEX;
            let letter = self
                .blob
                .char_index
                .char_at(idx)
                .and_then(|s| s.chars().next());
            if let Some(ch) = letter {
                out.push((ch, entry >> NODE_CHILD_REF_SHIFT));
            }
        }
        out
    }

    /// Resolve a node whose children include chain steps: walk each chain
    /// down to its completion, branching the accumulator per child.
    fn walk_chained_entries(&self) -> Vec<(char, u32)> {
        struct ChainFrame {
            next: u32,
            last: u32,
            acc: Utf8Accumulator,
        }

        let nodes = &self.blob.nodes;
        let count = self.raw_count();
        let mut out = Vec::with_capacity(count as usize);
        let mut stack = vec![ChainFrame {
            next: self.node_idx + 1,
            last: self.node_idx + count,
            acc: Utf8Accumulator::new(),
        }];

        loop {
            let Some(top) = stack.len().checked_sub(1) else {
                break;
            };
            if stack[top].next > stack[top].last {
                stack.pop();
                continue;
            }
            let entry = nodes[stack[top].next as usize];
            stack[top].next += 1;
            let byte = (entry & NODE_MASK_CHILD_CHAR_INDEX) as u8;
            let child = entry >> NODE_CHILD_REF_SHIFT;
            let mut acc = stack[top].acc;
            match acc.decode(byte) {
                Some(idx) => {
                    let letter = self
                        .blob
                        .char_index
                        .char_at(idx)
                        .and_then(|s| s.chars().next());
                    if let Some(ch) = letter {
                        out.push((ch, child));
                    }
                }
                None => {
                    let child_count = nodes[child as usize] & NODE_MASK_NUM_CHILDREN;
                    stack.push(ChainFrame {
                        next: child + 1,
                        last: child + child_count,
                        acc,
                    });
                }
            }
        }
        out
    }

    fn char_slot_map(&self) -> &Rc<HashMap<char, u32>> {
        self.char_map.get_or_init(|| {
            let entries = self.node_entries();
            let mut map = HashMap::with_capacity(entries.len());
            for (i, &(ch, _)) in entries.iter().enumerate() {
                map.insert(ch, i as u32);
            }
            Rc::new(map)
        })
    }
}

impl std::fmt::Debug for TrieNodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrieNodeRef")
            .field("id", &self.node_idx)
            .field("eow", &self.eow())
            .field("raw_count", &self.raw_count())
            .finish()
    }
}
