//! Compact binary trie store.
//!
//! This crate holds the array-backed character trie behind the Lexure word
//! lookup engine: a word list is compiled once into an immutable
//! [`TrieBlob`] (a flat `u32` table with bit-packed child references), which
//! then answers membership queries, enumerates its words, and round-trips
//! through a stable binary encoding.
//!
//! # Architecture
//!
//! - [`utf8`] -- Incremental decoder for chained multi-byte symbol indices
//! - [`char_index`] -- Symbol table mapping characters to step indices
//! - [`trie_node`] -- Generic in-memory trie, an alternative build input
//! - [`builder`] -- Word list / trie tree to blob compilation
//! - [`blob`] -- The immutable blob: `has`, `words`, bit layout
//! - [`node`] -- Lazily memoizing node views over the blob
//! - [`format`] -- Binary header, encode/decode, structural validation

pub mod blob;
pub mod builder;
pub mod char_index;
pub mod format;
pub mod node;
pub mod trie_node;
pub mod utf8;

pub use blob::{
    NODE_CHILD_REF_SHIFT, NODE_MASK_CHILD_CHAR_INDEX, NODE_MASK_EOW, NODE_MASK_NUM_CHILDREN,
    TrieBlob, Words,
};
pub use builder::TrieBuilder;
pub use char_index::CharIndexTable;
pub use node::TrieNodeRef;
pub use trie_node::TrieNode;
pub use utf8::Utf8Accumulator;

/// Error type for decoding and validating binary trie blobs.
///
/// Every variant is fatal: a blob that fails to decode must be rebuilt or
/// re-fetched, there is no partial-recovery mode. Lookup misses are ordinary
/// `false`/`None` results and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum TrieBlobError {
    #[error("invalid signature in trie blob header")]
    InvalidSignature,
    #[error("blob too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("endian marker mismatch: blob was written on an incompatible platform")]
    EndianMismatch,
    #[error("{section} section at {offset}..{end} exceeds blob of {len} bytes")]
    SectionOutOfBounds {
        section: &'static str,
        offset: usize,
        end: usize,
        len: usize,
    },
    #[error("node table offset is not 4-byte aligned")]
    MisalignedNodeTable,
    #[error("node table is empty")]
    EmptyNodeTable,
    #[error("node table truncated: last node runs to slot {expected}, table has {actual}")]
    NodeTableTruncated { expected: usize, actual: usize },
    #[error("invalid character table: {0}")]
    InvalidCharIndex(String),
    #[error("invalid code point {0:#x} in trie info")]
    InvalidInfoCodePoint(u32),
    #[error("node at slot {node} references {reference}, which is not a node start")]
    NodeRefInvalid { node: u32, reference: u32 },
}
