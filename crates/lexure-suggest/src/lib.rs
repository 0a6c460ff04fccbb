//! Cost-guided suggestion search over a compiled trie.
//!
//! Given a [`lexure_trie::TrieBlob`] and a misspelled token, this crate
//! produces ranked correction candidates within a bounded edit-cost budget.
//!
//! # Architecture
//!
//! - [`pairing_heap`] -- Meldable priority queue used by the search
//! - [`search`] -- The best-first engine: one step per suggestion, with
//!   caller-driven limit tightening and cancellation
//! - [`collector`] -- Caller-side policy: count limits, ties, timeout
//!
//! The engine/collector split mirrors how the pieces are used: the engine
//! only understands numeric cost limits, everything user-facing (how many
//! suggestions, how long to wait) lives in the collector.

pub mod collector;
pub mod pairing_heap;
pub mod search;

pub use collector::SuggestionCollector;
pub use pairing_heap::PairingHeap;
pub use search::{
    CompoundWordsMethod, SuggestOptions, SuggestionResult, SuggestionSearch,
};

use lexure_trie::TrieBlob;

/// Produce ranked suggestions for `word`, best first.
///
/// This is the plain entry point: it wires a [`SuggestionSearch`] to a
/// [`SuggestionCollector`] and runs the search to completion (or timeout).
pub fn suggest(trie: &TrieBlob, word: &str, options: &SuggestOptions) -> Vec<SuggestionResult> {
    let mut search = SuggestionSearch::new(trie, word, options);
    let mut collector = SuggestionCollector::new(word, options);
    collector.collect(&mut search);
    collector.into_suggestions()
}
