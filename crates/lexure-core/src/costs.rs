// Edit-operation cost model for the suggestion search.

use serde::{Deserialize, Serialize};

/// Numeric penalties for each edit operation considered by the suggestion
/// search.
///
/// All values are externally configurable; the search itself never hard-codes
/// a cost. The scale is anchored by `base_cost`: one "full" edit costs 100,
/// and the caller-facing change limit is expressed in multiples of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditCosts {
    /// Cost of one plain edit (insert, delete, substitute).
    pub base_cost: i32,
    /// Cost of substituting a visually similar character (diacritic or
    /// confusable class), replacing `base_cost` for that edit.
    pub visually_similar: i32,
    /// Cost of collapsing a doubled letter into one trie step.
    pub duplicate_letter_cost: i32,
    /// Cost of transposing two adjacent characters.
    pub swap_cost: i32,
    /// Cost of restarting at the trie root mid-word (legacy word join).
    pub word_break: i32,
    /// Cost of crossing a compound-marker edge to the compound root.
    pub compound: i32,
    /// Extra cost added when the very first character is edited.
    pub first_letter_bias: i32,
    /// Scale factor applied to the word length when deriving the initial
    /// cost ceiling (`base_cost * min(len * factor, change_limit)`).
    pub word_length_cost_factor: f64,
}

impl Default for EditCosts {
    fn default() -> Self {
        Self {
            base_cost: 100,
            visually_similar: 1,
            duplicate_letter_cost: 80,
            swap_cost: 75,
            word_break: 99,
            compound: 1,
            first_letter_bias: 5,
            word_length_cost_factor: 0.5,
        }
    }
}

impl EditCosts {
    /// Initial cost ceiling for a word of `len` characters with the given
    /// change limit.
    pub fn initial_limit(&self, len: usize, change_limit: usize) -> i32 {
        let scaled = (len as f64 * self.word_length_cost_factor).min(change_limit as f64);
        (self.base_cost as f64 * scaled) as i32
    }
}
