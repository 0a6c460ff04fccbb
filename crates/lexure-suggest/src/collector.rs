// Caller-side suggestion policy: count limits, cost ceiling, ties, timeout.
//
// The collector owns everything the engine deliberately does not: it adjusts
// raw path costs for word-length effects, deduplicates on the cheaper cost,
// keeps only the best `num_suggestions` (tracking the cost ceiling that
// implies), feeds the tightened ceiling back into the engine after every
// result, and cancels the engine when the wall clock runs out.

use std::cmp::Ordering;
use std::time::Instant;

use hashbrown::HashMap;

use crate::search::{SuggestOptions, SuggestionResult, SuggestionSearch};

/// Surcharge per word length (index = length); lengths past the table are
/// free. Very short fragments are heavily penalized so a two-word split into
/// one-letter shards never beats a plain edit.
const WORD_LENGTH_COST: [i32; 5] = [0, 50, 25, 5, 0];

/// Surcharge per additional word introduced by a word break.
const EXTRA_WORD_COST: i32 = 5;

/// Ceiling scale: a shade over half the word length, so short words still
/// get suggestions without opening the flood gates.
const MAX_ALLOWED_COST_SCALE: f64 = 1.03 * 0.5;

/// Collects engine results into the final ranked list.
pub struct SuggestionCollector {
    num_suggestions: usize,
    include_ties: bool,
    timeout: std::time::Duration,
    max_cost: i32,
    results: HashMap<String, SuggestionResult>,
}

impl SuggestionCollector {
    pub fn new(word: &str, options: &SuggestOptions) -> Self {
        let len = word.chars().count();
        let scaled = (len as f64 * MAX_ALLOWED_COST_SCALE).min(options.change_limit as f64);
        let max_cost = (options.costs.base_cost as f64 * scaled) as i32;
        Self {
            num_suggestions: options.num_suggestions,
            include_ties: options.include_ties,
            timeout: options.timeout,
            max_cost,
            results: HashMap::new(),
        }
    }

    /// Current cost ceiling; tightens as good suggestions accumulate.
    pub fn max_cost(&self) -> i32 {
        self.max_cost
    }

    /// Drive a search to completion, feeding the ceiling back after every
    /// accepted result and cancelling on timeout.
    pub fn collect(&mut self, search: &mut SuggestionSearch<'_>) {
        let timer = Instant::now();
        while let Some(result) = search.next_suggestion() {
            self.add(result);
            if timer.elapsed() > self.timeout {
                search.cancel();
            }
            search.set_limit(self.max_cost);
        }
    }

    /// Add one raw engine result.
    pub fn add(&mut self, result: SuggestionResult) {
        let adjusted = adjust_cost(result);
        if adjusted.cost > self.max_cost {
            return;
        }
        match self.results.get_mut(&adjusted.word) {
            Some(known) => {
                known.cost = known.cost.min(adjusted.cost);
                known.is_preferred |= adjusted.is_preferred;
            }
            None => {
                let should_trim = adjusted.cost < self.max_cost;
                self.results.insert(adjusted.word.clone(), adjusted);
                if should_trim && self.results.len() > self.num_suggestions {
                    self.trim_to_best();
                }
            }
        }
    }

    /// Keep the best `num_suggestions` entries and lower the ceiling to the
    /// cost of the last survivor. Entries tied with it survive too.
    fn trim_to_best(&mut self) {
        if self.num_suggestions == 0 {
            self.results.clear();
            return;
        }
        if self.results.len() < 2 {
            self.results.clear();
            return;
        }
        let mut sorted: Vec<(String, i32)> = self
            .results
            .values()
            .map(|r| (r.word.clone(), r.cost))
            .collect();
        sorted.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| compare_words(&a.0, &b.0)));
        self.max_cost = sorted[self.num_suggestions - 1].1;
        let mut cut = self.num_suggestions - 1;
        while cut < sorted.len() && sorted[cut].1 <= self.max_cost {
            cut += 1;
        }
        for (word, _) in &sorted[cut..] {
            self.results.remove(word);
        }
    }

    /// The final ranked list: by cost, then length, then lexicographic.
    pub fn suggestions(&self) -> Vec<SuggestionResult> {
        let mut sorted: Vec<SuggestionResult> = self.results.values().cloned().collect();
        sorted.sort_by(compare_results);
        if !self.include_ties && sorted.len() > self.num_suggestions {
            sorted.truncate(self.num_suggestions);
        }
        sorted
    }

    pub fn into_suggestions(self) -> Vec<SuggestionResult> {
        self.suggestions()
    }
}

fn compare_results(a: &SuggestionResult, b: &SuggestionResult) -> Ordering {
    a.cost
        .cmp(&b.cost)
        .then_with(|| compare_words(&a.word, &b.word))
}

fn compare_words(a: &str, b: &str) -> Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| a.cmp(b))
}

/// Word-length adjustment: split results are charged per short fragment and
/// per extra word, so multi-word rewrites only win when genuinely better.
fn adjust_cost(result: SuggestionResult) -> SuggestionResult {
    let mut extra = 0i32;
    let mut word_count = 0i32;
    for part in result
        .word
        .split(|c: char| c == ' ' || c == '+')
    {
        word_count += 1;
        let len = part.chars().count();
        extra += WORD_LENGTH_COST.get(len).copied().unwrap_or(0);
    }
    extra += (word_count - 1) * EXTRA_WORD_COST;
    SuggestionResult {
        cost: result.cost + extra,
        ..result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::CompoundWordsMethod;
    use lexure_core::TrieInfo;
    use lexure_trie::{TrieBlob, TrieBuilder};

    fn build(words: &[&str]) -> TrieBlob {
        let mut builder = TrieBuilder::new(TrieInfo::default());
        builder.insert_all(words);
        builder.build()
    }

    fn sug(word: &str, cost: i32) -> SuggestionResult {
        SuggestionResult {
            word: word.to_string(),
            cost,
            is_preferred: false,
        }
    }

    #[test]
    fn keeps_cheaper_duplicate() {
        let options = SuggestOptions::default();
        let mut collector = SuggestionCollector::new("sample", &options);
        collector.add(sug("simple", 200));
        collector.add(sug("simple", 100));
        collector.add(sug("simple", 150));
        let results = collector.into_suggestions();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].cost, 100);
    }

    #[test]
    fn truncates_to_requested_count() {
        let options = SuggestOptions {
            num_suggestions: 2,
            ..SuggestOptions::default()
        };
        let mut collector = SuggestionCollector::new("sample", &options);
        for (i, word) in ["aaaa", "bbbb", "cccc", "dddd"].iter().enumerate() {
            collector.add(sug(word, 50 + i as i32));
        }
        let results = collector.into_suggestions();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].word, "aaaa");
        assert_eq!(results[1].word, "bbbb");
    }

    #[test]
    fn ceiling_tightens_after_trim() {
        let options = SuggestOptions {
            num_suggestions: 2,
            ..SuggestOptions::default()
        };
        let mut collector = SuggestionCollector::new("longishword", &options);
        let initial = collector.max_cost();
        collector.add(sug("aaaa", 10));
        collector.add(sug("bbbb", 20));
        collector.add(sug("cccc", 30));
        assert!(collector.max_cost() < initial);
        // Nothing above the new ceiling survives or enters.
        collector.add(sug("dddd", collector.max_cost() + 1));
        let results = collector.into_suggestions();
        assert!(results.iter().all(|r| r.cost <= 20));
    }

    #[test]
    fn include_ties_keeps_equal_cost_overflow() {
        let options = SuggestOptions {
            num_suggestions: 2,
            include_ties: true,
            ..SuggestOptions::default()
        };
        let mut collector = SuggestionCollector::new("sample", &options);
        collector.add(sug("aaaa", 50));
        collector.add(sug("bbbb", 60));
        collector.add(sug("cccc", 60));
        let results = collector.into_suggestions();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn split_words_pay_fragment_surcharge() {
        let adjusted = adjust_cost(sug("note book", 99));
        // Two four-letter words: no length surcharge, one extra word.
        assert_eq!(adjusted.cost, 99 + EXTRA_WORD_COST);
        let short = adjust_cost(sug("a note", 99));
        // One-letter fragment costs 50 on top.
        assert_eq!(short.cost, 99 + 50 + EXTRA_WORD_COST);
    }

    #[test]
    fn end_to_end_ranked_output() {
        let trie = build(&["note", "nose", "node", "vote"]);
        let results = crate::suggest(&trie, "note", &SuggestOptions::default());
        assert_eq!(results[0].word, "note");
        assert_eq!(results[0].cost, 0);
        assert!(results.windows(2).all(|w| w[0].cost <= w[1].cost));
    }

    #[test]
    fn end_to_end_word_break() {
        let trie = build(&["note", "book"]);
        let options = SuggestOptions {
            compound_method: CompoundWordsMethod::SeparateWords,
            ..SuggestOptions::default()
        };
        let results = crate::suggest(&trie, "notebook", &options);
        let hit = results.iter().find(|r| r.word == "note book").unwrap();
        assert_eq!(hit.cost, options.costs.word_break + EXTRA_WORD_COST);
    }

    #[test]
    fn monotone_under_rising_change_limit() {
        let trie = build(&["errorcodes"]);
        let tight = crate::suggest(
            &trie,
            "errorcode",
            &SuggestOptions {
                change_limit: 0,
                ..SuggestOptions::default()
            },
        );
        assert!(tight.is_empty());
        let loose = crate::suggest(
            &trie,
            "errorcode",
            &SuggestOptions {
                change_limit: 4,
                ..SuggestOptions::default()
            },
        );
        assert!(!loose.is_empty());
        assert!(loose.windows(2).all(|w| w[0].cost <= w[1].cost));
    }
}
