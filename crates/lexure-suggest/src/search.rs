// Cost-guided best-first suggestion search.
//
// The engine walks node views of a compiled trie, expanding one edit per
// step: match, double-letter collapse, delete, replace, swap, word break,
// compound restart, insert. Candidate paths live in a pairing heap keyed by
// a cost/depth balance; finished words land in a second heap ordered by
// suggestion quality. A per-path cost trie drops any path that reaches a
// (node, source-index) pair no cheaper than an earlier path with the same
// residual symbol.
//
// The caller drives the engine one suggestion at a time through
// `next_suggestion`, may tighten the numeric cost limit between steps with
// `set_limit`, and stops it with `cancel`. The engine itself knows nothing
// about suggestion counts or wall clocks; that policy sits in the collector.

use std::cmp::Ordering;
use std::rc::Rc;
use std::time::Duration;

use hashbrown::HashMap;

use lexure_core::{EditCosts, VisualLetterMap};
use lexure_trie::{TrieBlob, TrieNodeRef};

/// Separator spelled into results when a legacy word break joins two words.
pub const JOIN_SEPARATOR: &str = "+";
/// Separator spelled into results when a legacy word break splits words.
pub const WORD_SEPARATOR: &str = " ";

/// How the search may stitch dictionary words together mid-token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompoundWordsMethod {
    /// No legacy word joining.
    #[default]
    None,
    /// Restart at the root mid-word, spelling a space between the parts.
    SeparateWords,
    /// Restart at the root mid-word, spelling `+` between the parts.
    JoinWords,
}

/// Options for one suggestion query.
#[derive(Debug, Clone)]
pub struct SuggestOptions {
    /// Number of best suggestions the collector keeps.
    pub num_suggestions: usize,
    /// Edit budget in whole edits; the numeric cost ceiling is derived from
    /// it.
    pub change_limit: usize,
    /// Keep suggestions tied with the last kept one even past
    /// `num_suggestions`.
    pub include_ties: bool,
    /// Also search the case/accent-folded shadow dictionary.
    pub ignore_case: bool,
    pub compound_method: CompoundWordsMethod,
    /// Wall-clock budget enforced by the collector.
    pub timeout: Duration,
    pub costs: EditCosts,
    pub visual: VisualLetterMap,
    /// Node-expansion window of the runaway valve: every `window`
    /// expansions the search must have produced new results, or it stops.
    pub node_budget_window: u32,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            num_suggestions: 10,
            change_limit: 5,
            include_ties: false,
            ignore_case: true,
            compound_method: CompoundWordsMethod::None,
            timeout: Duration::from_millis(1000),
            costs: EditCosts::default(),
            visual: VisualLetterMap::standard(),
            node_budget_window: 1000,
        }
    }
}

/// One ranked correction candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionResult {
    pub word: String,
    pub cost: i32,
    /// Reserved for dictionaries that mark preferred replacements; ordered
    /// ahead of equal-cost results.
    pub is_preferred: bool,
}

/// Edit applied on the step that created a path node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditAction {
    Start,
    Match,
    DoubleLetter,
    Delete,
    Replace,
    WordBreak,
    Swap,
    Compound,
    CompoundFolded,
    Insert,
}

/// Search path state; nodes form parent-linked chains inside a per-query
/// arena so finished words can be spelled back.
struct PathNode<'t> {
    node: TrieNodeRef<'t>,
    cost: i32,
    i: u32,
    letter: String,
    parent: Option<u32>,
    trie: u32,
    #[allow(dead_code)]
    action: EditAction,
}

/// Heap key for a path: everything the path comparator needs, inline.
#[derive(Debug, Clone, Copy)]
struct PathKey {
    cost: i32,
    i: u32,
    id: u32,
}

/// Result heap entry with the tie-break distance precomputed.
struct ResultEntry {
    word: String,
    cost: i32,
    is_preferred: bool,
    first_dist: u32,
}

/// Per-path accumulated-cost trie node (arena-linked).
struct CostTrieNode {
    /// Best cost seen per source index; `i32::MAX` = untouched.
    costs: Vec<i32>,
    children: HashMap<char, u32>,
}

impl CostTrieNode {
    fn new(len: usize) -> Self {
        Self {
            costs: vec![i32::MAX; len],
            children: HashMap::new(),
        }
    }
}

/// Balance cost against depth: a deep, cheap path beats a shallow one even
/// at slightly higher absolute cost.
fn compare_paths(a: &PathKey, b: &PathKey) -> Ordering {
    let va = a.cost as f64 / (a.i as f64 + 1.0);
    let vb = b.cost as f64 / (b.i as f64 + 1.0);
    (va - vb + (b.i as f64 - a.i as f64)).total_cmp(&0.0)
}

/// Preferred first, then cheaper, then the word whose first character is
/// numerically closest to the source word's first character.
fn compare_results(a: &ResultEntry, b: &ResultEntry) -> Ordering {
    b.is_preferred
        .cmp(&a.is_preferred)
        .then(a.cost.cmp(&b.cost))
        .then(a.first_dist.cmp(&b.first_dist))
}

/// The suggestion engine for one query.
///
/// Also usable as an `Iterator<Item = SuggestionResult>`; the results arrive
/// best-first per drain but are not globally sorted, and duplicates of an
/// already-emitted word reappear only when cheaper.
pub struct SuggestionSearch<'t> {
    src: Vec<char>,
    src_first: u32,
    costs: EditCosts,
    visual: VisualLetterMap,
    special: [char; 3],
    compound_method: CompoundWordsMethod,
    word_separator: &'static str,
    comp_char: char,
    root: TrieNodeRef<'t>,
    comp_root: Option<TrieNodeRef<'t>>,
    comp_root_folded: Option<TrieNodeRef<'t>>,
    paths: Vec<PathNode<'t>>,
    cost_tries: Vec<CostTrieNode>,
    path_heap: PairingHeapPaths,
    result_heap: PairingHeapResults,
    emitted: HashMap<String, i32>,
    limit: i32,
    nodes_processed: u32,
    nodes_budget: u32,
    budget_window: u32,
    min_gen: u32,
    suggestions_generated: u32,
    stopped: bool,
}

type PairingHeapPaths = crate::PairingHeap<PathKey, fn(&PathKey, &PathKey) -> Ordering>;
type PairingHeapResults =
    crate::PairingHeap<ResultEntry, fn(&ResultEntry, &ResultEntry) -> Ordering>;

impl<'t> SuggestionSearch<'t> {
    pub fn new(trie: &'t TrieBlob, word: &str, options: &SuggestOptions) -> Self {
        let src: Vec<char> = word.chars().collect();
        let info = *trie.info();
        let root = trie.root();
        let folded_root = if options.ignore_case {
            root.get(info.strip_case_and_accents_prefix)
        } else {
            None
        };
        let comp_root = root.get(info.compound_character);
        let comp_root_folded = folded_root
            .as_ref()
            .and_then(|r| r.get(info.compound_character));
        let word_separator = match options.compound_method {
            CompoundWordsMethod::JoinWords => JOIN_SEPARATOR,
            _ => WORD_SEPARATOR,
        };
        let limit = options.costs.initial_limit(src.len(), options.change_limit);

        let mut search = Self {
            src_first: src.first().map(|&c| c as u32).unwrap_or(0),
            src,
            costs: options.costs,
            visual: options.visual.clone(),
            special: info.special_characters(),
            compound_method: options.compound_method,
            word_separator,
            comp_char: info.compound_character,
            root: root.clone(),
            comp_root,
            comp_root_folded,
            paths: Vec::new(),
            cost_tries: Vec::new(),
            path_heap: crate::PairingHeap::new(compare_paths),
            result_heap: crate::PairingHeap::new(compare_results),
            emitted: HashMap::new(),
            limit,
            nodes_processed: 0,
            nodes_budget: options.node_budget_window,
            budget_window: options.node_budget_window.max(1),
            min_gen: 1,
            suggestions_generated: 0,
            stopped: false,
        };
        search.push_start(root);
        if let Some(folded) = folded_root {
            search.push_start(folded);
        }
        search
    }

    /// Current numeric cost ceiling.
    pub fn limit(&self) -> i32 {
        self.limit
    }

    /// Tighten the cost ceiling. Limits only ever decrease; a looser value
    /// is ignored.
    pub fn set_limit(&mut self, limit: i32) {
        self.limit = self.limit.min(limit);
    }

    /// Stop the search; every later call yields `None`.
    pub fn cancel(&mut self) {
        self.stopped = true;
    }

    /// Advance the search until the next acceptable suggestion.
    ///
    /// Returns `None` once the search space is exhausted, the runaway valve
    /// trips, or the search was cancelled.
    pub fn next_suggestion(&mut self) -> Option<SuggestionResult> {
        if self.stopped {
            return None;
        }
        loop {
            // Drain results queued so far, best first.
            while let Some(entry) = self.result_heap.dequeue() {
                self.suggestions_generated += 1;
                if entry.cost > self.limit {
                    continue;
                }
                if let Some(&prev) = self.emitted.get(&entry.word) {
                    if prev <= entry.cost {
                        continue;
                    }
                }
                self.emitted.insert(entry.word.clone(), entry.cost);
                return Some(SuggestionResult {
                    word: entry.word,
                    cost: entry.cost,
                    is_preferred: entry.is_preferred,
                });
            }

            // Expand the next viable path.
            let best = loop {
                let Some(key) = self.path_heap.dequeue() else {
                    self.stopped = true;
                    return None;
                };
                self.nodes_processed += 1;
                if self.nodes_processed > self.nodes_budget {
                    self.nodes_budget += self.budget_window;
                    if self.suggestions_generated < self.min_gen {
                        // A full window passed without a new result.
                        self.stopped = true;
                        return None;
                    }
                    self.min_gen += self.suggestions_generated;
                }
                if key.cost > self.limit {
                    continue;
                }
                break key;
            };
            self.process_path(best);
        }
    }

    fn push_start(&mut self, node: TrieNodeRef<'t>) {
        let trie = self.new_cost_trie();
        let id = self.paths.len() as u32;
        self.paths.push(PathNode {
            node,
            cost: 0,
            i: 0,
            letter: String::new(),
            parent: None,
            trie,
            action: EditAction::Start,
        });
        self.path_heap.add(PathKey { cost: 0, i: 0, id });
    }

    fn new_cost_trie(&mut self) -> u32 {
        let id = self.cost_tries.len() as u32;
        self.cost_tries.push(CostTrieNode::new(self.src.len() + 2));
        id
    }

    fn process_path(&mut self, key: PathKey) {
        let (node, i, cost, trie) = {
            let p = &self.paths[key.id as usize];
            (p.node.clone(), p.i as usize, p.cost, p.trie)
        };

        if node.eow() && i == self.src.len() {
            let word = self.spell_path(key.id);
            let first_dist = word
                .chars()
                .next()
                .map(|c| (c as u32).abs_diff(self.src_first))
                .unwrap_or(0);
            self.result_heap.add(ResultEntry {
                word,
                cost,
                is_preferred: false,
                first_dist,
            });
        }

        self.calc_edges(key.id, node, i, cost, trie);
    }

    /// Queue every edit reachable from one path node.
    fn calc_edges(&mut self, p_id: u32, node: TrieNodeRef<'t>, i: usize, cost0: i32, trie: u32) {
        let keys: Rc<[char]> = node.shared_keys();
        let s = self.src.get(i).copied();
        let cost = cost0 + self.costs.base_cost - i as i32
            + if i == 0 { self.costs.first_letter_bias } else { 0 };
        let cost_vis = cost0 + self.costs.visually_similar;
        let cost_word_break = cost0 + self.costs.word_break;
        let cost_compound = cost0 + self.costs.compound;

        if let Some(sc) = s {
            let sg = self.visual.mask(sc);
            let m_idx = keys.iter().position(|&k| k == sc);

            // Match
            if let Some(m) = m_idx {
                let child = node.child(m);
                self.store_path(trie, child, i + 1, cost0, &sc.to_string(), p_id, EditAction::Match);
            }

            // Doubled letter consumed by one edge
            let ns = self.src.get(i + 1).copied();
            if let Some(m) = m_idx {
                if ns == Some(sc) {
                    let child = node.child(m);
                    self.store_path(
                        trie,
                        child,
                        i + 2,
                        cost0 + self.costs.duplicate_letter_cost,
                        &sc.to_string(),
                        p_id,
                        EditAction::DoubleLetter,
                    );
                }
            }

            // Delete
            self.store_path(trie, node.clone(), i + 1, cost, "", p_id, EditAction::Delete);

            // Replace
            for (j, &ch) in keys.iter().enumerate() {
                if Some(j) == m_idx || self.is_special(ch) {
                    continue;
                }
                let c = if sg != 0 && sg & self.visual.mask(ch) != 0 {
                    cost_vis
                } else {
                    cost
                };
                let child = node.child(j);
                self.store_path(trie, child, i + 1, c, &ch.to_string(), p_id, EditAction::Replace);
            }

            // Legacy word break
            if node.eow() && i > 0 && self.compound_method != CompoundWordsMethod::None {
                let root = self.root.clone();
                let separator = self.word_separator;
                self.store_path(
                    trie,
                    root,
                    i,
                    cost_word_break,
                    separator,
                    p_id,
                    EditAction::WordBreak,
                );
            }

            // Swap
            if let Some(nsc) = ns {
                if let Some(n2) = node.get(nsc).and_then(|n1| n1.get(sc)) {
                    let pair: String = [nsc, sc].iter().collect();
                    self.store_path(
                        trie,
                        n2,
                        i + 2,
                        cost0 + self.costs.swap_cost,
                        &pair,
                        p_id,
                        EditAction::Swap,
                    );
                }
            }
        }

        // Compound restart through the marker edge
        if cost_compound <= self.limit && node.has_child(self.comp_char) {
            if let Some(folded) = self.comp_root_folded.clone() {
                self.store_path_keyed(
                    trie,
                    folded,
                    i,
                    cost_compound,
                    "",
                    "~+",
                    p_id,
                    EditAction::CompoundFolded,
                );
            }
            if let Some(comp_root) = self.comp_root.clone() {
                self.store_path_keyed(
                    trie,
                    comp_root,
                    i,
                    cost_compound,
                    "",
                    "+",
                    p_id,
                    EditAction::Compound,
                );
            }
        }

        // Insert
        if cost <= self.limit {
            for (j, &ch) in keys.iter().enumerate() {
                if self.is_special(ch) {
                    continue;
                }
                let child = node.child(j);
                self.store_path(trie, child, i, cost, &ch.to_string(), p_id, EditAction::Insert);
            }
        }
    }

    fn is_special(&self, ch: char) -> bool {
        self.special.contains(&ch)
    }

    fn store_path(
        &mut self,
        trie: u32,
        node: TrieNodeRef<'t>,
        i: usize,
        cost: i32,
        letter: &str,
        parent: u32,
        action: EditAction,
    ) {
        self.store_path_keyed(trie, node, i, cost, letter, letter, parent, action);
    }

    /// Queue a path step unless a no-worse path already reached the same
    /// (cost-trie, source-index) slot, or the cost busts the limit. `key`
    /// names the residual symbol in the cost trie; it usually equals
    /// `letter` but differs for compound restarts (which spell nothing).
    #[allow(clippy::too_many_arguments)]
    fn store_path_keyed(
        &mut self,
        trie: u32,
        node: TrieNodeRef<'t>,
        i: usize,
        cost: i32,
        letter: &str,
        key: &str,
        parent: u32,
        action: EditAction,
    ) {
        if cost > self.limit {
            return;
        }
        let target = self.cost_trie_child(trie, key);
        let slot = &mut self.cost_tries[target as usize].costs[i];
        if *slot <= cost {
            return;
        }
        *slot = cost;

        let id = self.paths.len() as u32;
        self.paths.push(PathNode {
            node,
            cost,
            i: i as u32,
            letter: letter.to_string(),
            parent: Some(parent),
            trie: target,
            action,
        });
        self.path_heap.add(PathKey {
            cost,
            i: i as u32,
            id,
        });
    }

    /// Walk (and extend) the cost trie along `key`.
    fn cost_trie_child(&mut self, from: u32, key: &str) -> u32 {
        let mut current = from;
        for ch in key.chars() {
            let found = self.cost_tries[current as usize].children.get(&ch).copied();
            current = match found {
                Some(next) => next,
                None => {
                    let id = self.cost_tries.len() as u32;
                    let len = self.src.len() + 2;
                    self.cost_tries.push(CostTrieNode::new(len));
                    self.cost_tries[current as usize].children.insert(ch, id);
                    id
                }
            };
        }
        current
    }

    /// Spell a finished path by walking its parent chain.
    fn spell_path(&self, mut id: u32) -> String {
        let mut parts: Vec<&str> = Vec::new();
        loop {
            let p = &self.paths[id as usize];
            parts.push(&p.letter);
            match p.parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
        parts.reverse();
        parts.concat()
    }
}

impl Iterator for SuggestionSearch<'_> {
    type Item = SuggestionResult;

    fn next(&mut self) -> Option<SuggestionResult> {
        self.next_suggestion()
    }
}
