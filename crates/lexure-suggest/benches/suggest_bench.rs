// Criterion benchmarks for lookup and suggestion over a small dictionary.
//
// Run:
//   cargo bench -p lexure-suggest

use criterion::{Criterion, criterion_group, criterion_main};

use lexure_core::TrieInfo;
use lexure_suggest::{SuggestOptions, suggest};
use lexure_trie::TrieBlob;

fn wordlist() -> Vec<String> {
    let stems = [
        "act", "band", "cart", "door", "ever", "fact", "gold", "hand", "iron",
        "jump", "kind", "lamp", "moon", "nest", "open", "pond", "quiz", "rust",
        "sand", "tone", "under", "vast", "wind", "xeno", "yarn", "zone",
    ];
    let suffixes = ["", "s", "ed", "ing", "er", "ers", "ly", "less", "ful"];
    let mut words = Vec::with_capacity(stems.len() * suffixes.len());
    for stem in stems {
        for suffix in suffixes {
            words.push(format!("{stem}{suffix}"));
        }
    }
    words
}

fn bench_has(c: &mut Criterion) {
    let words = wordlist();
    let trie = TrieBlob::from_word_list(&words, TrieInfo::default());
    c.bench_function("has_234_words", |b| {
        b.iter(|| {
            for word in &words {
                std::hint::black_box(trie.has(word));
            }
        })
    });
}

fn bench_suggest(c: &mut Criterion) {
    let trie = TrieBlob::from_word_list(wordlist(), TrieInfo::default());
    let options = SuggestOptions::default();
    let typos = ["bandd", "cartes", "dor", "evre", "irno"];
    c.bench_function("suggest_5_misspelled", |b| {
        b.iter(|| {
            for typo in typos {
                std::hint::black_box(suggest(&trie, typo, &options));
            }
        })
    });
}

fn bench_encode_decode(c: &mut Criterion) {
    let trie = TrieBlob::from_word_list(wordlist(), TrieInfo::default());
    let bytes = trie.encode_bin();
    c.bench_function("decode_bin", |b| {
        b.iter(|| std::hint::black_box(TrieBlob::decode_bin(&bytes).unwrap()))
    });
}

criterion_group!(benches, bench_has, bench_suggest, bench_encode_decode);
criterion_main!(benches);
