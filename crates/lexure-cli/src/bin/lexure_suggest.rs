// lexure-suggest: Generate spelling suggestions for words.
//
// Reads words from stdin (one per line) or from the argument list and
// prints ranked suggestions for misspelled words. Correctly spelled words
// are reported as-is.
//
// Usage:
//   lexure-suggest [-d DICT_PATH] [OPTIONS] [WORD...]
//
// Options:
//   -d, --dict-path PATH       Compiled dictionary file or directory
//   -n, --max-suggestions N    Maximum number of suggestions (default: 10)
//   -c, --change-limit N       Edit budget in whole edits (default: 5)
//   --costs FILE               JSON cost-model override
//   -h, --help                 Print help

use std::io::{self, BufRead, Write};

use lexure_suggest::{SuggestOptions, suggest};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (dict_path, args) = lexure_cli::parse_dict_path(&args);

    if lexure_cli::wants_help(&args) {
        println!("lexure-suggest: Generate spelling suggestions.");
        println!();
        println!("Usage: lexure-suggest [-d DICT_PATH] [OPTIONS] [WORD...]");
        println!();
        println!("If WORD arguments are given, suggests for each word.");
        println!("Otherwise reads words from stdin (one per line).");
        println!();
        println!("Options:");
        println!("  -d, --dict-path PATH      Compiled dictionary file or directory");
        println!("  -n, --max-suggestions N   Maximum number of suggestions (default: 10)");
        println!("  -c, --change-limit N      Edit budget in whole edits (default: 5)");
        println!("  --costs FILE              JSON cost-model override");
        println!("  -h, --help                Print this help");
        return;
    }

    let mut options = SuggestOptions::default();
    let mut words: Vec<String> = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "-n" || arg == "--max-suggestions" {
            if i + 1 < args.len() {
                options.num_suggestions = args[i + 1]
                    .parse()
                    .unwrap_or_else(|_| lexure_cli::fatal("invalid number for --max-suggestions"));
                skip_next = true;
            } else {
                lexure_cli::fatal("--max-suggestions requires a value");
            }
        } else if arg == "-c" || arg == "--change-limit" {
            if i + 1 < args.len() {
                options.change_limit = args[i + 1]
                    .parse()
                    .unwrap_or_else(|_| lexure_cli::fatal("invalid number for --change-limit"));
                skip_next = true;
            } else {
                lexure_cli::fatal("--change-limit requires a value");
            }
        } else if arg == "--costs" {
            if i + 1 < args.len() {
                options.costs = lexure_cli::load_costs(&args[i + 1])
                    .unwrap_or_else(|e| lexure_cli::fatal(&e));
                skip_next = true;
            } else {
                lexure_cli::fatal("--costs requires a value");
            }
        } else if !arg.starts_with('-') {
            words.push(arg.clone());
        }
    }

    let blob = lexure_cli::load_blob(dict_path.as_deref())
        .unwrap_or_else(|e| lexure_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let suggest_word = |word: &str, out: &mut io::BufWriter<io::StdoutLock<'_>>| {
        if blob.has(word) {
            let _ = writeln!(out, "{word} (correct)");
            return;
        }
        let suggestions = suggest(&blob, word, &options);
        if suggestions.is_empty() {
            let _ = writeln!(out, "{word}: (no suggestions)");
        } else {
            let _ = writeln!(out, "{word}:");
            for s in &suggestions {
                let _ = writeln!(out, "  {} ({})", s.word, s.cost);
            }
        }
    };

    if words.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("error reading stdin: {e}");
                    break;
                }
            };
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            suggest_word(word, &mut out);
        }
    } else {
        for word in &words {
            suggest_word(word, &mut out);
        }
    }
}
