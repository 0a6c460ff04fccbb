// lexure-lookup: Exact membership queries against a compiled dictionary.
//
// Usage:
//   lexure-lookup [-d DICT_PATH] [WORD...]
//
// If WORD arguments are given, checks each word. Otherwise reads words from
// stdin (one per line). Exits 0 when every queried word is known, 1
// otherwise.

use std::io::{self, BufRead, Write};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (dict_path, args) = lexure_cli::parse_dict_path(&args);

    if lexure_cli::wants_help(&args) {
        println!("lexure-lookup: Exact membership queries.");
        println!();
        println!("Usage: lexure-lookup [-d DICT_PATH] [WORD...]");
        println!();
        println!("If WORD arguments are given, checks each word.");
        println!("Otherwise reads words from stdin (one per line).");
        println!();
        println!("Options:");
        println!("  -d, --dict-path PATH   Compiled dictionary file or directory");
        println!("  -h, --help             Print this help");
        return;
    }

    let blob = lexure_cli::load_blob(dict_path.as_deref())
        .unwrap_or_else(|e| lexure_cli::fatal(&e));

    let words: Vec<String> = args.iter().filter(|a| !a.starts_with('-')).cloned().collect();

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut all_known = true;

    let mut check = |word: &str, out: &mut io::BufWriter<io::StdoutLock<'_>>| {
        if blob.has(word) {
            let _ = writeln!(out, "{word}: ok");
        } else {
            all_known = false;
            let _ = writeln!(out, "{word}: not found");
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
            check(word, &mut out);
        }
    } else {
        for word in &words {
            check(word, &mut out);
        }
    }

    drop(out);
    if !all_known {
        std::process::exit(1);
    }
}
