// lexure-compile: Compile a word list into a binary dictionary.
//
// Reads one word per line from the given file (or stdin) and writes the
// compiled blob.
//
// Usage:
//   lexure-compile [WORDLIST] [-o OUTPUT]
//
// Options:
//   -o, --output PATH   Output file (default: lexure.trie)
//   -h, --help          Print help

use std::io::{self, BufRead};

use lexure_core::TrieInfo;
use lexure_trie::TrieBuilder;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if lexure_cli::wants_help(&args) {
        println!("lexure-compile: Compile a word list into a binary dictionary.");
        println!();
        println!("Usage: lexure-compile [WORDLIST] [-o OUTPUT]");
        println!();
        println!("Reads one word per line from WORDLIST, or from stdin when no");
        println!("file is given.");
        println!();
        println!("Options:");
        println!("  -o, --output PATH   Output file (default: {})", lexure_cli::DICT_FILE);
        println!("  -h, --help          Print this help");
        return;
    }

    let mut output = lexure_cli::DICT_FILE.to_string();
    let mut input: Option<String> = None;
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "-o" || arg == "--output" {
            if i + 1 < args.len() {
                output = args[i + 1].clone();
                skip_next = true;
            } else {
                lexure_cli::fatal("--output requires a value");
            }
        } else if !arg.starts_with('-') {
            input = Some(arg.clone());
        }
    }

    let mut builder = TrieBuilder::new(TrieInfo::default());
    let mut count = 0usize;

    let mut insert_line = |line: &str, builder: &mut TrieBuilder| {
        let word = line.trim();
        if !word.is_empty() {
            builder.insert(word);
            count += 1;
        }
    };

    match input {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| lexure_cli::fatal(&format!("failed to read {path}: {e}")));
            for line in text.lines() {
                insert_line(line, &mut builder);
            }
        }
        None => {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => insert_line(&line, &mut builder),
                    Err(e) => lexure_cli::fatal(&format!("error reading stdin: {e}")),
                }
            }
        }
    }

    let blob = builder.build();
    let bytes = blob.encode_bin();
    std::fs::write(&output, &bytes)
        .unwrap_or_else(|e| lexure_cli::fatal(&format!("failed to write {output}: {e}")));
    println!("{count} words -> {output} ({} bytes)", bytes.len());
}
