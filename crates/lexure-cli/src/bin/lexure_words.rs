// lexure-words: Dump every word stored in a compiled dictionary.
//
// Usage:
//   lexure-words [-d DICT_PATH]

use std::io::{self, Write};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (dict_path, args) = lexure_cli::parse_dict_path(&args);

    if lexure_cli::wants_help(&args) {
        println!("lexure-words: Dump every word stored in a compiled dictionary.");
        println!();
        println!("Usage: lexure-words [-d DICT_PATH]");
        println!();
        println!("Options:");
        println!("  -d, --dict-path PATH   Compiled dictionary file or directory");
        println!("  -h, --help             Print this help");
        return;
    }

    let blob = lexure_cli::load_blob(dict_path.as_deref())
        .unwrap_or_else(|e| lexure_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    for word in blob.words() {
        let _ = writeln!(out, "{word}");
    }
}
