// lexure-cli: shared utilities for the command-line tools.

use std::path::PathBuf;
use std::process;

use lexure_core::EditCosts;
use lexure_trie::TrieBlob;

/// Default compiled dictionary file name.
pub const DICT_FILE: &str = "lexure.trie";

/// Load a compiled dictionary.
///
/// Search order:
/// 1. `dict_path` argument (a blob file, or a directory containing one)
/// 2. `LEXURE_DICT_PATH` environment variable (file or directory)
/// 3. `lexure.trie` in the current working directory
pub fn load_blob(dict_path: Option<&str>) -> Result<TrieBlob, String> {
    let search_paths = build_search_paths(dict_path);

    for path in &search_paths {
        if path.is_file() {
            let data = std::fs::read(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            return TrieBlob::decode_bin(&data)
                .map_err(|e| format!("failed to decode {}: {e}", path.display()));
        }
    }

    Err(format!(
        "could not find a compiled dictionary in any of:\n{}",
        search_paths
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

/// Build the list of candidate dictionary files.
fn build_search_paths(dict_path: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Explicit path from argument
    if let Some(p) = dict_path {
        let p = PathBuf::from(p);
        if p.is_dir() {
            paths.push(p.join(DICT_FILE));
        } else {
            paths.push(p);
        }
    }

    // 2. LEXURE_DICT_PATH environment variable
    if let Ok(env_path) = std::env::var("LEXURE_DICT_PATH") {
        let p = PathBuf::from(&env_path);
        if p.is_dir() {
            paths.push(p.join(DICT_FILE));
        } else {
            paths.push(p);
        }
    }

    // 3. Current directory
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(DICT_FILE));
    }

    paths
}

/// Load a cost-model override from a JSON file. Missing fields keep their
/// defaults.
pub fn load_costs(path: &str) -> Result<EditCosts, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {path}: {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid cost model in {path}: {e}"))
}

/// Parse a `--dict-path=PATH`, `--dict-path PATH`, or `-d PATH` argument.
///
/// Returns `(dict_path, remaining_args)`.
pub fn parse_dict_path(args: &[String]) -> (Option<String>, Vec<String>) {
    let mut dict_path = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix("--dict-path=") {
            dict_path = Some(val.to_string());
        } else if arg == "--dict-path" || arg == "-d" {
            if i + 1 < args.len() {
                dict_path = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                eprintln!("error: {arg} requires a value");
                process::exit(1);
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (dict_path, remaining)
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
