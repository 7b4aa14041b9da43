//! Load a word list from stdin, then query it.
//!
//! ```bash
//! cargo run --release --example wordlist -- xylophone xylo < /usr/share/dict/words
//! ```
//!
//! Prints the number of words, the stored value for the first argument, and
//! every word starting with the second argument (default `xylot`).

use std::io::{self, BufRead};
use std::ops::ControlFlow;
use std::process::ExitCode;

use bytetrie::Trie;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let find = args.next().unwrap_or_default();
    let prefix = args.next().unwrap_or_else(|| "xylot".to_string());

    let mut trie: Trie<String> = Trie::new();
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        };
        if trie.insert(line.as_bytes(), line.clone()).is_err() {
            println!("error: {line}");
            return ExitCode::FAILURE;
        }
    }

    println!("{} words", trie.len());
    match trie.get(find.as_bytes()) {
        Some(word) => println!("'{word}'"),
        None => println!("'(null)'"),
    }

    let visited = trie.visit(prefix.as_bytes(), |key, _| {
        println!("{}", String::from_utf8_lossy(key));
        ControlFlow::Continue(())
    });
    if let Err(err) = visited {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let size = trie.size().unwrap_or(0);
    println!(
        "{} nodes, {:.3} MiB",
        trie.node_count(),
        size as f64 / 1024.0 / 1024.0
    );
    ExitCode::SUCCESS
}
