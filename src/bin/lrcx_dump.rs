//! Print the entries of a `.lrcx` file for inspection.
//!
//! Lines starting with a broken timestamp are listed on stderr.
//!
//! Usage: cargo run --bin `lrcx_dump` -- FILE [--json]

use lyricstamp::error::{Error, Result};
use lyricstamp::lyrics::LrcxCodec;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .ok_or_else(|| Error::config("no file given", "lrcx_dump FILE [--json]"))?;

    let text = fs_err::read_to_string(path)?;
    let parsed = LrcxCodec::parse(&text);

    if json {
        let out = serde_json::to_string_pretty(&parsed.entries).map_err(|e| Error::Msg(e.to_string()))?;
        println!("{out}");
    } else {
        println!("=== {path} ({} entries) ===", parsed.entries.len());
        for (i, entry) in parsed.entries.iter().enumerate() {
            let stamp = entry.timestamp.map_or_else(|| "[--:--.---]".to_string(), |t| t.to_string());
            println!("  {:>3}. {stamp} {}", i + 1, entry.text);
        }
    }

    for problem in &parsed.malformed {
        eprintln!("read as bare text: {problem}");
    }
    Ok(())
}
