//! `finlens key` subcommands.

use std::io::{BufRead, Write};

use anyhow::{bail, Context};

use crate::cli::KeyAction;
use crate::keystore;

pub fn handle(action: KeyAction) -> anyhow::Result<()> {
    match action {
        KeyAction::Set { key } => {
            let key = match key {
                Some(k) => k,
                None => prompt_for_key()?,
            };
            let key = key.trim();
            if key.is_empty() {
                bail!("API key must not be empty");
            }
            keystore::set_api_key(key)?;
            println!("API key stored in the OS keychain.");
        }
        KeyAction::Show => match keystore::get_api_key()? {
            Some(key) => println!("{}", mask(&key)),
            None => println!("No API key stored."),
        },
        KeyAction::Delete => {
            keystore::delete_api_key()?;
            println!("API key removed. The next analysis will ask for a new one.");
        }
    }
    Ok(())
}

fn prompt_for_key() -> anyhow::Result<String> {
    print!("Gemini API key: ");
    std::io::stdout().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read API key from stdin")?;
    Ok(line)
}

/// Show enough of the key to recognize it, never the whole thing.
/// Counts chars, not bytes: stored keys are arbitrary strings.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
