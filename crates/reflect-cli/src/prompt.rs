//! Interactive prompts
//!
//! Reads entry fields and confirmations from stdin.

use anyhow::{bail, Result};
use std::io::{self, BufRead, IsTerminal, Write};

/// Print `label` and read one line of input
///
/// The trailing newline is stripped. End of input reads as an empty line.
pub fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<String> {
    write!(out, "{}", label)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Ask on the process's stdin/stdout
pub fn ask_stdin(label: &str) -> Result<String> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    ask(&mut input, &mut out, label)
}

/// Prompt for confirmation on stdin
///
/// Returns true if user confirms, false otherwise. Without a TTY there is
/// nobody to ask, so this fails and points at `--force`.
pub fn confirm(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    confirm_with(interactive, &mut stdin.lock(), &mut io::stdout(), prompt)
}

fn confirm_with<R: BufRead, W: Write>(
    interactive: bool,
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<bool> {
    if !interactive {
        bail!("Cannot ask for confirmation without a terminal. Use --force to skip it.");
    }

    let answer = ask(input, out, &format!("{} [y/N] ", prompt))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}
