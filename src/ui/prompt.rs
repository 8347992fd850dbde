// Confirmation prompt
// Interactive yes/no answer before executing a plan

use anyhow::{Context, Result};
use std::io::{self, BufRead, IsTerminal, Write};

use crate::core::Confirm;

/// Asks on the terminal, defaulting to "no".
///
/// When stdin is not a terminal a single line is read instead, so answers
/// can be piped in.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if io::stdin().is_terminal() {
            return dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .context("Failed to read confirmation");
        }

        print!("{prompt} [y/n] (n): ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;
        Ok(parse_answer(&answer))
    }
}

/// Interpret a typed answer; anything but yes means no
pub fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
