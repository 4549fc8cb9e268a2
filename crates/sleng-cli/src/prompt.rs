//! Line-based prompting
//!
//! Reads answers from any `BufRead` and writes prompts to any `Write`, so
//! the interactive menu can run against stdin/stdout or in-memory buffers.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Answers accepted as "yes" when confirming, compared ignoring case
const AFFIRMATIVE: &[&str] = &["yes", "y", "да", "д"];

/// Prompt helper over an input and an output stream
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line
    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// Print a prompt and read the answer, trimmed
    ///
    /// Returns `None` once input is exhausted.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        Ok(Some(input.trim().to_string()))
    }

    /// Prompt for confirmation
    ///
    /// Returns true only for an affirmative answer. End of input counts as no.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{} (yes/no): ", prompt))?;
        Ok(answer.as_deref().map(is_affirmative).unwrap_or(false))
    }

    /// Give back the output stream
    pub fn into_output(self) -> W {
        self.output
    }
}

/// Check whether an answer means "yes"
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_ask_trims_answer() {
        let mut p = prompter("  rizz \n");
        assert_eq!(p.ask("Word? ").unwrap().as_deref(), Some("rizz"));
        assert_eq!(String::from_utf8(p.into_output()).unwrap(), "Word? ");
    }

    #[test]
    fn test_ask_returns_none_at_end_of_input() {
        let mut p = prompter("last\n");
        assert!(p.ask("> ").unwrap().is_some());
        assert!(p.ask("> ").unwrap().is_none());
        assert!(p.ask("> ").unwrap().is_none());
    }

    #[test]
    fn test_ask_accepts_missing_trailing_newline() {
        let mut p = prompter("2");
        assert_eq!(p.ask("> ").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_is_affirmative() {
        for answer in ["yes", "YES", "y", "Y", "да", "ДА", "д", " y "] {
            assert!(is_affirmative(answer), "{:?}", answer);
        }
        for answer in ["", "n", "no", "нет", "yep", "sure"] {
            assert!(!is_affirmative(answer), "{:?}", answer);
        }
    }

    #[test]
    fn test_confirm() {
        let mut p = prompter("y\nno\n");
        assert!(p.confirm("Delete?").unwrap());
        assert!(!p.confirm("Delete?").unwrap());
        // Input exhausted
        assert!(!p.confirm("Delete?").unwrap());

        let output = String::from_utf8(p.into_output()).unwrap();
        assert!(output.starts_with("Delete? (yes/no): "));
    }
}
