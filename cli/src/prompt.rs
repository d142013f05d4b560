//! Interactive yes/no questions on the terminal.
use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result};

/// Source of operator answers.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt: Send + Sync {
    /// Ask `question` and return `true` only for an affirmative answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written.
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Whether `answer` is affirmative. Only `y` or `Y` count; anything else,
/// including an empty line, is a decline.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim_end_matches(['\r', '\n']), "y" | "Y")
}

/// [`Prompt`] reading answers from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    #[allow(clippy::print_stdout)]
    fn confirm(&self, question: &str) -> Result<bool> {
        print!("{question} ");
        io::stdout().flush().context("flushing stdout")?;

        let mut input = String::new();
        io::stdin()
            .lock()
            .read_line(&mut input)
            .context("reading answer")?;
        Ok(is_affirmative(&input))
    }
}

/// [`Prompt`] that answers every question with yes (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn only_lower_and_upper_y_accept() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative("Y\r\n"));
        assert!(is_affirmative("y"));
    }

    #[test]
    fn everything_else_declines() {
        for answer in ["", "\n", "n\n", "yes\n", " y\n", "N", "q"] {
            assert!(!is_affirmative(answer), "{answer:?}");
        }
    }

    #[test]
    fn assume_yes_always_confirms() {
        assert!(AssumeYes.confirm("Create patch? [y/N]").unwrap());
    }

    #[test]
    fn mock_prompt_receives_question() {
        let mut prompt = MockPrompt::new();
        prompt
            .expect_confirm()
            .withf(|q| q == "Create patch? [y/N]")
            .times(1)
            .returning(|_| Ok(false));
        assert!(!prompt.confirm("Create patch? [y/N]").unwrap());
    }
}
