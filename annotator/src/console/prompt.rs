use log::{info, warn};
use posecore::prelude::UserPrompt;
use std::io::{self, BufRead, Write};

/// Asks on a terminal-like stream and reads a `y`/`n` answer.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> UserPrompt for ConsolePrompt<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        if write!(self.output, "{} [y/N] ", message)
            .and_then(|_| self.output.flush())
            .is_err()
        {
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }

    fn notify(&mut self, message: &str) {
        if let Err(err) = writeln!(self.output, "{}", message) {
            warn!("could not show notice `{}`: {}", message, err);
        }
    }
}

/// Non-interactive prompt that always gives the same answer.
pub struct AutoAnswer {
    answer: bool,
}

impl AutoAnswer {
    pub fn new(answer: bool) -> Self {
        Self { answer }
    }
}

impl UserPrompt for AutoAnswer {
    fn confirm(&mut self, message: &str) -> bool {
        info!("{} -> {}", message, if self.answer { "yes" } else { "no" });
        self.answer
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_prompt_accepts_yes_variants() {
        for (input, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false)] {
            let mut output = Vec::new();
            let mut prompt = ConsolePrompt::new(input.as_bytes(), &mut output);
            assert_eq!(prompt.confirm("Save?"), expected, "input {:?}", input);
            drop(prompt);
            assert_eq!(String::from_utf8(output).unwrap(), "Save? [y/N] ");
        }
    }

    #[test]
    fn console_prompt_treats_closed_input_as_no() {
        let mut prompt = ConsolePrompt::new("".as_bytes(), Vec::new());
        assert!(!prompt.confirm("Save?"));
    }

    #[test]
    fn notify_writes_message_line() {
        let mut output = Vec::new();
        ConsolePrompt::new("".as_bytes(), &mut output).notify("Saving failed");
        assert_eq!(String::from_utf8(output).unwrap(), "Saving failed\n");
    }

    #[test]
    fn auto_answer_returns_fixed_answer() {
        assert!(AutoAnswer::new(true).confirm("Save?"));
        assert!(!AutoAnswer::new(false).confirm("Save?"));
    }
}
