//! Delete confirmation collaborator.

use std::io::Write;

use owo_colors::OwoColorize;

/// Yes/no confirmation. The orchestrator consults it before deleting a
/// stack unless `--force` was given; tests substitute a canned answer.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> std::io::Result<bool>;
}

/// Interactive prompt over stdin/stdout.
pub struct StdinPrompt {
    pub color: bool,
}

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&self, message: &str) -> std::io::Result<bool> {
        let mut stdout = std::io::stdout();
        if self.color {
            write!(stdout, "{}", message.yellow())?;
        } else {
            write!(stdout, "{message}")?;
        }
        stdout.flush()?;

        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

/// Non-interactive prompt with a fixed answer.
pub struct CannedPrompt {
    pub answer: bool,
}

impl ConfirmPrompt for CannedPrompt {
    fn confirm(&self, _message: &str) -> std::io::Result<bool> {
        Ok(self.answer)
    }
}
