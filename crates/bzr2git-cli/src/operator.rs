//! Terminal operator: progress on stdout, prompts through inquire.

use bzr2git_core::{Announcement, ApplyFailure, Error, Operator, Result};
use inquire::{Confirm, Text};

use crate::output;

/// Operator sitting at the terminal.
pub struct TerminalOperator;

impl Operator for TerminalOperator {
    fn announce(&self, announcement: &Announcement<'_>) {
        output::info(&output::announcement(announcement));
        output::detail(&output::indented_message(announcement.message));
    }

    fn confirm_apply(&self, _announcement: &Announcement<'_>) -> Result<bool> {
        Confirm::new("Do you want to apply it?")
            .with_default(true)
            .prompt()
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn await_manual_fix(&self, failure: &ApplyFailure) -> Result<()> {
        output::warn(&format!("revno {}: {}", failure.revno, failure.summary()));
        for rename in &failure.failed_renames {
            output::detail(&format!("  git mv {} {}", rename.from, rename.to));
        }
        if !failure.rejects.trim().is_empty() {
            output::detail(failure.rejects.trim_end());
        }

        Text::new("Patch or renaming failed. Solve it manually and then press Enter to continue...")
            .prompt()
            .map(|_| ())
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}
