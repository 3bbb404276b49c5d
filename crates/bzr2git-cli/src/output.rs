//! Terminal output formatting utilities.

use bzr2git_core::{Announcement, ReplaySummary, RevisionOutcome};
use colored::Colorize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

/// Print a detail line without prefix.
pub fn detail(msg: &str) {
    println!("{msg}");
}

/// Print a horizontal line.
pub fn hr() {
    println!("{}", "─".repeat(50).dimmed());
}

/// Header line for a revision about to be replayed.
#[must_use]
pub fn announcement(a: &Announcement<'_>) -> String {
    format!(
        "Applying {}/{} revno {} ({})",
        a.project,
        a.branch,
        a.revno.to_string().cyan().bold(),
        a.origin_url.dimmed()
    )
}

/// Original message, indented for display under the header.
#[must_use]
pub fn indented_message(message: &str) -> String {
    message
        .lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per outcome that needs attention.
pub fn print_summary(summary: &ReplaySummary) {
    for (id, outcome) in &summary.outcomes {
        match outcome {
            RevisionOutcome::Reverted { revno, reason } => {
                warn(&format!("revno {revno} ({id}) reverted: {reason}"));
            }
            RevisionOutcome::Declined { revno } => {
                detail(&format!("  revno {revno} ({id}) skipped"));
            }
            RevisionOutcome::Committed { .. }
            | RevisionOutcome::CommittedAfterFix { .. }
            | RevisionOutcome::Unresolved => {}
        }
    }

    hr();
    if summary.total() == 0 {
        success("Nothing to replay - upstream already has every revision");
        return;
    }

    let line = summary_line(summary);
    if summary.reverted() > 0 {
        warn(&line);
    } else {
        success(&line);
    }
}

/// Counts of a finished run.
#[must_use]
pub fn summary_line(summary: &ReplaySummary) -> String {
    let mut parts = vec![format!("{} committed", summary.committed())];
    if summary.fixed() > 0 {
        parts.push(format!("{} fixed by hand", summary.fixed()));
    }
    if summary.reverted() > 0 {
        parts.push(format!("{} reverted", summary.reverted()));
    }
    if summary.declined() > 0 {
        parts.push(format!("{} skipped", summary.declined()));
    }
    if summary.unresolved() > 0 {
        parts.push(format!("{} merged only", summary.unresolved()));
    }
    format!("Replayed {} revisions: {}", summary.total(), parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bzr2git_bzr::RevisionId;

    #[test]
    fn test_announcement_contains_revno_and_url() {
        colored::control::set_override(false);
        let line = announcement(&Announcement {
            project: "openupgrade-addons",
            branch: "7.0",
            revno: 4521,
            origin_url: "http://example.org/4521",
            message: "[FIX] stock",
        });
        assert_eq!(
            line,
            "Applying openupgrade-addons/7.0 revno 4521 (http://example.org/4521)"
        );
    }

    #[test]
    fn test_indented_message() {
        assert_eq!(indented_message("[FIX] a\n\nb"), "    [FIX] a\n    \n    b");
        assert_eq!(indented_message(""), "");
    }

    #[test]
    fn test_summary_line() {
        let summary = ReplaySummary {
            outcomes: vec![
                (RevisionId::from("a"), RevisionOutcome::Unresolved),
                (
                    RevisionId::from("b"),
                    RevisionOutcome::Reverted {
                        revno: 3,
                        reason: "patch failed".into(),
                    },
                ),
                (RevisionId::from("c"), RevisionOutcome::Declined { revno: 4 }),
            ],
        };
        assert_eq!(
            summary_line(&summary),
            "Replayed 3 revisions: 0 committed, 1 reverted, 1 skipped, 1 merged only"
        );
    }
}
