//! Parser for `bzr status -S -r A..B` output.
//!
//! Every line is a three-column status code followed by the path:
//! column one is the versioning change (`+`, `-`, `R`), column two the
//! content change (`N`, `D`, `K`, `M`), column three the execute bit.

use crate::revision::{Rename, RevisionDelta};

const CODE_WIDTH: usize = 3;

/// Drop the kind marker bzr appends to directories and symlinks.
fn strip_kind(path: &str) -> String {
    path.strip_suffix(&['/', '@'][..])
        .unwrap_or(path)
        .to_string()
}

/// Parse short-format status output into a delta.
#[must_use]
pub fn parse_short_status(text: &str) -> RevisionDelta {
    let mut delta = RevisionDelta::default();

    for line in text.lines() {
        let (Some(code), Some(rest)) = (line.get(..CODE_WIDTH), line.get(CODE_WIDTH..)) else {
            continue;
        };
        let path = rest.trim();
        if path.is_empty() {
            continue;
        }

        let mut columns = code.chars();
        let versioning = columns.next().unwrap_or(' ');
        let content = columns.next().unwrap_or(' ');

        match (versioning, content) {
            ('R', _) => {
                if let Some((from, to)) = path.split_once(" => ") {
                    delta.renamed.push(Rename {
                        from: strip_kind(from),
                        to: strip_kind(to),
                    });
                }
            }
            ('+', _) | (_, 'N') => delta.added.push(strip_kind(path)),
            ('-', _) | (_, 'D') => delta.removed.push(strip_kind(path)),
            (_, 'M' | 'K') => delta.modified.push(strip_kind(path)),
            // unknown, conflicted and pending-merge lines
            _ => {}
        }
    }

    delta
}
