//! Parser for `bzr log --long --show-ids -n0` output.
//!
//! Each revision block starts with a 60-dash separator. Merged revisions are
//! nested under the revision that merged them, indented four spaces per
//! merge depth. Header lines are `key: value` pairs up to `message:`, after
//! which every line (indented two more spaces) belongs to the message.

use chrono::DateTime;

use crate::error::{Error, Result};
use crate::revision::{Revision, RevisionId};

const SEPARATOR_LEN: usize = 60;
const DEPTH_INDENT: usize = 4;
const TIMESTAMP_FORMAT: &str = "%a %Y-%m-%d %H:%M:%S %z";

/// One revision block of the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Revno as printed, e.g. `12` or `10.1.3`.
    pub revno: String,
    /// Merge depth; 0 for mainline revisions.
    pub depth: usize,
    /// Revision metadata.
    pub revision: Revision,
}

impl LogEntry {
    /// The mainline revno, if this entry is on the mainline.
    #[must_use]
    pub fn mainline_revno(&self) -> Option<u32> {
        if self.depth == 0 {
            self.revno.parse().ok()
        } else {
            None
        }
    }
}

#[derive(Default)]
struct EntryBuilder {
    depth: usize,
    revno: Option<String>,
    id: Option<String>,
    parents: Vec<RevisionId>,
    authors: Vec<String>,
    committer: Option<String>,
    timestamp: Option<String>,
    bugs: Vec<String>,
    message: Vec<String>,
    in_message: bool,
}

impl EntryBuilder {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    fn header(&mut self, key: &str, value: &str) {
        match key {
            "revno" => {
                self.revno = value.split_whitespace().next().map(String::from);
            }
            "revision-id" => self.id = Some(value.to_string()),
            "parent" => self.parents.push(RevisionId::new(value)),
            "author" => self.authors = split_authors(value),
            "committer" => self.committer = Some(value.to_string()),
            "timestamp" => self.timestamp = Some(value.to_string()),
            "fixes bug" | "fixes bugs" => {
                self.bugs.extend(value.split_whitespace().map(String::from));
            }
            // tags, branch nick, signature
            _ => {}
        }
    }

    fn finish(mut self) -> Result<LogEntry> {
        let id = self
            .id
            .ok_or_else(|| Error::MalformedLog("revision without revision-id".into()))?;
        let revno = self
            .revno
            .ok_or_else(|| Error::MalformedLog(format!("{id}: missing revno")))?;
        let raw_timestamp = self
            .timestamp
            .ok_or_else(|| Error::MalformedLog(format!("{id}: missing timestamp")))?;
        let timestamp = DateTime::parse_from_str(&raw_timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| Error::MalformedLog(format!("{id}: bad timestamp '{raw_timestamp}': {e}")))?;

        while self.message.last().is_some_and(|l| l.trim().is_empty()) {
            self.message.pop();
        }
        let mut message = self.message.join("\n");
        if message == "(no message)" {
            message.clear();
        }

        Ok(LogEntry {
            revno,
            depth: self.depth,
            revision: Revision {
                id: RevisionId::new(id),
                message,
                timestamp,
                committer: self.committer.unwrap_or_default(),
                authors: self.authors,
                parents: self.parents,
                bugs: self.bugs,
            },
        })
    }
}

/// Split a multi-author value. Names may contain commas, so only a comma
/// right after an address ends an author.
fn split_authors(value: &str) -> Vec<String> {
    value
        .split_inclusive(">, ")
        .map(|author| author.strip_suffix(", ").unwrap_or(author).trim().to_string())
        .filter(|author| !author.is_empty())
        .collect()
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Depth of the revision block opened by `line`.
///
/// A dashed rule only opens a block when the next line is the block's
/// `revno:` header at the same indent; otherwise it is message text.
fn separator_depth(line: &str, next: Option<&str>) -> Option<usize> {
    let indent = leading_spaces(line);
    let rest = &line[indent..];
    let is_separator = rest.len() == SEPARATOR_LEN && rest.bytes().all(|b| b == b'-');
    if !is_separator || indent % DEPTH_INDENT != 0 {
        return None;
    }

    let opens_block = next.is_some_and(|next| {
        leading_spaces(next) == indent && next[indent..].starts_with("revno:")
    });
    opens_block.then_some(indent / DEPTH_INDENT)
}

/// Parse long-format log output into entries, in output order.
///
/// # Errors
/// Returns [`Error::MalformedLog`] if a block lacks its id, revno or a
/// parseable timestamp.
pub fn parse_long_log(text: &str) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    let mut current: Option<EntryBuilder> = None;

    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        if let Some(depth) = separator_depth(line, lines.peek().copied()) {
            if let Some(done) = current.replace(EntryBuilder::new(depth)) {
                entries.push(done.finish()?);
            }
            continue;
        }

        let Some(builder) = current.as_mut() else {
            continue;
        };

        let indent = builder.depth * DEPTH_INDENT;
        let body = line.get(indent..).filter(|_| leading_spaces(line) >= indent);
        let body = body.unwrap_or_else(|| line.trim_start());

        if builder.in_message {
            builder
                .message
                .push(body.strip_prefix("  ").unwrap_or(body).to_string());
        } else if body == "message:" {
            builder.in_message = true;
        } else if let Some((key, value)) = body.split_once(": ") {
            builder.header(key, value.trim_end());
        }
    }

    if let Some(done) = current {
        entries.push(done.finish()?);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
------------------------------------------------------------
revno: 3 [merge]
revision-id: stefan@therp.nl-20130510120000-merge3
parent: holger@therp.nl-20130509100000-rev2
parent: pedro@serviciosbaeza.com-20130508090000-feat1
fixes bug: https://launchpad.net/bugs/1177778
committer: Holger Brunn <hbrunn@therp.nl>
branch nick: 7.0
timestamp: Fri 2013-05-10 14:00:00 +0200
message:
  [MRG] account migration fixes
    ------------------------------------------------------------
    revno: 1.1.2
    revision-id: pedro@serviciosbaeza.com-20130508090000-feat2
    parent: pedro@serviciosbaeza.com-20130508090000-feat1
    fixes bugs: https://launchpad.net/bugs/1177778 https://launchpad.net/bugs/1180000
    author: Pedro M. Baeza <pedro.baeza@serviciosbaeza.com>, Jos\u{e9} P\u{e9}rez <jose@example.org>
    committer: Pedro Baeza <pedro@serviciosbaeza.com>
    branch nick: account-fixes
    timestamp: Wed 2013-05-08 11:30:00 +0200
    message:
      [FIX] account: move journal

      ------------------------------------------------------------
      second paragraph
    ------------------------------------------------------------
    revno: 1.1.1
    revision-id: pedro@serviciosbaeza.com-20130508090000-feat1
    parent: stefan@therp.nl-20130501080000-rev1
    committer: Pedro Baeza <pedro@serviciosbaeza.com>
    timestamp: Wed 2013-05-08 09:00:00 +0200
    message:
      [ADD] account: migration script
------------------------------------------------------------
revno: 2
revision-id: holger@therp.nl-20130509100000-rev2
parent: stefan@therp.nl-20130501080000-rev1
committer: Holger Brunn <hbrunn@therp.nl>
timestamp: Thu 2013-05-09 10:00:00 +0000
message:
  (no message)
------------------------------------------------------------
revno: 1
revision-id: stefan@therp.nl-20130501080000-rev1
committer: Stefan Rijnhart <stefan@therp.nl>
timestamp: Wed 2013-05-01 08:00:00 -0300
message:
  Initial import
";

    #[test]
    fn test_parse_entries_and_depths() {
        let entries = parse_long_log(SAMPLE).unwrap();

        let shape: Vec<(&str, usize)> = entries
            .iter()
            .map(|e| (e.revno.as_str(), e.depth))
            .collect();
        assert_eq!(
            shape,
            vec![("3", 0), ("1.1.2", 1), ("1.1.1", 1), ("2", 0), ("1", 0)]
        );
        assert_eq!(entries[0].mainline_revno(), Some(3));
        assert_eq!(entries[1].mainline_revno(), None);
    }

    #[test]
    fn test_parse_headers() {
        let entries = parse_long_log(SAMPLE).unwrap();
        let merge = &entries[0].revision;

        assert_eq!(merge.id.as_str(), "stefan@therp.nl-20130510120000-merge3");
        assert_eq!(merge.parents.len(), 2);
        assert_eq!(merge.bugs, vec!["https://launchpad.net/bugs/1177778"]);
        assert!(merge.authors.is_empty());
        assert_eq!(merge.committer, "Holger Brunn <hbrunn@therp.nl>");
        assert_eq!(merge.timestamp.timestamp(), 1_368_187_200);
        assert_eq!(merge.message, "[MRG] account migration fixes");
    }

    #[test]
    fn test_parse_nested_multiline_message_and_authors() {
        let entries = parse_long_log(SAMPLE).unwrap();
        let feat = &entries[1].revision;

        assert_eq!(
            feat.authors,
            vec![
                "Pedro M. Baeza <pedro.baeza@serviciosbaeza.com>",
                "Jos\u{e9} P\u{e9}rez <jose@example.org>",
            ]
        );
        assert_eq!(feat.bugs.len(), 2);
        assert_eq!(
            feat.message,
            format!("[FIX] account: move journal\n\n{}\nsecond paragraph", "-".repeat(60))
        );
    }

    #[test]
    fn test_parse_empty_message_and_offsets() {
        let entries = parse_long_log(SAMPLE).unwrap();

        assert_eq!(entries[3].revision.message, "");
        let first = &entries[4].revision;
        assert!(first.parents.is_empty());
        assert_eq!(first.timestamp.offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_dashed_rule_in_message_on_depth_boundary() {
        let rule = "-".repeat(60);
        let text = format!(
            "\
{rule}
revno: 2
revision-id: holger@therp.nl-20130509100000-rev2
parent: stefan@therp.nl-20130501080000-rev1
committer: Holger Brunn <hbrunn@therp.nl>
timestamp: Thu 2013-05-09 10:00:00 +0000
message:
  [IMP] migration notes
    {rule}
  done
{rule}
revno: 1
revision-id: stefan@therp.nl-20130501080000-rev1
committer: Stefan Rijnhart <stefan@therp.nl>
timestamp: Wed 2013-05-01 08:00:00 -0300
message:
  Initial import
"
        );

        let entries = parse_long_log(&text).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].revision.message,
            format!("[IMP] migration notes\n  {rule}\ndone")
        );
        assert_eq!(entries[1].mainline_revno(), Some(1));
    }

    #[test]
    fn test_author_names_with_commas() {
        assert_eq!(
            split_authors("Baeza, Pedro <p@x.org>"),
            vec!["Baeza, Pedro <p@x.org>"]
        );
        assert_eq!(
            split_authors("Baeza, Pedro <p@x.org>, Rijnhart, Stefan <s@x.org>"),
            vec!["Baeza, Pedro <p@x.org>", "Rijnhart, Stefan <s@x.org>"]
        );
        assert_eq!(split_authors("anonymous"), vec!["anonymous"]);
    }

    #[test]
    fn test_parse_author_header_with_comma() {
        let text = "\
------------------------------------------------------------
revno: 1
revision-id: p@x.org-1
author: Baeza, Pedro <p@x.org>
committer: Holger Brunn <hbrunn@therp.nl>
timestamp: Wed 2013-05-01 08:00:00 +0000
message:
  [FIX] sale
";
        let entries = parse_long_log(text).unwrap();
        assert_eq!(entries[0].revision.authors, vec!["Baeza, Pedro <p@x.org>"]);
        assert_eq!(
            entries[0].revision.apparent_authors(),
            vec!["Baeza, Pedro <p@x.org>"]
        );
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_long_log("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_timestamp_is_malformed() {
        let text = "\
------------------------------------------------------------
revno: 1
revision-id: a@b-1
message:
  hi
";
        assert!(matches!(parse_long_log(text), Err(Error::MalformedLog(_))));
    }
}
