//! Author identity and commit message derivation.

use std::sync::LazyLock;

use regex::Regex;

/// `Name <email>`, `Name email` or a bare e-mail address.
static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^(.*?)\s*<?([\[\]\w+.-]+@[\w+.-]+)>?").unwrap()
});

/// Author split out of a Bazaar author string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Display name, as written.
    pub name: String,
    /// E-mail address.
    pub email: String,
    /// Whether `email` is the configured fallback.
    pub fallback_email: bool,
}

/// Split an author string into name and e-mail.
///
/// Without an e-mail the whole string becomes the name and `fallback_email`
/// is used. A bare address also keeps the whole string as the name.
#[must_use]
pub fn parse_author(raw: &str, fallback_email: &str) -> Author {
    let raw = raw.trim();
    let Some(caps) = USERNAME_RE.captures(raw) else {
        return Author {
            name: raw.to_string(),
            email: fallback_email.to_string(),
            fallback_email: true,
        };
    };

    let name = caps.get(1).map_or("", |m| m.as_str()).trim();
    let email = caps.get(2).map_or("", |m| m.as_str());

    Author {
        name: (if name.is_empty() { raw } else { name }).to_string(),
        email: email.to_string(),
        fallback_email: false,
    }
}

/// Closest ASCII rendering of a name, for commit metadata.
#[must_use]
pub fn ascii_name(name: &str) -> String {
    deunicode::deunicode(name)
}

/// Original message followed by one line per unique bug reference.
#[must_use]
pub fn commit_message(message: &str, bugs: &[String]) -> String {
    let mut unique: Vec<&str> = Vec::with_capacity(bugs.len());
    for bug in bugs {
        if !unique.contains(&bug.as_str()) {
            unique.push(bug);
        }
    }

    if unique.is_empty() {
        message.to_string()
    } else {
        format!("{message}\n{}", unique.join("\n"))
    }
}
