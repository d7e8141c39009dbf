//! Field-style metadata embedded in content files.
//!
//! Metadata lives in reStructuredText comment lines of the form
//! `.. name: value`. Parsing is line oriented and never fails; values that
//! cannot be interpreted are reported by the typed helpers below and the
//! caller decides the fallback.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VellumError};

static RE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\.\.[ \t]+([a-z][a-z0-9_-]*):[ \t]*([^:\s].*?)[ \t]*\r?$")
        .expect("field regex is valid")
});

static RE_READ_MORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\.\.[ \t]+read_more[ \t]*\r?$").expect("read_more regex is valid")
});

static RE_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^<]*[^ <])(?: ?<(?P<email>[^<>]*)>)?$")
        .expect("author regex is valid")
});

static RE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\.\.[ \t]+(?:image|figure)::[ \t]+(\S+)").expect("image regex is valid")
});

static RE_ALIAS_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(30[12]):(.*)$").expect("alias regex is valid"));

const ADORNMENT_CHARS: &str = "=-~^\"'`#*+:._";

/// Raw `.. name: value` fields of one file, in file order.
///
/// A field declared twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: IndexMap<String, String>,
}

impl Metadata {
    /// Extracts every metadata field of `text`.
    pub fn parse(text: &str) -> Self {
        let mut fields = IndexMap::new();
        for caps in RE_FIELD.captures_iter(text) {
            fields.insert(caps[1].to_string(), caps[2].to_string());
        }
        Self { fields }
    }

    /// Returns a field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns a field value or `default`.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Iterates over fields in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true if no field was found.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes the metadata and returns the underlying map.
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.fields
    }
}

/// A redirect from an alternate path to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alias {
    /// HTTP status of the redirect, 301 or 302.
    pub status: u16,
    /// Path that should redirect.
    pub path: String,
}

impl Alias {
    /// Default redirect status.
    pub const DEFAULT_STATUS: u16 = 302;

    /// Creates an alias.
    pub fn new(status: u16, path: impl Into<String>) -> Self {
        Self {
            status,
            path: path.into(),
        }
    }

    /// Parses one alias declaration (`/old/`, `301:/old/`, `302:/old/`).
    ///
    /// Only `301:` and `302:` are read as a status prefix. Anything else,
    /// `303:/x/` included, is taken literally as a 302 alias path.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (status, path) = match RE_ALIAS_STATUS.captures(raw) {
            Some(caps) => {
                let status: u16 = caps[1]
                    .parse()
                    .map_err(|_| VellumError::parse_error("aliases", raw.to_string()))?;
                (status, caps[2].trim().to_string())
            },
            None => (Self::DEFAULT_STATUS, raw.to_string()),
        };

        if path.is_empty() {
            return Err(VellumError::parse_error(
                "aliases",
                format!("empty alias path in '{}'", raw),
            ));
        }

        Ok(Self::new(status, path))
    }
}

/// Splits a comma separated alias list, keeping the well-formed ones.
///
/// Malformed declarations are returned separately so the caller can log them.
pub fn parse_aliases(value: &str) -> (Vec<Alias>, Vec<VellumError>) {
    let mut aliases = Vec::new();
    let mut rejected = Vec::new();
    for raw in value.split(',').filter(|s| !s.trim().is_empty()) {
        match Alias::parse(raw) {
            Ok(alias) => aliases.push(alias),
            Err(e) => rejected.push(e),
        }
    }
    (aliases, rejected)
}

/// Splits a comma separated tag list, trimming and keeping order.
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses an explicit date: unix seconds, `YYYY-MM-DD HH:MM:SS` or
/// `YYYY-MM-DD`, all UTC.
pub fn parse_date(value: &str) -> Option<i64> {
    let value = value.trim();
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse().ok();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

/// Splits `Name <email>` into its parts; the email is optional.
pub fn parse_author(value: &str) -> (String, Option<String>) {
    let value = value.trim();
    match RE_AUTHOR.captures(value) {
        Some(caps) => (
            caps["name"].trim().to_string(),
            caps.name("email")
                .map(|m| m.as_str().trim().to_string())
                .filter(|e| !e.is_empty()),
        ),
        None => (value.to_string(), None),
    }
}

/// Splits `text` at the read-more marker.
///
/// Returns `(full, abstract, found)`; the marker line is removed from `full`.
pub fn split_read_more(text: &str) -> (String, String, bool) {
    match RE_READ_MORE.find(text) {
        Some(m) => {
            let before = &text[..m.start()];
            let after = text[m.end()..].trim_start_matches(['\r', '\n']);
            let full = format!("{}{}", before, after);
            (full, before.trim_end().to_string(), true)
        },
        None => (text.to_string(), text.trim_end().to_string(), false),
    }
}

/// Image and figure targets, in document order.
pub fn find_images(text: &str) -> Vec<String> {
    RE_IMAGE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// First reStructuredText section title of `text`.
pub fn find_title(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    lines.windows(2).find_map(|pair| {
        let (line, next) = (pair[0].trim_end(), pair[1].trim_end());
        if is_title_candidate(line) && is_adornment(next, line.chars().count()) {
            Some(line.trim().to_string())
        } else {
            None
        }
    })
}

/// First body paragraph of `text`, joined into one line.
///
/// Titles, adornments, comments and directive bodies are skipped.
pub fn find_description(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut in_directive = false;

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            if in_directive || paragraph.is_empty() {
                continue;
            }
        } else {
            in_directive = false;
        }
        if line.starts_with("..") {
            in_directive = true;
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        let next_is_adornment = lines
            .get(i + 1)
            .is_some_and(|next| is_adornment(next, line.chars().count()));
        if is_adornment(line, 1) || next_is_adornment {
            continue;
        }
        paragraph.push(line.trim());
    }

    if paragraph.is_empty() {
        None
    } else {
        Some(paragraph.join(" "))
    }
}

fn is_title_candidate(line: &str) -> bool {
    !line.is_empty()
        && !line.starts_with("..")
        && !line.starts_with(' ')
        && line.chars().any(char::is_alphanumeric)
}

fn is_adornment(line: &str, min_len: usize) -> bool {
    let line = line.trim_end();
    let mut chars = line.chars();
    match chars.next() {
        Some(first) if ADORNMENT_CHARS.contains(first) => {
            chars.all(|c| c == first) && line.chars().count() >= min_len.max(2)
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
About me
========

.. title: About the author
.. author: Jane Doe <jane@example.com>
.. aliases: 301:/old/,/old2/
.. image:: /attachments/vellum.png

This is an example page!
It spans two lines.

Second paragraph.
";

    #[test]
    fn test_metadata_fields() {
        let meta = Metadata::parse(PAGE);

        assert_eq!(meta.get("title"), Some("About the author"));
        assert_eq!(meta.get("author"), Some("Jane Doe <jane@example.com>"));
        assert_eq!(meta.get("aliases"), Some("301:/old/,/old2/"));
        // directives with a double colon are not fields
        assert_eq!(meta.get("image"), None);
        assert_eq!(meta.get_or("tags", "none"), "none");
    }

    #[test]
    fn test_metadata_last_value_wins() {
        let meta = Metadata::parse(".. title: one\n.. title: two\n");
        assert_eq!(meta.get("title"), Some("two"));
        assert_eq!(meta.iter().count(), 1);
    }

    #[test]
    fn test_metadata_roundtrip_fields() {
        let text = ".. title: X\n.. date: 1234567890\n";
        let first = Metadata::parse(text);
        let second = Metadata::parse(text);

        assert_eq!(first.get("title"), Some("X"));
        assert_eq!(parse_date(first.get("date").unwrap()), Some(1234567890));
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_aliases() {
        let (aliases, rejected) = parse_aliases("301:/old/,/old2/");
        assert_eq!(aliases, vec![Alias::new(301, "/old/"), Alias::new(302, "/old2/")]);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_parse_aliases_rejects_empty_path() {
        let (aliases, rejected) = parse_aliases("302:, /ok/");
        assert_eq!(aliases, vec![Alias::new(302, "/ok/")]);
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn test_unknown_status_prefix_is_literal_path() {
        assert_eq!(Alias::parse("303:/x/").unwrap(), Alias::new(302, "303:/x/"));

        let (aliases, rejected) = parse_aliases("303:/x/,301:/y/");
        assert_eq!(aliases, vec![Alias::new(302, "303:/x/"), Alias::new(301, "/y/")]);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("rust, vcs ,,blog"), vec!["rust", "vcs", "blog"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("1234567890"), Some(1234567890));
        assert_eq!(parse_date("2009-02-13 23:31:30"), Some(1234567890));
        assert_eq!(parse_date("1970-01-02"), Some(86400));
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_author() {
        assert_eq!(
            parse_author("Jane Doe <jane@example.com>"),
            ("Jane Doe".to_string(), Some("jane@example.com".to_string()))
        );
        assert_eq!(parse_author("foo<foo@bar.com>").1.as_deref(), Some("foo@bar.com"));
        assert_eq!(parse_author("Jane"), ("Jane".to_string(), None));
    }

    #[test]
    fn test_split_read_more() {
        let (full, abstract_text, found) =
            split_read_more("Intro text.\n\n.. read_more\n\nThe rest.\n");

        assert!(found);
        assert_eq!(abstract_text, "Intro text.");
        assert!(full.contains("Intro text."));
        assert!(full.contains("The rest."));
        assert!(!full.contains("read_more"));

        let (full, abstract_text, found) = split_read_more("Only text.\n");
        assert!(!found);
        assert_eq!(full, "Only text.\n");
        assert_eq!(abstract_text, "Only text.");
    }

    #[test]
    fn test_find_images() {
        let text = ".. image:: /a.png\n\n   .. figure:: http://x/b.jpg\n      :width: 10\n";
        assert_eq!(find_images(text), vec!["/a.png", "http://x/b.jpg"]);
    }

    #[test]
    fn test_find_title() {
        assert_eq!(find_title(PAGE).as_deref(), Some("About me"));
        assert_eq!(find_title("=====\nTitle\n=====\n").as_deref(), Some("Title"));
        assert_eq!(find_title("no title here\n"), None);
        // underline shorter than the title is not an adornment
        assert_eq!(find_title("Long title\n==\n"), None);
    }

    #[test]
    fn test_find_description() {
        assert_eq!(
            find_description(PAGE).as_deref(),
            Some("This is an example page! It spans two lines.")
        );
        assert_eq!(find_description(".. title: x\n"), None);
    }
}
