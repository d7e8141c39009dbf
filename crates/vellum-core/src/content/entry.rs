//! Pages and posts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::metadata::{self, Alias, Metadata};
use crate::error::Result;
use crate::vcs::FileCtx;

/// Fields with a typed home on [`Entry`]; everything else goes to the side map.
const KNOWN_FIELDS: &[&str] = &[
    "title",
    "description",
    "author",
    "date",
    "mdate",
    "aliases",
    "tags",
];

/// Whether an entry is a standalone page or a dated post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Standalone page.
    Page,
    /// Post, listed in feeds and tag pages.
    Post,
}

/// One content entity parsed from a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    kind: EntryKind,
    path: String,
    slug: String,
    title: Option<String>,
    description: Option<String>,
    author_name: Option<String>,
    author_email: Option<String>,
    date: i64,
    mdate: Option<i64>,
    aliases: Vec<Alias>,
    tags: Vec<String>,
    images: Vec<String>,
    full: String,
    abstract_text: String,
    read_more: bool,
    extra: IndexMap<String, String>,
}

impl Entry {
    /// Parses `filectx` as an entry of the given kind.
    ///
    /// Only an unreadable file is an error. Malformed dates fall back to the
    /// history of the file and malformed aliases are dropped, both with a
    /// warning.
    pub fn from_filectx(filectx: &dyn FileCtx, kind: EntryKind, slug: String) -> Result<Self> {
        let text = filectx.content()?;
        let path = filectx.path();
        let meta = Metadata::parse(text);

        let date = match meta.get("date") {
            Some(raw) => metadata::parse_date(raw).unwrap_or_else(|| {
                warn!("Invalid date '{}' in {}, using repository history", raw, path);
                filectx.date()
            }),
            None => filectx.date(),
        };

        let mdate = match meta.get("mdate") {
            Some(raw) => metadata::parse_date(raw).or_else(|| {
                warn!("Invalid mdate '{}' in {}, using repository history", raw, path);
                filectx.mdate()
            }),
            None => filectx.mdate(),
        };

        let aliases = match meta.get("aliases") {
            Some(raw) => {
                let (aliases, rejected) = metadata::parse_aliases(raw);
                for err in rejected {
                    warn!("Dropping alias in {}: {}", path, err);
                }
                aliases
            },
            None => Vec::new(),
        };

        let tags = match (kind, meta.get("tags")) {
            (EntryKind::Post, Some(raw)) => metadata::parse_tags(raw),
            _ => Vec::new(),
        };

        let (author_name, author_email) = match meta.get("author").or(filectx.author()) {
            Some(raw) => {
                let (name, email) = metadata::parse_author(raw);
                (Some(name), email)
            },
            None => (None, None),
        };

        let title = meta
            .get("title")
            .map(str::to_string)
            .or_else(|| metadata::find_title(text));
        let description = meta
            .get("description")
            .map(str::to_string)
            .or_else(|| metadata::find_description(text));

        let images = metadata::find_images(text);
        let (full, abstract_text, read_more) = metadata::split_read_more(text);

        let extra = meta
            .into_inner()
            .into_iter()
            .filter(|(k, _)| !KNOWN_FIELDS.contains(&k.as_str()))
            .collect();

        Ok(Self {
            kind,
            path: path.to_string(),
            slug,
            title,
            description,
            author_name,
            author_email,
            date,
            mdate,
            aliases,
            tags,
            images,
            full,
            abstract_text,
            read_more,
            extra,
        })
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_post(&self) -> bool {
        self.kind == EntryKind::Post
    }

    /// Repository-relative path of the source file.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author_name.as_deref()
    }

    pub fn author_email(&self) -> Option<&str> {
        self.author_email.as_deref()
    }

    /// Unix time the entry is dated at.
    pub fn date(&self) -> i64 {
        self.date
    }

    /// Unix time of the last modification, if any.
    pub fn mdate(&self) -> Option<i64> {
        self.mdate
    }

    /// Creation time as a UTC datetime.
    pub fn datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.date, 0)
    }

    /// Modification time as a UTC datetime.
    pub fn mdatetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.mdate.and_then(|t| chrono::DateTime::from_timestamp(t, 0))
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// Tags in declaration order; always empty for pages.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Image and figure targets, in document order.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Whole source text without the read-more marker.
    pub fn full(&self) -> &str {
        &self.full
    }

    /// Source text before the read-more marker; the whole text otherwise.
    pub fn abstract_text(&self) -> &str {
        &self.abstract_text
    }

    pub fn read_more(&self) -> bool {
        self.read_more
    }

    /// Unrecognised metadata field, or `default`.
    pub fn get<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.extra.get(key).map(String::as_str).unwrap_or(default)
    }

    /// All unrecognised metadata fields, in file order.
    pub fn extra(&self) -> &IndexMap<String, String> {
        &self.extra
    }
}
