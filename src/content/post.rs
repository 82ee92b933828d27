//! Post model and assembly from parsed front-matter

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::error::{LoadError, LoadResult};
use super::FrontMatter;

/// Author used when the front-matter names none
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Canonical ISO-8601 rendering, millisecond precision, UTC
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Same as the slug
    pub id: String,

    /// File name without its extension
    pub slug: String,

    pub title: String,

    pub description: String,

    /// Publication date
    #[serde(with = "iso_date")]
    pub date: DateTime<Utc>,

    pub author: String,

    pub tags: Vec<String>,

    /// Path or URL of a cover image
    pub thumbnail: Option<String>,

    /// Markdown body after the front-matter
    pub content: String,

    /// Source file name inside the content directory
    pub filename: String,
}

/// Post metadata without a body, as kept by the built-in sample set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(with = "iso_date")]
    pub date: DateTime<Utc>,
    pub author: String,
    pub tags: Vec<String>,
    pub thumbnail: Option<String>,
    pub filename: String,
}

impl Post {
    /// Build a post from a file name, its front-matter and body.
    ///
    /// Fails with [`LoadError::Invalid`] when `title` or `date` is missing,
    /// or when `date` is not a recognisable date.
    pub fn try_assemble(filename: &str, fm: &FrontMatter, body: &str) -> LoadResult<Self> {
        let title = fm
            .get("title")
            .and_then(scalar_to_string)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| LoadError::Invalid(format!("{}: missing title", filename)))?;

        let raw_date = fm
            .get("date")
            .filter(|v| !v.is_null())
            .ok_or_else(|| LoadError::Invalid(format!("{}: missing date", filename)))?;
        let date = normalize_date(raw_date).ok_or_else(|| {
            LoadError::Invalid(format!("{}: unparseable date {:?}", filename, raw_date))
        })?;

        let tags = match fm.get("tags") {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            _ => Vec::new(),
        };

        let slug = slug_from_filename(filename).to_string();

        Ok(Self {
            id: slug.clone(),
            slug,
            title,
            description: optional_string(fm, "description").unwrap_or_default(),
            date,
            author: optional_string(fm, "author").unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            tags,
            thumbnail: optional_string(fm, "thumbnail"),
            content: body.to_string(),
            filename: filename.to_string(),
        })
    }

    /// Like [`Post::try_assemble`], logging the rejection and returning `None`
    pub fn assemble(filename: &str, fm: &FrontMatter, body: &str) -> Option<Self> {
        match Self::try_assemble(filename, fm, body) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", filename, e);
                None
            }
        }
    }

    /// Build a post from known metadata and a body
    pub fn from_metadata(meta: &PostMetadata, content: String) -> Self {
        Self {
            id: meta.slug.clone(),
            slug: meta.slug.clone(),
            title: meta.title.clone(),
            description: meta.description.clone(),
            date: meta.date,
            author: meta.author.clone(),
            tags: meta.tags.clone(),
            thumbnail: meta.thumbnail.clone(),
            content,
            filename: meta.filename.clone(),
        }
    }

    /// The date in canonical ISO-8601 form, e.g. `2024-01-01T00:00:00.000Z`
    pub fn iso_date(&self) -> String {
        format_iso(&self.date)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Strip a recognised content extension from a file name
pub fn slug_from_filename(filename: &str) -> &str {
    filename
        .strip_suffix(".mdx")
        .or_else(|| filename.strip_suffix(".md"))
        .unwrap_or(filename)
}

pub fn format_iso(date: &DateTime<Utc>) -> String {
    date.format(ISO_FORMAT).to_string()
}

fn optional_string(fm: &FrontMatter, key: &str) -> Option<String> {
    fm.get(key)
        .and_then(scalar_to_string)
        .filter(|s| !s.is_empty())
}

/// Render a YAML scalar as text; mappings, sequences and null give `None`
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

/// Turn a raw front-matter date into a UTC timestamp
fn normalize_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_string(s),
        Value::Tagged(tagged) => normalize_date(&tagged.value),
        _ => None,
    }
}

/// Parse a date string in various formats. Values without an offset are UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    None
}

/// Serde adapter storing dates as canonical ISO-8601 strings
mod iso_date {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_date_string(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {}", s)))
    }
}
