//! YAML frontmatter splitting and tolerant field extraction.
//!
//! Each semantic attribute is read through an ordered list of
//! `(field name, extractor)` fallbacks; the first field that yields a value wins.

use serde_json::Value;
use std::collections::BTreeMap;

pub type Fields = BTreeMap<String, Value>;

type Extractor<T> = fn(&Value) -> Option<T>;

const SLUG_FIELDS: &[(&str, Extractor<String>)] = &[("slug", as_text)];
const TITLE_FIELDS: &[(&str, Extractor<String>)] = &[("title", as_text), ("name", as_text)];
const DATE_FIELDS: &[(&str, Extractor<String>)] = &[
    ("date", as_text),
    ("pubDate", as_text),
    ("publishDate", as_text),
    ("published", as_text),
];
const EXCERPT_FIELDS: &[(&str, Extractor<String>)] =
    &[("excerpt", as_text), ("description", as_text), ("summary", as_text)];
const TAG_FIELDS: &[(&str, Extractor<Vec<String>>)] = &[("tags", as_tags), ("categories", as_tags)];
const DRAFT_FIELDS: &[(&str, Extractor<bool>)] = &[("draft", as_bool)];

/// Metadata recognized in a post's frontmatter. Absent fields stay `None`;
/// defaults are applied by the reader, which knows the file name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostMetadata {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub draft: bool,
}

impl PostMetadata {
    pub fn from_fields(fields: &Fields) -> Self {
        Self {
            slug: first_match(fields, SLUG_FIELDS),
            title: first_match(fields, TITLE_FIELDS),
            date: first_match(fields, DATE_FIELDS),
            excerpt: first_match(fields, EXCERPT_FIELDS),
            tags: first_match(fields, TAG_FIELDS),
            draft: first_match(fields, DRAFT_FIELDS).unwrap_or(false),
        }
    }
}

/// Split `---`-delimited frontmatter from the body.
///
/// Returns `None` when the input has no complete frontmatter block; the whole
/// input is then the body.
pub fn split_frontmatter(input: &str) -> Option<(&str, &str)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut lines = input.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }
    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some((&input[yaml_start..offset], &input[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a YAML mapping into JSON-compatible fields. Anything that is not a
/// mapping, or fails to parse, yields no fields.
pub fn parse_fields(yaml: &str) -> Fields {
    if yaml.trim().is_empty() {
        return Fields::new();
    }
    let parsed = serde_yaml::from_str::<serde_yaml::Value>(yaml)
        .ok()
        .and_then(|v| serde_json::to_value(v).ok());
    match parsed {
        Some(Value::Object(map)) => map.into_iter().collect(),
        _ => {
            tracing::debug!("frontmatter is not a valid YAML mapping; treating as empty");
            Fields::new()
        }
    }
}

/// Metadata and body of a post source. Malformed frontmatter gives empty metadata.
pub fn parse_post(input: &str) -> (PostMetadata, &str) {
    match split_frontmatter(input) {
        Some((yaml, body)) => (PostMetadata::from_fields(&parse_fields(yaml)), body),
        None => (PostMetadata::default(), input.strip_prefix('\u{feff}').unwrap_or(input)),
    }
}

fn first_match<T>(fields: &Fields, candidates: &[(&str, Extractor<T>)]) -> Option<T> {
    candidates
        .iter()
        .find_map(|(name, extract)| fields.get(*name).and_then(extract))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_tags(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(as_text).collect()),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::Null => Some(Vec::new()),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
