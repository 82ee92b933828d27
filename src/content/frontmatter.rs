//! Front-matter parsing

use serde_yaml::Value;
use std::collections::HashMap;

use super::error::{LoadError, LoadResult};

const FENCE: &str = "---";

/// Raw key/value metadata from the block at the top of a content file.
///
/// No business defaults are applied here; that is the assembler's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    values: HashMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> LoadResult<(Self, &str)> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some(after_open) = strip_fence_line(content) else {
            // No front-matter found
            return Ok((FrontMatter::default(), content));
        };

        let (yaml_content, remaining) = split_at_closing_fence(after_open)
            .ok_or_else(|| LoadError::Invalid("unterminated front-matter block".to_string()))?;

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let parsed: Value = serde_yaml::from_str(yaml_content)
            .map_err(|e| LoadError::Invalid(format!("malformed front-matter: {}", e)))?;

        let values = match parsed {
            Value::Null => HashMap::new(),
            Value::Mapping(mapping) => mapping
                .into_iter()
                .filter_map(|(key, value)| match key {
                    Value::String(key) => Some((key, value)),
                    other => {
                        tracing::debug!("Ignoring non-string front-matter key {:?}", other);
                        None
                    }
                })
                .collect(),
            _ => {
                return Err(LoadError::Invalid(
                    "front-matter is not a key/value mapping".to_string(),
                ))
            }
        };

        Ok((FrontMatter { values }, remaining))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// If the text opens with a fence line, return what follows that line
fn strip_fence_line(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(FENCE)?;
    let line_end = rest.find('\n').unwrap_or(rest.len());
    if !rest[..line_end].trim().is_empty() {
        // `----` or `--- title` is not an opening fence
        return None;
    }
    Some(rest.get(line_end + 1..).unwrap_or(""))
}

/// Split at the first line consisting solely of the fence.
/// Exactly one line break after the closing fence is consumed.
fn split_at_closing_fence(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']).trim_end() == FENCE {
            let block = &rest[..offset];
            let remaining = &rest[offset + line.len()..];
            return Some((block, remaining));
        }
        offset += line.len();
    }
    None
}
