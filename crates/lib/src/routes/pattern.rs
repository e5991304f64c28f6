//! Path pattern parsing and matching.
//!
//! Patterns are `/`-separated segments. A segment is either literal text or a
//! converter capture `<converter:name>`:
//!
//! | converter | matches                  | captured as          |
//! |-----------|--------------------------|----------------------|
//! | `int`     | one or more ASCII digits | [`ParamValue::Int`]  |
//! | `slug`    | `[-A-Za-z0-9_]+`         | [`ParamValue::Slug`] |
//! | `str`     | any non-empty segment    | [`ParamValue::Str`]  |
//!
//! `int` captures are `u64`. A run of digits larger than `u64::MAX` does not match,
//! so a path carrying one resolves to no route.

use std::fmt;

use serde::Serialize;

use super::RouteError;

/// Type of a captured path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Converter {
    Int,
    Slug,
    Str,
}

impl Converter {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Converter::Int),
            "slug" => Some(Converter::Slug),
            "str" => Some(Converter::Str),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Converter::Int => "int",
            Converter::Slug => "slug",
            Converter::Str => "str",
        }
    }

    /// Convert one path segment, or `None` if it does not match.
    pub fn convert(self, segment: &str) -> Option<ParamValue> {
        if segment.is_empty() {
            return None;
        }
        match self {
            Converter::Int => {
                if !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                segment.parse().ok().map(ParamValue::Int)
            }
            Converter::Slug => segment
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
                .then(|| ParamValue::Slug(segment.to_string())),
            Converter::Str => (!segment.contains('/')).then(|| ParamValue::Str(segment.to_string())),
        }
    }
}

/// A captured path parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(u64),
    Slug(String),
    Str(String),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<u64> {
        match self {
            ParamValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Slug(value) | ParamValue::Str(value) => Some(value),
            ParamValue::Int(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Slug(value) | ParamValue::Str(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Capture { name: String, converter: Converter },
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pattern {
    segments: Vec<Segment>,
    trailing_slash: bool,
}

/// Split a path into segments, ignoring one trailing slash.
///
/// Returns `None` for paths with empty segments (`a//b`).
fn split(path: &str) -> Option<Vec<&str>> {
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        return Some(Vec::new());
    }
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments)
}

impl Pattern {
    pub(crate) fn parse(pattern: &str) -> Result<Self, RouteError> {
        let invalid = |reason: String| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if pattern.starts_with('/') {
            return Err(invalid("pattern must be relative to the table prefix".into()));
        }
        let raw = split(pattern).ok_or_else(|| invalid("empty segment".into()))?;
        if raw.is_empty() {
            return Err(invalid("pattern has no segments".into()));
        }

        let mut segments = Vec::with_capacity(raw.len());
        for segment in raw {
            if let Some(inner) = segment.strip_prefix('<') {
                let inner = inner
                    .strip_suffix('>')
                    .ok_or_else(|| invalid(format!("unterminated capture '{segment}'")))?;
                let (converter, name) = inner.split_once(':').unwrap_or(("str", inner));
                let converter = Converter::parse(converter)
                    .ok_or_else(|| invalid(format!("unknown converter '{converter}'")))?;
                if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
                    return Err(invalid(format!("invalid parameter name '{name}'")));
                }
                let duplicate = segments.iter().any(
                    |s| matches!(s, Segment::Capture { name: existing, .. } if existing == name),
                );
                if duplicate {
                    return Err(invalid(format!("parameter '{name}' captured twice")));
                }
                segments.push(Segment::Capture {
                    name: name.to_string(),
                    converter,
                });
            } else if segment.contains(['<', '>']) {
                return Err(invalid(format!("malformed segment '{segment}'")));
            } else {
                segments.push(Segment::Literal(segment.to_string()));
            }
        }

        Ok(Self {
            segments,
            trailing_slash: pattern.ends_with('/'),
        })
    }

    /// Match a path relative to the table prefix.
    pub(crate) fn matches(&self, path: &str) -> Option<Vec<(String, ParamValue)>> {
        let parts = split(path)?;
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(text) if text == part => {}
                Segment::Literal(_) => return None,
                Segment::Capture { name, converter } => {
                    params.push((name.clone(), converter.convert(part)?));
                }
            }
        }
        Some(params)
    }

    pub(crate) fn captures(&self) -> impl Iterator<Item = (&str, Converter)> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Capture { name, converter } => Some((name.as_str(), *converter)),
            Segment::Literal(_) => None,
        })
    }

    /// Build a relative path from already-validated parameter values.
    pub(crate) fn render(&self, lookup: impl Fn(&str) -> String) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Capture { name, .. } => out.push_str(&lookup(name)),
            }
        }
        if self.trailing_slash {
            out.push('/');
        }
        out
    }
}
