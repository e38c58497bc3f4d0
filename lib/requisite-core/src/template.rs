//! Resource templates and their resolution into request paths.
//!
//! A resource template is a path pattern such as `/posts/:id/comments`.
//! Tokens start with `:` followed by an identifier (a letter or `_`, then
//! letters, digits or `_`). A colon followed by anything else is literal, so
//! `https://host:8080` is not a template token. Write `\:` to force a literal
//! colon before an identifier: `/resource\:top` resolves to `/resource:top`.
//!
//! # Example
//!
//! ```
//! use requisite_core::{PathParts, PathSpec, resolve};
//!
//! let spec = PathSpec::from(PathParts::new().param("id", 1).query("search", "rust"));
//! let path = resolve("/posts/:id", Some(&spec)).expect("resolved");
//! assert_eq!(path, "/posts/1?search=rust");
//! ```

use std::fmt::Display;
use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::{Error, Result};

/// The resource template an endpoint client was declared with.
///
/// Composed requests carry it in their extensions so middleware can group
/// calls by endpoint (`/posts/:id`) rather than by resolved path (`/posts/1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceTemplate(Arc<str>);

impl ResourceTemplate {
    /// Create a new resource template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(Arc::from(template.into()))
    }

    /// Get the template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names of the parameter tokens, in template order.
    #[must_use]
    pub fn parameters(&self) -> Vec<&str> {
        segments(&self.0)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Param(name) => Some(name),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Resolve this template against an optional path specification.
    ///
    /// See [`resolve`].
    pub fn resolve(&self, spec: Option<&PathSpec>) -> Result<String> {
        resolve(&self.0, spec)
    }
}

impl std::fmt::Display for ResourceTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceTemplate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Per-call description of the path to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    /// Appended verbatim to the template; no substitution happens.
    Raw(String),
    /// Suffix, parameter values and query pairs.
    Parts(PathParts),
}

impl PathSpec {
    /// A specification that requests the template as is.
    ///
    /// Equivalent to passing no specification at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A literal suffix appended to the template without substitution.
    #[must_use]
    pub fn raw(suffix: impl Into<String>) -> Self {
        Self::Raw(suffix.into())
    }
}

impl Default for PathSpec {
    fn default() -> Self {
        Self::Parts(PathParts::default())
    }
}

impl From<&str> for PathSpec {
    fn from(suffix: &str) -> Self {
        Self::raw(suffix)
    }
}

impl From<String> for PathSpec {
    fn from(suffix: String) -> Self {
        Self::Raw(suffix)
    }
}

impl From<PathParts> for PathSpec {
    fn from(parts: PathParts) -> Self {
        Self::Parts(parts)
    }
}

/// Structured path specification: suffix, parameters and query.
///
/// Parameters and query pairs keep their insertion order. Values are
/// rendered with [`Display`], so numbers take their canonical form. Query
/// values are scalars; join list values before adding them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParts {
    path: Option<String>,
    params: Vec<(String, String)>,
    query: Vec<(String, String)>,
}

impl PathParts {
    /// An empty specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suffix appended to the template before substitution.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Value for the `:name` token.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Query pair appended after `?`.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// The configured suffix.
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The configured parameters.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The configured query pairs.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

/// Resolve a resource template into a request path.
///
/// - A [`PathSpec::Raw`] suffix is appended verbatim.
/// - Otherwise the suffix is appended, escaped colons are kept literal, each
///   parameter replaces the first unresolved token with its name, and the
///   query string is appended.
/// - No specification behaves like an empty [`PathParts`].
///
/// The query string is form-urlencoded then percent-decoded, so
/// `("q", "a b")` renders as `q=a+b` and `("ids", "1,2")` as `ids=1,2`.
///
/// # Errors
///
/// Returns [`Error::MissingParameters`] listing every unresolved token, in
/// template order.
pub fn resolve(template: &str, spec: Option<&PathSpec>) -> Result<String> {
    let parts = match spec {
        Some(PathSpec::Raw(suffix)) => return Ok(format!("{template}{suffix}")),
        Some(PathSpec::Parts(parts)) => Some(parts),
        None => None,
    };

    let mut source = template.to_string();
    if let Some(suffix) = parts.and_then(PathParts::suffix) {
        source.push_str(suffix);
    }

    let segments = segments(&source);
    let mut values: Vec<Option<&str>> = vec![None; segments.len()];
    for (name, value) in parts.map(PathParts::params).unwrap_or_default() {
        let slot = segments
            .iter()
            .zip(values.iter_mut())
            .find(|(segment, slot)| slot.is_none() && **segment == Segment::Param(name));
        if let Some((_, slot)) = slot {
            *slot = Some(value.as_str());
        }
    }

    let missing: Vec<&str> = segments
        .iter()
        .zip(&values)
        .filter_map(|(segment, value)| match (segment, value) {
            (Segment::Param(name), None) => Some(*name),
            _ => None,
        })
        .collect();
    if !missing.is_empty() {
        return Err(Error::missing_parameters(missing));
    }

    let mut path = String::with_capacity(source.len());
    for (segment, value) in segments.iter().zip(&values) {
        match (segment, value) {
            (Segment::Literal(text), _) => path.push_str(text),
            (Segment::Param(_), Some(value)) => path.push_str(value),
            (Segment::Param(_), None) => {}
        }
    }

    if let Some(pairs) = parts.map(PathParts::query_pairs).filter(|q| !q.is_empty()) {
        path.push('?');
        path.push_str(&query_string(pairs));
    }

    Ok(path)
}

fn query_string(pairs: &[(String, String)]) -> String {
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    percent_decode_str(&encoded)
        .decode_utf8_lossy()
        .into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
}

fn segments(source: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = source;

    while let Some(pos) = rest.find([':', '\\']) {
        let (head, tail) = rest.split_at(pos);
        if !head.is_empty() {
            segments.push(Segment::Literal(head));
        }

        if let Some(after) = tail.strip_prefix("\\:") {
            segments.push(Segment::Literal(":"));
            rest = after;
        } else if let Some(after) = tail.strip_prefix(':') {
            let len = identifier_len(after);
            if len == 0 {
                segments.push(Segment::Literal(":"));
                rest = after;
            } else {
                let (name, after) = after.split_at(len);
                segments.push(Segment::Param(name));
                rest = after;
            }
        } else {
            // lone backslash
            let (backslash, after) = tail.split_at(1);
            segments.push(Segment::Literal(backslash));
            rest = after;
        }
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    segments
}

fn identifier_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(text.len(), |(index, _)| index)
}
