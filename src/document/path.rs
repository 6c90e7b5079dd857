//! Path expressions in the Jayway JSONPath dialect
//!
//! Accepted forms (the leading `$` is optional, `data.hello` and
//! `$.data.hello` are the same path):
//!
//! - dot members `a.b` and bracket members `['a']` / `["a"]`
//! - indexes `[0]`, `[-1]`
//! - wildcards `*` / `[*]` and deep scan `..name`
//! - unions `[0,1]` / `['a','b']`, slices `[1:3]`
//! - filters `[?(@.price > 10)]`
//!
//! Property names may hold `'` or `"` but not both, and no backslash.
//!
//! A path is *definite* when it can address at most one node, i.e. it uses
//! none of deep scan, wildcard, union, slice or filter.

use std::fmt;

use crate::core::PathError;

/// One step of a parsed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Member(String),
    Index(i64),
    Wildcard,
    DeepScan,
    /// Raw bracket content, e.g. `0,1` or `'a','b'`
    Union(String),
    /// Raw bracket content, e.g. `1:3`
    Slice(String),
    /// Raw bracket content including the `?(...)`
    Filter(String),
}

impl Segment {
    fn is_definite(&self) -> bool {
        matches!(self, Segment::Member(_) | Segment::Index(_))
    }
}

/// A parsed, validated path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    raw: String,
    segments: Vec<Segment>,
}

impl PathExpression {
    /// Parse and validate `raw`
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let segments = Parser::new(raw).parse()?;
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The expression as written by the caller
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_definite(&self) -> bool {
        self.segments.iter().all(Segment::is_definite)
    }

    /// The path without its last segment, `None` for the root
    pub fn parent(&self) -> Option<PathExpression> {
        let (_, init) = self.segments.split_last()?;
        Some(PathExpression {
            raw: render(init),
            segments: init.to_vec(),
        })
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Rooted form handed to the JSONPath evaluator
    pub fn normalized(&self) -> String {
        render(&self.segments)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for PathExpression {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn render(segments: &[Segment]) -> String {
    let mut out = String::from("$");
    let mut after_scan = false;
    for segment in segments {
        match segment {
            Segment::Member(name) if is_plain_name(name) => {
                if !after_scan {
                    out.push('.');
                }
                out.push_str(name);
            }
            Segment::Member(name) if name.contains('\'') => {
                out.push_str("[\"");
                out.push_str(name);
                out.push_str("\"]");
            }
            Segment::Member(name) => {
                out.push_str("['");
                out.push_str(name);
                out.push_str("']");
            }
            Segment::Index(index) => out.push_str(&format!("[{}]", index)),
            Segment::Wildcard if after_scan => out.push('*'),
            Segment::Wildcard => out.push_str("[*]"),
            Segment::DeepScan => out.push_str(".."),
            Segment::Union(raw) | Segment::Slice(raw) | Segment::Filter(raw) => {
                out.push('[');
                out.push_str(raw);
                out.push(']');
            }
        }
        after_scan = matches!(segment, Segment::DeepScan);
    }
    out
}

struct Parser<'a> {
    raw: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            chars: raw.trim().chars().collect(),
            pos: 0,
        }
    }

    /// Member segment for `name`, which must be quotable in a bracket
    fn member(&self, name: &str) -> Result<Segment, PathError> {
        if name.contains('\\') || (name.contains('\'') && name.contains('"')) {
            return Err(self.invalid(format!("unsupported property name '{}'", name)));
        }
        Ok(Segment::Member(name.to_string()))
    }

    fn invalid(&self, message: impl Into<String>) -> PathError {
        PathError::Invalid {
            path: self.raw.to_string(),
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn parse(mut self) -> Result<Vec<Segment>, PathError> {
        if self.chars.is_empty() {
            return Err(self.invalid("path is empty"));
        }

        let mut segments = Vec::new();

        if self.peek() == Some('$') {
            self.pos += 1;
        } else if self.peek() != Some('[') {
            // implicit root: `data.hello` reads as `$.data.hello`
            segments.push(self.member_or_wildcard()?);
        }

        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.pos += 1;
                    if self.peek() == Some('.') {
                        self.pos += 1;
                        segments.push(Segment::DeepScan);
                        if self.peek() == Some('[') {
                            continue;
                        }
                    }
                    if self.peek().is_none() {
                        return Err(self.invalid("path must not end with '.'"));
                    }
                    segments.push(self.member_or_wildcard()?);
                }
                '[' => segments.push(self.bracket()?),
                other => {
                    return Err(self.invalid(format!(
                        "unexpected character '{}' at position {}",
                        other, self.pos
                    )));
                }
            }
        }

        Ok(segments)
    }

    fn member_or_wildcard(&mut self) -> Result<Segment, PathError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '.' || c == '[' {
                break;
            }
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        let name = name.trim();
        match name {
            "" => Err(self.invalid(format!("missing property name at position {}", start))),
            "*" => Ok(Segment::Wildcard),
            _ if name.contains(']') => Err(self.invalid(format!("unexpected ']' in '{}'", name))),
            _ => self.member(name),
        }
    }

    fn bracket(&mut self) -> Result<Segment, PathError> {
        let open = self.pos;
        self.pos += 1;
        let start = self.pos;
        let mut quote: Option<char> = None;
        let mut depth = 0usize;

        loop {
            let Some(c) = self.peek() else {
                return Err(self.invalid(format!("unterminated '[' at position {}", open)));
            };
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '\'' | '"') => quote = Some(c),
                (None, '(') => depth += 1,
                (None, ')') => depth = depth.saturating_sub(1),
                (None, ']') if depth == 0 => break,
                _ => {}
            }
            self.pos += 1;
        }

        let content: String = self.chars[start..self.pos].iter().collect();
        self.pos += 1;
        self.classify_bracket(content.trim())
    }

    fn classify_bracket(&self, content: &str) -> Result<Segment, PathError> {
        if content.is_empty() {
            return Err(self.invalid("empty brackets"));
        }
        if content.starts_with('?') {
            if content.len() > 3 && content[1..].starts_with('(') && content.ends_with(')') {
                return Ok(Segment::Filter(content.to_string()));
            }
            return Err(self.invalid(format!("malformed filter '[{}]'", content)));
        }
        if content == "*" {
            return Ok(Segment::Wildcard);
        }
        if let Some(name) = single_quoted(content) {
            return self.member(name);
        }
        if content.contains(',') {
            return Ok(Segment::Union(content.to_string()));
        }
        if content.contains(':') {
            let numeric = content
                .split(':')
                .all(|part| part.trim().is_empty() || part.trim().parse::<i64>().is_ok());
            if numeric {
                return Ok(Segment::Slice(content.to_string()));
            }
            return Err(self.invalid(format!("malformed slice '[{}]'", content)));
        }
        content
            .parse::<i64>()
            .map(Segment::Index)
            .map_err(|_| self.invalid(format!("unsupported bracket expression '[{}]'", content)))
    }
}

/// Content of `'name'` or `"name"` when it is a single quoted string
fn single_quoted(content: &str) -> Option<&str> {
    let first = content.chars().next()?;
    if (first == '\'' || first == '"') && content.len() >= 2 && content.ends_with(first) {
        let inner = &content[1..content.len() - 1];
        if !inner.contains(first) {
            return Some(inner);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> PathExpression {
        PathExpression::parse(raw).unwrap_or_else(|e| panic!("'{}' should parse: {}", raw, e))
    }

    fn invalid_message(raw: &str) -> String {
        match PathExpression::parse(raw) {
            Err(PathError::Invalid { message, .. }) => message,
            other => panic!("'{}' should be invalid, got {:?}", raw, other),
        }
    }

    #[test]
    fn test_implicit_and_explicit_root_are_equivalent() {
        let implicit = parse("data.hello");
        let explicit = parse("$.data.hello");
        assert_eq!(implicit.segments(), explicit.segments());
        assert_eq!(implicit.normalized(), "$.data.hello");
        assert_eq!(implicit.as_str(), "data.hello");
    }

    #[test]
    fn test_bracket_members_and_indexes() {
        let path = parse("$['data'][\"items\"][0].name");
        assert_eq!(
            path.segments(),
            &[
                Segment::Member("data".to_string()),
                Segment::Member("items".to_string()),
                Segment::Index(0),
                Segment::Member("name".to_string()),
            ]
        );
        assert!(path.is_definite());
        assert_eq!(path.normalized(), "$.data.items[0].name");
    }

    #[test]
    fn test_leading_bracket_without_root() {
        let path = parse("['data']['hello']");
        assert_eq!(path.normalized(), "$.data.hello");
    }

    #[test]
    fn test_odd_member_names_stay_bracketed() {
        let path = parse("data['first-name']");
        assert_eq!(path.normalized(), "$.data['first-name']");
    }

    #[test]
    fn test_apostrophe_in_member_name_uses_double_quotes() {
        assert_eq!(parse("data[\"it's\"]").normalized(), "$.data[\"it's\"]");
        assert_eq!(parse("data.it's").normalized(), "$.data[\"it's\"]");
        assert!(parse("data[\"it's\"]").is_definite());
    }

    #[test]
    fn test_unquotable_member_names_are_invalid() {
        assert!(invalid_message("data.it's\"quoted\"").contains("unsupported property name"));
        assert!(invalid_message("data['back\\slash']").contains("unsupported property name"));
    }

    #[test]
    fn test_indefinite_paths() {
        for raw in [
            "data.items[*].name",
            "data.items.*",
            "$..name",
            "data.items[0,1]",
            "data.items[0:2]",
            "data.items[?(@.price > 10)].name",
        ] {
            assert!(!parse(raw).is_definite(), "'{}' should be indefinite", raw);
        }
    }

    #[test]
    fn test_deep_scan_rendering() {
        assert_eq!(parse("$..name").normalized(), "$..name");
        assert_eq!(parse("data..*").normalized(), "$.data..*");
        assert_eq!(
            parse("data..[?(@.price > 1)]").normalized(),
            "$.data..[?(@.price > 1)]"
        );
    }

    #[test]
    fn test_filter_keeps_brackets_inside_parentheses() {
        let path = parse("data.items[?(@.tags[0] == 'a')].name");
        assert_eq!(
            path.segments()[2],
            Segment::Filter("?(@.tags[0] == 'a')".to_string())
        );
    }

    #[test]
    fn test_parent_of_definite_path() {
        let path = parse("data.hello");
        let parent = path.parent().expect("has parent");
        assert_eq!(parent.normalized(), "$.data");
        assert!(parse("$").parent().is_none());
    }

    #[test]
    fn test_invalid_paths() {
        assert_eq!(invalid_message(""), "path is empty");
        assert_eq!(invalid_message("   "), "path is empty");
        assert_eq!(invalid_message("data."), "path must not end with '.'");
        assert!(invalid_message("data[0").starts_with("unterminated '['"));
        assert!(invalid_message("data[]").contains("empty brackets"));
        assert!(invalid_message("data[abc]").contains("unsupported bracket expression"));
        assert!(invalid_message("data[?@.a]").contains("malformed filter"));
        assert!(invalid_message("data[a:b]").contains("malformed slice"));
        assert!(invalid_message("$x").contains("unexpected character 'x'"));
    }

    #[test]
    fn test_from_str() {
        let path: PathExpression = "data.hello".parse().expect("valid path");
        assert_eq!(path.to_string(), "data.hello");
    }
}
