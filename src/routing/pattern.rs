//! Path pattern compilation.
//!
//! # Grammar
//! Patterns are split on `/` and every segment is one of:
//! - `list` literal (case-sensitive)
//! - `:id` named parameter, `:id?` optional named parameter
//! - `(home|debug.html)` group of literal alternatives, `(…)?` optional group
//! - `*` wildcard over the remaining path (last segment only)
//!
//! The bare pattern `*` is the catch-all.
//!
//! # Design Decisions
//! - Segment based, no regex: compiled once, matched by a small backtracking walk
//! - Unnamed captures (groups, wildcards) are keyed `"0"`, `"1"`, ... in order
//! - A trailing slash on the path is ignored
//! - Path segments are percent-decoded before matching, so literals and
//!   captured values are plain text

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Parameters captured while matching a path.
pub type Params = HashMap<String, String>;

/// Reasons a pattern fails to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("pattern `{0}` must start with `/` or be `*`")]
    MissingLeadingSlash(String),

    #[error("unclosed group in segment `{0}`")]
    UnclosedGroup(String),

    #[error("group `{0}` has an empty alternative")]
    EmptyAlternative(String),

    #[error("parameter name is empty in segment `{0}`")]
    EmptyParamName(String),

    #[error("parameter `{0}` is declared twice")]
    DuplicateParam(String),

    #[error("wildcard must be the last segment")]
    WildcardNotLast,

    #[error("unsupported segment `{0}`")]
    UnsupportedSegment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param {
        name: String,
        optional: bool,
    },
    Group {
        name: String,
        alternatives: Vec<String>,
        optional: bool,
    },
    Wildcard {
        name: String,
    },
}

impl Token {
    fn is_optional(&self) -> bool {
        match self {
            Token::Param { optional, .. } | Token::Group { optional, .. } => *optional,
            Token::Literal(_) | Token::Wildcard { .. } => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(text) => f.write_str(text),
            Token::Param { name, optional } => {
                write!(f, ":{}{}", name, if *optional { "?" } else { "" })
            }
            Token::Group {
                alternatives,
                optional,
                ..
            } => write!(
                f,
                "({}){}",
                alternatives.join("|"),
                if *optional { "?" } else { "" }
            ),
            Token::Wildcard { .. } => f.write_str("*"),
        }
    }
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    tokens: Vec<Token>,
}

impl PathPattern {
    /// Compile a pattern expression.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut unnamed = 0usize;
        if pattern == "*" {
            let tokens = vec![Token::Wildcard {
                name: next_index(&mut unnamed),
            }];
            return Ok(Self::from_tokens(tokens));
        }

        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(pattern.to_string()))?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        let raw: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };

        let mut tokens = Vec::with_capacity(raw.len());
        let mut names = HashSet::new();
        for (i, segment) in raw.iter().enumerate() {
            let token = parse_segment(segment, &mut unnamed)?;
            match &token {
                Token::Wildcard { .. } if i + 1 != raw.len() => {
                    return Err(PatternError::WildcardNotLast);
                }
                Token::Param { name, .. } if !names.insert(name.clone()) => {
                    return Err(PatternError::DuplicateParam(name.clone()));
                }
                _ => {}
            }
            tokens.push(token);
        }

        Ok(Self::from_tokens(tokens))
    }

    fn from_tokens(tokens: Vec<Token>) -> Self {
        let source = match tokens.as_slice() {
            [Token::Wildcard { .. }] => "*".to_string(),
            _ => {
                let mut out = String::new();
                for token in &tokens {
                    out.push('/');
                    out.push_str(&token.to_string());
                }
                if out.is_empty() {
                    out.push('/');
                }
                out
            }
        };
        Self { source, tokens }
    }

    /// Canonical source string of the pattern.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True for the bare `*` pattern, which accepts every path.
    pub fn is_catch_all(&self) -> bool {
        matches!(self.tokens.as_slice(), [Token::Wildcard { .. }])
    }

    /// Match a path, returning the captured parameters.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let decoded: Vec<Cow<'_, str>> = split_path(path)
            .into_iter()
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy())
            .collect();
        let segments: Vec<&str> = decoded.iter().map(AsRef::as_ref).collect();
        let mut captures = Vec::new();
        if match_tokens(&self.tokens, &segments, &mut captures) {
            Some(captures.into_iter().collect())
        } else {
            None
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn next_index(unnamed: &mut usize) -> String {
    let name = unnamed.to_string();
    *unnamed += 1;
    name
}

fn parse_segment(segment: &str, unnamed: &mut usize) -> Result<Token, PatternError> {
    if segment.is_empty() {
        return Err(PatternError::UnsupportedSegment(segment.to_string()));
    }

    if segment == "*" {
        return Ok(Token::Wildcard {
            name: next_index(unnamed),
        });
    }

    if let Some(body) = segment.strip_prefix(':') {
        let (name, optional) = match body.strip_suffix('?') {
            Some(name) => (name, true),
            None => (body, false),
        };
        if name.is_empty() {
            return Err(PatternError::EmptyParamName(segment.to_string()));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PatternError::UnsupportedSegment(segment.to_string()));
        }
        return Ok(Token::Param {
            name: name.to_string(),
            optional,
        });
    }

    if let Some(body) = segment.strip_prefix('(') {
        let (inner, optional) = if let Some(inner) = body.strip_suffix(")?") {
            (inner, true)
        } else if let Some(inner) = body.strip_suffix(')') {
            (inner, false)
        } else {
            return Err(PatternError::UnclosedGroup(segment.to_string()));
        };

        let alternatives: Vec<String> = inner.split('|').map(str::to_string).collect();
        if alternatives.iter().any(String::is_empty) {
            return Err(PatternError::EmptyAlternative(segment.to_string()));
        }
        if alternatives.iter().any(|alt| alt.contains(is_reserved)) {
            return Err(PatternError::UnsupportedSegment(segment.to_string()));
        }
        return Ok(Token::Group {
            name: next_index(unnamed),
            alternatives,
            optional,
        });
    }

    if segment.contains(is_reserved) || segment.contains('?') {
        return Err(PatternError::UnsupportedSegment(segment.to_string()));
    }
    Ok(Token::Literal(segment.to_string()))
}

fn is_reserved(c: char) -> bool {
    matches!(c, '(' | ')' | '*' | ':' | '|')
}

fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

fn match_tokens(tokens: &[Token], segments: &[&str], captures: &mut Vec<(String, String)>) -> bool {
    let Some((token, rest)) = tokens.split_first() else {
        return segments.is_empty();
    };

    if let Token::Wildcard { name } = token {
        captures.push((name.clone(), segments.join("/")));
        return true;
    }

    if let Some((segment, remaining)) = segments.split_first() {
        let capture = match token {
            Token::Literal(text) => (text == segment).then_some(None),
            Token::Param { name, .. } => (!segment.is_empty()).then(|| Some(name)),
            Token::Group {
                name, alternatives, ..
            } => alternatives.iter().any(|alt| alt == segment).then(|| Some(name)),
            Token::Wildcard { .. } => None,
        };

        if let Some(capture) = capture {
            let mark = captures.len();
            if let Some(name) = capture {
                captures.push((name.clone(), segment.to_string()));
            }
            if match_tokens(rest, remaining, captures) {
                return true;
            }
            captures.truncate(mark);
        }
    }

    token.is_optional() && match_tokens(rest, segments, captures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_group() {
        let pattern = PathPattern::parse("/(home|debug.html)?").unwrap();

        assert_eq!(pattern.match_path("/"), Some(Params::new()));
        assert_eq!(pattern.match_path("").map(|p| p.len()), Some(0));

        let params = pattern.match_path("/debug.html").unwrap();
        assert_eq!(params.get("0").map(String::as_str), Some("debug.html"));

        assert!(pattern.match_path("/home").is_some());
        assert!(pattern.match_path("/list").is_none());
        assert!(pattern.match_path("/home/extra").is_none());
    }

    #[test]
    fn test_literal_and_trailing_slash() {
        let pattern = PathPattern::parse("/list").unwrap();
        assert!(pattern.match_path("/list").is_some());
        assert!(pattern.match_path("/list/").is_some());
        assert!(pattern.match_path("/List").is_none()); // Case sensitive
        assert!(pattern.match_path("/lists").is_none());
    }

    #[test]
    fn test_named_params() {
        let pattern = PathPattern::parse("/users/:id/posts/:post?").unwrap();

        let params = pattern.match_path("/users/42/posts").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(!params.contains_key("post"));

        let params = pattern.match_path("/users/42/posts/7").unwrap();
        assert_eq!(params.get("post").map(String::as_str), Some("7"));

        assert!(pattern.match_path("/users/posts").is_none());
    }

    #[test]
    fn test_wildcards() {
        let all = PathPattern::parse("*").unwrap();
        assert!(all.is_catch_all());
        assert!(all.match_path("/").is_some());
        assert_eq!(
            all.match_path("/a/b").unwrap().get("0").map(String::as_str),
            Some("a/b")
        );

        let docs = PathPattern::parse("/docs/*").unwrap();
        assert!(!docs.is_catch_all());
        assert!(docs.match_path("/docs").is_some());
        assert_eq!(
            docs.match_path("/docs/guide/intro").unwrap().get("0").map(String::as_str),
            Some("guide/intro")
        );
        assert!(docs.match_path("/blog").is_none());
    }

    #[test]
    fn test_optional_backtracking() {
        // The optional param must give way so the literal can match.
        let pattern = PathPattern::parse("/:lang?/about").unwrap();
        assert!(pattern.match_path("/about").is_some());
        assert_eq!(
            pattern.match_path("/en/about").unwrap().get("lang").map(String::as_str),
            Some("en")
        );
    }

    #[test]
    fn test_encoded_segments_are_decoded() {
        let spaced = PathPattern::parse("/hello world").unwrap();
        assert!(spaced.match_path("/hello%20world").is_some());
        assert!(spaced.match_path("/hello%2520world").is_none());

        let accented = PathPattern::parse("/café").unwrap();
        assert!(accented.match_path("/caf%C3%A9").is_some());
        assert!(accented.match_path("/café").is_some());

        let user = PathPattern::parse("/users/:name").unwrap();
        let params = user.match_path("/users/jos%C3%A9").unwrap();
        assert_eq!(params["name"], "josé");

        let files = PathPattern::parse("/files/*").unwrap();
        let params = files.match_path("/files/my%20docs/a.txt").unwrap();
        assert_eq!(params["0"], "my docs/a.txt");
    }

    #[test]
    fn test_canonical_source() {
        assert_eq!(PathPattern::parse("/").unwrap().source(), "/");
        assert_eq!(PathPattern::parse("/list/").unwrap().source(), "/list");
        assert_eq!(
            PathPattern::parse("/(home|debug.html)?").unwrap().to_string(),
            "/(home|debug.html)?"
        );
        assert_eq!(PathPattern::parse("*").unwrap().source(), "*");
    }

    #[test]
    fn test_compile_errors() {
        assert_eq!(PathPattern::parse(""), Err(PatternError::Empty));
        assert!(matches!(
            PathPattern::parse("list"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            PathPattern::parse("/(a|b"),
            Err(PatternError::UnclosedGroup(_))
        ));
        assert!(matches!(
            PathPattern::parse("/(a|)"),
            Err(PatternError::EmptyAlternative(_))
        ));
        assert!(matches!(
            PathPattern::parse("/:"),
            Err(PatternError::EmptyParamName(_))
        ));
        assert_eq!(
            PathPattern::parse("/:id/:id"),
            Err(PatternError::DuplicateParam("id".into()))
        );
        assert_eq!(PathPattern::parse("/*/x"), Err(PatternError::WildcardNotLast));
        assert!(matches!(
            PathPattern::parse("/file:id"),
            Err(PatternError::UnsupportedSegment(_))
        ));
    }
}
