//! URL pattern compiler.
//!
//! A pattern is literal text interleaved with placeholders `{name}` or
//! `{name:constraint}`. A `?` directly after the closing brace marks the
//! placeholder optional for URL generation. The marker stays in the compiled
//! matcher as a literal `?`, so it has no effect on matching.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use smallvec::SmallVec;
use std::ops::Range;
use std::sync::Arc;

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured path parameters in placeholder order.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(\w+)(?::(\w+))?\}(\?)?").expect("placeholder regex should be valid")
});

/// Placeholder constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// No constraint: one segment of URL-safe characters
    Segment,
    /// `int`
    Int,
    /// `all`: anything, including `/`
    All,
    /// Any other token; compiles to an empty group
    Unknown(String),
}

impl Constraint {
    fn parse(token: Option<&str>) -> Self {
        match token {
            None => Constraint::Segment,
            Some("int") => Constraint::Int,
            Some("all") => Constraint::All,
            Some(other) => Constraint::Unknown(other.to_string()),
        }
    }

    /// Regex fragment for the capture group body. Character classes are
    /// ASCII-only, with ASCII case folding.
    #[must_use]
    pub fn fragment(&self) -> &'static str {
        match self {
            Constraint::Segment => r"(?-u:[\w\d.+%:-]+)",
            Constraint::Int => r"(?-u:\d+)",
            Constraint::All => ".+",
            Constraint::Unknown(_) => "",
        }
    }
}

/// One `{name[:constraint]}` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: Arc<str>,
    pub constraint: Constraint,
    /// Followed by the `?` marker
    pub optional: bool,
    /// Byte range of the braces in the raw pattern (excludes the marker)
    pub span: Range<usize>,
}

/// A compiled URL pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    placeholders: Vec<Placeholder>,
    matcher: Regex,
}

impl Pattern {
    /// Compile `raw` into an anchored, case-insensitive matcher.
    ///
    /// # Errors
    ///
    /// Returns the regex error when the generated expression is rejected,
    /// e.g. two placeholders sharing a name.
    pub fn compile(raw: &str) -> Result<Self, regex::Error> {
        let placeholders = scan(raw);

        let mut expr = String::with_capacity(raw.len() * 2 + 2);
        expr.push('^');
        let mut cursor = 0;
        for ph in &placeholders {
            expr.push_str(&regex::escape(&raw[cursor..ph.span.start]));
            expr.push_str("(?P<");
            expr.push_str(&ph.name);
            expr.push('>');
            expr.push_str(ph.constraint.fragment());
            expr.push(')');
            // The marker is left in the literal text that follows.
            cursor = ph.span.end;
        }
        expr.push_str(&regex::escape(&raw[cursor..]));
        expr.push('$');

        let matcher = RegexBuilder::new(&expr).case_insensitive(true).build()?;
        Ok(Self {
            raw: raw.to_string(),
            placeholders,
            matcher,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Named captures for `path`, or `None` when it does not match.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<ParamVec> {
        let caps = self.matcher.captures(path)?;
        let mut params = ParamVec::new();
        for ph in &self.placeholders {
            if let Some(m) = caps.name(&ph.name) {
                params.push((Arc::clone(&ph.name), m.as_str().to_string()));
            }
        }
        Some(params)
    }

    /// Rebuild the raw pattern, replacing each placeholder's braces with
    /// whatever `replace` returns. Text between placeholders, including any
    /// `?` markers, is copied unchanged.
    pub(crate) fn substitute<E, F>(&self, mut replace: F) -> Result<String, E>
    where
        F: FnMut(&Placeholder) -> Result<String, E>,
    {
        let mut out = String::with_capacity(self.raw.len());
        let mut cursor = 0;
        for ph in &self.placeholders {
            out.push_str(&self.raw[cursor..ph.span.start]);
            out.push_str(&replace(ph)?);
            cursor = ph.span.end;
        }
        out.push_str(&self.raw[cursor..]);
        Ok(out)
    }

    /// The pattern with constraints and optional markers removed:
    /// `/items/{id:int}/{slug}?` becomes `/items/{id}/{slug}`.
    #[must_use]
    pub fn template(&self) -> String {
        let mut out = String::with_capacity(self.raw.len());
        let mut cursor = 0;
        for ph in &self.placeholders {
            out.push_str(&self.raw[cursor..ph.span.start]);
            out.push('{');
            out.push_str(&ph.name);
            out.push('}');
            cursor = ph.span.end + usize::from(ph.optional);
        }
        out.push_str(&self.raw[cursor..]);
        out
    }
}

fn scan(raw: &str) -> Vec<Placeholder> {
    PLACEHOLDER_REGEX
        .captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            let optional = caps.get(3).is_some();
            let end = whole.end() - usize::from(optional);
            Some(Placeholder {
                name: Arc::from(name),
                constraint: Constraint::parse(caps.get(2).map(|m| m.as_str())),
                optional,
                span: whole.start()..end,
            })
        })
        .collect()
}
