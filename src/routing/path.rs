//! Path normalization and template compilation.
//!
//! # Responsibilities
//! - Normalize templates and candidate paths with one shared rule
//! - Extract `{name}` / `{name*}` placeholders in first-occurrence order
//! - Compile a template into an anchored regex with one group per placeholder
//!
//! # Design Decisions
//! - Literal text is escaped; only placeholders are patterns
//! - `{name}` captures one segment (`[^/]+`), `{name*}` captures across `/` (`.+`)
//! - Duplicate names are allowed: they share a constraint, the last capture wins

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("placeholder regex is valid"));

const GREEDY_SUFFIX: char = '*';

/// Normalize a path: trim whitespace, strip leading/trailing slashes, prefix one `/`.
///
/// Interior slashes are left untouched so catch-all captures keep their text.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    let mut out = String::with_capacity(trimmed.len() + 1);
    out.push('/');
    out.push_str(trimmed);
    out
}

/// A placeholder occurrence in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Raw token including braces, e.g. `{slug*}`.
    pub token: String,
    /// Name with braces and the `*` suffix stripped.
    pub name: String,
    /// True for `{name*}`: the value may contain `/`.
    pub greedy: bool,
}

impl Placeholder {
    fn parse(token: &str) -> Self {
        let inner = &token[1..token.len() - 1];
        let (name, greedy) = match inner.strip_suffix(GREEDY_SUFFIX) {
            Some(stripped) => (stripped.trim_end_matches(GREEDY_SUFFIX), true),
            None => (inner, false),
        };
        Self {
            token: token.to_string(),
            name: name.to_string(),
            greedy,
        }
    }

    fn group(&self) -> &'static str {
        if self.greedy {
            "(.+)"
        } else {
            "([^/]+)"
        }
    }
}

/// A route path template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PathTemplate {
    raw: String,
}

impl PathTemplate {
    /// Create a template from a raw path; the path is normalized.
    pub fn new(raw: &str) -> Self {
        Self {
            raw: normalize(raw),
        }
    }

    /// The normalized template text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Distinct placeholder tokens in first-occurrence order.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        let mut seen: Vec<Placeholder> = Vec::new();
        for m in PLACEHOLDER.find_iter(&self.raw) {
            if seen.iter().all(|p| p.token != m.as_str()) {
                seen.push(Placeholder::parse(m.as_str()));
            }
        }
        seen
    }

    /// Rewrite `{name}` into `{name*}` so the placeholder spans segments.
    pub fn make_greedy(&mut self, name: &str) {
        let from = format!("{{{name}}}");
        let to = format!("{{{name}*}}");
        self.raw = self.raw.replace(&from, &to);
    }

    /// The anchored pattern string for this template.
    pub fn pattern(&self) -> String {
        self.build().0
    }

    /// Compile the template.
    pub fn compile(&self) -> Result<CompiledTemplate, regex::Error> {
        let (pattern, slots) = self.build();
        let regex = Regex::new(&pattern)?;
        Ok(CompiledTemplate { regex, slots })
    }

    fn build(&self) -> (String, Vec<String>) {
        let mut pattern = String::from("(?s)^");
        let mut slots = Vec::new();
        let mut last = 0;
        for m in PLACEHOLDER.find_iter(&self.raw) {
            pattern.push_str(&regex::escape(&self.raw[last..m.start()]));
            let placeholder = Placeholder::parse(m.as_str());
            pattern.push_str(placeholder.group());
            slots.push(placeholder.name);
            last = m.end();
        }
        pattern.push_str(&regex::escape(&self.raw[last..]));
        pattern.push('$');
        (pattern, slots)
    }
}

impl From<String> for PathTemplate {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<PathTemplate> for String {
    fn from(template: PathTemplate) -> Self {
        template.raw
    }
}

/// A compiled template: the regex and the name bound to each capture group.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    regex: Regex,
    slots: Vec<String>,
}

impl CompiledTemplate {
    /// Match a normalized path, returning `(name, value)` per capture in order.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Vec<(&str, &'p str)>> {
        let caps = self.regex.captures(path)?;
        let mut values = Vec::with_capacity(self.slots.len());
        for (i, name) in self.slots.iter().enumerate() {
            let value = caps.get(i + 1)?.as_str();
            values.push((name.as_str(), value));
        }
        Some(values)
    }
}
