//! Route rule codec for permission path specifications.
//!
//! A permission stores its HTTP rules as free text, one rule per line.
//! `GET,POST:/users` restricts the line to the listed methods; a bare
//! `/users` inherits the permission's default method list, and an empty
//! default list means any method.

use serde::{Serialize, Serializer};

/// Badge text shown for rules that accept every method.
pub const ANY_METHOD: &str = "ANY";

/// Methods a single rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Methods {
    Any,
    /// Upper-cased method tokens, in the order they were written. Never empty.
    Only(Vec<String>),
}

impl Methods {
    /// Normalize raw method tokens: trim, upper-case, drop blanks.
    /// No remaining tokens means [`Methods::Any`].
    pub fn only<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        if list.is_empty() {
            Methods::Any
        } else {
            Methods::Only(list)
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Methods::Any)
    }

    /// Whether a request method is covered by this set.
    pub fn allows(&self, method: &str) -> bool {
        match self {
            Methods::Any => true,
            Methods::Only(list) => list.iter().any(|m| m.eq_ignore_ascii_case(method.trim())),
        }
    }

    /// Labels to display, `ANY` for the unrestricted set.
    pub fn badges(&self) -> Vec<&str> {
        match self {
            Methods::Any => vec![ANY_METHOD],
            Methods::Only(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

impl Serialize for Methods {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Methods::Any => serializer.serialize_str(ANY_METHOD),
            Methods::Only(list) => list.serialize(serializer),
        }
    }
}

/// One `(methods, path)` pair parsed from a line of a path specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub methods: Methods,
    pub path: String,
}

impl Rule {
    pub fn new(methods: Methods, path: impl Into<String>) -> Self {
        Self {
            methods,
            path: path.into(),
        }
    }

    /// Serialize back to the line syntax. Unrestricted rules become bare paths.
    pub fn to_line(&self) -> String {
        match &self.methods {
            Methods::Any => self.path.clone(),
            Methods::Only(list) => format!("{}:{}", list.join(","), self.path),
        }
    }
}

/// Parse a raw path specification into rules, one per line.
///
/// Lines are separated by `\n`; a trailing `\r` is ignored so CRLF text from
/// form textareas parses the same as LF text. Parsing never fails: a line with
/// no path after `:` yields a rule with an empty path.
pub fn parse<S: AsRef<str>>(raw: &str, default_methods: &[S]) -> Vec<Rule> {
    raw.split('\n')
        .map(|line| parse_line(line.strip_suffix('\r').unwrap_or(line), default_methods))
        .collect()
}

fn parse_line<S: AsRef<str>>(line: &str, default_methods: &[S]) -> Rule {
    match line.split_once(':') {
        Some((methods, path)) => Rule::new(Methods::only(methods.split(',')), path),
        None => Rule::new(Methods::only(default_methods), line),
    }
}

/// Serialize rules back to raw text, one line per rule.
pub fn encode(rules: &[Rule]) -> String {
    rules
        .iter()
        .map(Rule::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prepend the admin route prefix to a rule path.
///
/// The prefix is trimmed of slashes and re-joined with a single leading
/// slash. An empty (or all-slash) prefix leaves the path untouched.
pub fn prefixed_path(route_prefix: &str, path: &str) -> String {
    let prefix = route_prefix.trim_matches('/');
    if prefix.is_empty() {
        return path.to_string();
    }
    if path.is_empty() || path.starts_with('/') {
        format!("/{prefix}{path}")
    } else {
        format!("/{prefix}/{path}")
    }
}

/// Render rules as badge markup for the listing and detail views.
pub fn render(rules: &[Rule], route_prefix: &str) -> String {
    rules
        .iter()
        .map(|rule| render_rule(rule, route_prefix))
        .collect()
}

fn render_rule(rule: &Rule, route_prefix: &str) -> String {
    let badges = rule
        .methods
        .badges()
        .into_iter()
        .map(|m| format!("<span class='label label-primary'>{}</span>", escape_html(m)))
        .collect::<Vec<_>>()
        .join("&nbsp;");
    let path = prefixed_path(route_prefix, &rule.path);
    format!(
        "<div style='margin-bottom: 5px;'>{badges}<code>{}</code></div>",
        escape_html(&path)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
