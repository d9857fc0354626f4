/// Rewrite rule definitions
///
/// Each rule pairs one or more line shapes with a rewrite template. Shapes are
/// regex templates in which `{literal}` stands for a single-slot f-string
/// literal; every shape is compiled once per quote style. The built-in rules
/// are compiled once and kept in `DEFAULT_RULES` in priority order.

use lazy_static::lazy_static;
use log::error;
use regex::{Captures, Regex};
use serde::Serialize;

/// Placeholder token substituted for the expression slot
pub const PLACEHOLDER: &str = "%s";

/// Token marking where the f-string literal sits in a shape template
pub const LITERAL_TOKEN: &str = "{literal}";

pub const LOGGING_CALL: &str = "logging_call";
pub const BUILTIN_CALL: &str = "builtin_call";
pub const ASSIGNMENT: &str = "assignment";

/// Names of the built-in rules in priority order
pub const RULE_NAMES: [&str; 3] = [LOGGING_CALL, BUILTIN_CALL, ASSIGNMENT];

const QUOTES: [char; 2] = ['"', '\''];

/// How the extracted parts are put back together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    /// `head"pre%spost", expr tail` - the expression becomes a separate argument
    ArgumentPair,
    /// `head"pre%spost" % (expr) tail` - the expression is applied with `%`
    PercentOperator,
}

/// Parts captured from a matching line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<'a> {
    pub indent: &'a str,
    pub head: &'a str,
    pub quote: char,
    pub pre: &'a str,
    pub expr: &'a str,
    pub post: &'a str,
    pub tail: &'a str,
}

impl<'a> Extraction<'a> {
    fn from_captures(caps: &Captures<'a>, quote: char) -> Option<Self> {
        let group = |name: &str| caps.name(name).map(|m| m.as_str());
        let expr = group("expr")?.trim();
        if expr.is_empty() || has_format_suffix(expr) {
            return None;
        }

        Some(Self {
            indent: group("indent").unwrap_or(""),
            head: group("head").unwrap_or(""),
            quote,
            pre: group("pre").unwrap_or(""),
            expr,
            post: group("post").unwrap_or(""),
            tail: group("tail").unwrap_or(""),
        })
    }

    /// Literal text with the slot replaced by the placeholder, quotes included
    fn template_literal(&self) -> String {
        format!(
            "{q}{}{}{}{q}",
            escape_percent(self.pre),
            PLACEHOLDER,
            escape_percent(self.post),
            q = self.quote
        )
    }
}

impl Template {
    /// Build the rewritten line from the extracted parts
    pub fn render(&self, parts: &Extraction) -> String {
        let literal = parts.template_literal();
        match self {
            Template::ArgumentPair => format!(
                "{}{}{}, {}{}",
                parts.indent, parts.head, literal, parts.expr, parts.tail
            ),
            Template::PercentOperator => format!(
                "{}{}{} % ({}){}",
                parts.indent, parts.head, literal, parts.expr, parts.tail
            ),
        }
    }
}

/// A literal `%` in the template would be read as a conversion
fn escape_percent(text: &str) -> String {
    text.replace('%', "%%")
}

/// Whether a slot expression carries a format spec, a conversion or a `=` suffix
///
/// `{x:>10}`, `{x!r}` and `{x=}` have no plain `%s` equivalent. Only the top
/// level counts: `{d[1:2]}`, `{a != b}` and `{d['a:b']}` are plain expressions.
pub fn has_format_suffix(expr: &str) -> bool {
    let expr = expr.trim();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = expr.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(open) = quote {
            if c == open {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return true,
            '!' if depth == 0 && chars.peek() != Some(&'=') => return true,
            _ => {}
        }
    }

    expr.ends_with('=') && !["==", "!=", "<=", ">="].iter().any(|op| expr.ends_with(op))
}

/// Regex for a single-slot f-string literal delimited by `quote`
///
/// Neither side of the slot may contain a brace, so literals with zero or
/// several slots, escaped braces or nested braces never match.
fn literal_pattern(quote: char) -> String {
    format!(
        r"f{q}(?P<pre>[^{q}{{}}]*)\{{(?P<expr>[^{{}}]+)\}}(?P<post>[^{q}{{}}]*){q}",
        q = quote
    )
}

/// A named rule: ordered shapes plus the template applied when one matches
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    template: Template,
    matchers: Vec<(char, Regex)>,
}

impl Rule {
    /// Compile a rule from shape templates
    ///
    /// # Arguments
    ///
    /// * `name` - Rule name shown in reports
    /// * `shapes` - Regex templates containing `{literal}` exactly once, with
    ///   named groups `indent`, `head` and `tail` around it
    /// * `template` - Rewrite applied on match
    pub fn new(name: &str, shapes: &[&str], template: Template) -> Result<Self, regex::Error> {
        let mut matchers = Vec::with_capacity(shapes.len() * QUOTES.len());
        for shape in shapes {
            for quote in QUOTES {
                let pattern = shape.replace(LITERAL_TOKEN, &literal_pattern(quote));
                matchers.push((quote, Regex::new(&pattern)?));
            }
        }

        Ok(Self {
            name: name.to_string(),
            template,
            matchers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> Template {
        self.template
    }

    /// Whether any of the rule's shapes matches the line
    pub fn matches(&self, line: &str) -> bool {
        self.extract(line).is_some()
    }

    /// Rewrite the line if one of the rule's shapes matches
    pub fn apply(&self, line: &str) -> Option<String> {
        self.extract(line).map(|parts| self.template.render(&parts))
    }

    fn extract<'a>(&self, line: &'a str) -> Option<Extraction<'a>> {
        self.matchers.iter().find_map(|(quote, regex)| {
            regex
                .captures(line)
                .and_then(|caps| Extraction::from_captures(&caps, *quote))
        })
    }
}

/// `logger.info(f"...")`, `self.log.debug(f'...')`
pub fn logging_call_rule() -> Result<Rule, regex::Error> {
    Rule::new(
        LOGGING_CALL,
        &[r"^(?P<indent>\s*)(?P<head>[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*\.[A-Za-z_]\w*\(){literal}(?P<tail>\).*)$"],
        Template::ArgumentPair,
    )
}

/// `print(f"...")`, `raise ValueError(f"...")`, `return f"..."`, `return(f"...")`
pub fn builtin_call_rule() -> Result<Rule, regex::Error> {
    Rule::new(
        BUILTIN_CALL,
        &[
            r"^(?P<indent>\s*)(?P<head>(?:print|return|raise(?:\s+[A-Za-z_][\w.]*)?)\(){literal}(?P<tail>\).*)$",
            r"^(?P<indent>\s*)(?P<head>return\s+){literal}(?P<tail>\s*)$",
        ],
        Template::PercentOperator,
    )
}

/// `name = f"..."` with nothing after the literal
pub fn assignment_rule() -> Result<Rule, regex::Error> {
    Rule::new(
        ASSIGNMENT,
        &[r"^(?P<indent>\s*)(?P<head>[A-Za-z_]\w*\s*=\s*){literal}(?P<tail>\s*)$"],
        Template::PercentOperator,
    )
}

/// Build the built-in rules in priority order
///
/// A rule whose shapes fail to compile is logged and left out.
pub fn default_rules() -> Vec<Rule> {
    let builders: [(&str, fn() -> Result<Rule, regex::Error>); 3] = [
        (LOGGING_CALL, logging_call_rule),
        (BUILTIN_CALL, builtin_call_rule),
        (ASSIGNMENT, assignment_rule),
    ];

    builders
        .iter()
        .filter_map(|(name, build)| match build() {
            Ok(rule) => Some(rule),
            Err(e) => {
                error!("Error compiling rule {}: {}", name, e);
                None
            }
        })
        .collect()
}

lazy_static! {
    /// Built-in rules, compiled once
    pub static ref DEFAULT_RULES: Vec<Rule> = default_rules();
}
