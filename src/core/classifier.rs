/// Per-line classification of f-string candidates
///
/// The classifier runs a candidate line through an ordered rule list and
/// returns the first rewrite produced, or `Suggestion::NoMatch`. It holds no
/// state besides the rule list, so classifying the same text always gives the
/// same answer.

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::core::rules::{has_format_suffix, Rule, DEFAULT_RULES, RULE_NAMES};
use crate::core::scanner::{literal_starts, MARKERS};

/// A proposed replacement line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    /// Name of the rule that produced the rewrite
    pub rule: String,
    /// Replacement line, indentation preserved
    pub text: String,
}

/// Outcome of classifying one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    NoMatch,
    Matched(Rewrite),
}

impl Suggestion {
    pub fn is_match(&self) -> bool {
        matches!(self, Suggestion::Matched(_))
    }

    pub fn rewrite(&self) -> Option<&Rewrite> {
        match self {
            Suggestion::Matched(rewrite) => Some(rewrite),
            Suggestion::NoMatch => None,
        }
    }
}

/// Why a candidate got no suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    /// More than one f-string literal opened on the line
    MultipleLiterals,
    /// The literal has no expression slot
    NoSlot,
    /// The literal has two or more expression slots
    MultipleSlots,
    /// An expression contains braces of its own
    NestedBraces,
    /// The expression carries a format spec, conversion or `=` suffix
    FormatSpec,
    /// Single slot, but the surrounding code matches no rule
    UnsupportedShape,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MissReason::MultipleLiterals => "multiple f-strings on one line",
            MissReason::NoSlot => "no interpolation slot",
            MissReason::MultipleSlots => "multiple interpolation slots",
            MissReason::NestedBraces => "nested braces in expression",
            MissReason::FormatSpec => "format spec or conversion in expression",
            MissReason::UnsupportedShape => "unsupported call or statement shape",
        };
        f.write_str(text)
    }
}

/// Ordered rule list applied to candidate lines
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Classifier with the built-in rules
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES.clone())
    }

    /// Classifier with a caller-supplied rule list, tried in the given order
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Built-in rules minus the named ones; relative order is kept
    pub fn without_rules(disabled: &[String]) -> Self {
        for name in disabled {
            if !RULE_NAMES.contains(&name.as_str()) {
                log::warn!("Unknown rule in disabled_rules: {}", name);
            }
        }

        let rules = DEFAULT_RULES
            .iter()
            .filter(|rule| !disabled.iter().any(|name| name == rule.name()))
            .cloned()
            .collect();
        Self::with_rules(rules)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classify one line
    ///
    /// A line that opens a second f-string literal outside a trailing
    /// comment is never rewritten.
    pub fn classify(&self, line: &str) -> Suggestion {
        let line = line.trim_end();
        if literal_starts(line).len() > 1 {
            return Suggestion::NoMatch;
        }

        for rule in &self.rules {
            if let Some(text) = rule.apply(line) {
                debug!("Rule {} matched: {}", rule.name(), line.trim());
                return Suggestion::Matched(Rewrite {
                    rule: rule.name().to_string(),
                    text,
                });
            }
        }

        Suggestion::NoMatch
    }
}

/// Explain why a candidate line got no suggestion
///
/// Looks at the first f-string literal on the line and counts its top-level
/// expression slots. `{{` and `}}` outside a slot are escapes, not slots.
/// A marker found only in a comment or plain string is examined as if it
/// opened a literal.
pub fn diagnose_miss(line: &str) -> MissReason {
    let starts = literal_starts(line);
    if starts.len() > 1 {
        return MissReason::MultipleLiterals;
    }

    let first_marker = || MARKERS.iter().filter_map(|marker| line.find(marker)).min();
    let start = match starts.first().copied().or_else(first_marker) {
        Some(start) => start,
        None => return MissReason::UnsupportedShape,
    };

    let mut chars = line[start + 1..].chars();
    let quote = match chars.next() {
        Some(quote) => quote,
        None => return MissReason::UnsupportedShape,
    };

    let mut depth = 0usize;
    let mut slots = 0usize;
    let mut nested = false;
    let mut expr = String::new();
    let mut chars = chars.peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if depth == 0 && chars.peek() == Some(&'{') => {
                chars.next();
            }
            '}' if depth == 0 && chars.peek() == Some(&'}') => {
                chars.next();
            }
            '{' => {
                if depth == 0 {
                    slots += 1;
                } else {
                    nested = true;
                }
                depth += 1;
            }
            '}' if depth > 0 => depth -= 1,
            c if c == quote && depth == 0 => break,
            c => {
                if depth > 0 && slots == 1 {
                    expr.push(c);
                }
            }
        }
    }

    if nested {
        MissReason::NestedBraces
    } else if slots == 0 {
        MissReason::NoSlot
    } else if slots > 1 {
        MissReason::MultipleSlots
    } else if has_format_suffix(&expr) {
        MissReason::FormatSpec
    } else {
        MissReason::UnsupportedShape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::{self, Template};

    fn rewrite_text(suggestion: &Suggestion) -> Option<&str> {
        suggestion.rewrite().map(|rewrite| rewrite.text.as_str())
    }

    #[test]
    fn test_documented_scenarios() {
        let classifier = Classifier::new();

        let logged = classifier.classify(r#"logger.info(f"Loaded {count} items")"#);
        assert_eq!(rewrite_text(&logged), Some(r#"logger.info("Loaded %s items", count)"#));
        assert_eq!(logged.rewrite().map(|r| r.rule.as_str()), Some(rules::LOGGING_CALL));

        let printed = classifier.classify(r#"print(f"Value: {x}")"#);
        assert_eq!(rewrite_text(&printed), Some(r#"print("Value: %s" % (x))"#));

        let assigned = classifier.classify(r#"msg = f"Hello {name}!""#);
        assert_eq!(rewrite_text(&assigned), Some(r#"msg = "Hello %s!" % (name)"#));

        assert_eq!(classifier.classify(r#"s = f"{a}-{b}""#), Suggestion::NoMatch);
    }

    #[test]
    fn test_indentation_preserved() {
        let classifier = Classifier::new();
        let suggestion = classifier.classify("        logger.debug(f'got {n}')\r");
        assert_eq!(rewrite_text(&suggestion), Some("        logger.debug('got %s', n)"));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let classifier = Classifier::new();
        let line = r#"    raise KeyError(f"missing {key}")"#;
        let first = classifier.classify(line);
        for _ in 0..5 {
            assert_eq!(classifier.classify(line), first);
        }
    }

    #[test]
    fn test_two_literals_never_match() {
        let classifier = Classifier::new();
        let line = r#"logger.info(f"{a}") or print(f"{b}")"#;
        assert_eq!(classifier.classify(line), Suggestion::NoMatch);
        assert_eq!(diagnose_miss(line), MissReason::MultipleLiterals);
    }

    #[test]
    fn test_marker_in_trailing_comment_still_matches() {
        let classifier = Classifier::new();
        assert_eq!(
            rewrite_text(&classifier.classify(r#"print(f"{x}")  # use f'' here"#)),
            Some(r#"print("%s" % (x))  # use f'' here"#)
        );
        assert_eq!(
            rewrite_text(&classifier.classify(r#"    logger.info(f"{x}")  # was f"{x!r}""#)),
            Some(r#"    logger.info("%s", x)  # was f"{x!r}""#)
        );
    }

    #[test]
    fn test_literal_text_ending_in_f() {
        let classifier = Classifier::new();
        let cases = [
            (
                r#"logger.info(f"Saving {name} to pdf")"#,
                r#"logger.info("Saving %s to pdf", name)"#,
            ),
            (
                r#"print(f"Loaded {cfg['conf']}")"#,
                r#"print("Loaded %s" % (cfg['conf']))"#,
            ),
            (r#"msg = f"Hello {name} of""#, r#"msg = "Hello %s of" % (name)"#),
            (r#"return(f"Hi {x}")"#, r#"return("Hi %s" % (x))"#),
        ];
        for (line, expected) in cases {
            assert_eq!(rewrite_text(&classifier.classify(line)), Some(expected), "{}", line);
        }
    }

    #[test]
    fn test_format_spec_gets_no_suggestion() {
        let classifier = Classifier::new();
        for line in [
            r#"print(f"{x:>10}")"#,
            r#"logger.info(f"{x!r}")"#,
            r#"total = f"{price:.2f}""#,
            r#"msg = f"{x=}""#,
        ] {
            assert_eq!(classifier.classify(line), Suggestion::NoMatch, "{}", line);
            assert_eq!(diagnose_miss(line), MissReason::FormatSpec, "{}", line);
        }
        assert_eq!(
            rewrite_text(&classifier.classify(r#"print(f"{a != b}")"#)),
            Some(r#"print("%s" % (a != b))"#)
        );
        assert_eq!(
            rewrite_text(&classifier.classify(r#"print(f"{d['a:b']}")"#)),
            Some(r#"print("%s" % (d['a:b']))"#)
        );
    }

    #[test]
    fn test_earliest_rule_wins() {
        let any_call = Rule::new(
            "any_call",
            &[r"^(?P<indent>\s*)(?P<head>[\w.]+\(){literal}(?P<tail>\).*)$"],
            Template::PercentOperator,
        )
        .unwrap();
        let line = r#"logger.info(f"Loaded {count} items")"#;

        let logging_first = Classifier::with_rules(vec![
            rules::logging_call_rule().unwrap(),
            any_call.clone(),
        ]);
        let suggestion = logging_first.classify(line);
        assert_eq!(suggestion.rewrite().map(|r| r.rule.as_str()), Some(rules::LOGGING_CALL));

        let any_first = Classifier::with_rules(vec![any_call, rules::logging_call_rule().unwrap()]);
        let suggestion = any_first.classify(line);
        assert_eq!(suggestion.rewrite().map(|r| r.rule.as_str()), Some("any_call"));
        assert_eq!(
            rewrite_text(&suggestion),
            Some(r#"logger.info("Loaded %s items" % (count))"#)
        );
    }

    #[test]
    fn test_without_rules_keeps_order() {
        let classifier = Classifier::without_rules(&["builtin_call".to_string(), "bogus".to_string()]);
        let names: Vec<_> = classifier.rules().iter().map(|rule| rule.name()).collect();
        assert_eq!(names, vec![rules::LOGGING_CALL, rules::ASSIGNMENT]);
        assert_eq!(classifier.classify(r#"print(f"Value: {x}")"#), Suggestion::NoMatch);
    }

    #[test]
    fn test_diagnose_miss() {
        assert_eq!(diagnose_miss(r#"s = f"{a}-{b}""#), MissReason::MultipleSlots);
        assert_eq!(diagnose_miss(r#"print(f"{ {'k': 1}['k'] }")"#), MissReason::NestedBraces);
        assert_eq!(diagnose_miss(r#"print(f"plain text")"#), MissReason::NoSlot);
        assert_eq!(diagnose_miss(r#"print(f"{{literal}}")"#), MissReason::NoSlot);
        assert_eq!(diagnose_miss(r#"x = foo(f"{a}", b)"#), MissReason::UnsupportedShape);
        assert_eq!(diagnose_miss(r#"s = f'{a}' "{b}""#), MissReason::UnsupportedShape);
        assert_eq!(diagnose_miss(r#"s = "elf" + f"{a}{b}""#), MissReason::MultipleSlots);
    }
}
