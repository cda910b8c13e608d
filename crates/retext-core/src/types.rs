use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occurrence {
    #[default]
    First,
    Last,
    All,
}

impl FromStr for Occurrence {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Occurrence::First),
            "last" => Ok(Occurrence::Last),
            "all" => Ok(Occurrence::All),
            other => Err(RuleError::UnknownOccurrence(other.to_string())),
        }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Occurrence::First => "first",
            Occurrence::Last => "last",
            Occurrence::All => "all",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuleError {
    #[error("find text must not be empty")]
    EmptyFind,
    #[error("block delimiters must not be empty")]
    EmptyDelimiter,
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("pattern '{0}' matches the empty string")]
    EmptyMatch(String),
    #[error("unknown occurrence '{0}' (expected first, last or all)")]
    UnknownOccurrence(String),
}

#[derive(Debug, Clone)]
pub enum RuleOp {
    Literal {
        find: String,
        replace: String,
    },
    Block {
        start: String,
        end: String,
        replace: String,
        occurrence: Occurrence,
    },
    Pattern {
        regex: Regex,
        replace: String,
        occurrence: Occurrence,
    },
}

impl PartialEq for RuleOp {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                RuleOp::Literal { find, replace },
                RuleOp::Literal {
                    find: f2,
                    replace: r2,
                },
            ) => find == f2 && replace == r2,
            (
                RuleOp::Block {
                    start,
                    end,
                    replace,
                    occurrence,
                },
                RuleOp::Block {
                    start: s2,
                    end: e2,
                    replace: r2,
                    occurrence: o2,
                },
            ) => start == s2 && end == e2 && replace == r2 && occurrence == o2,
            (
                RuleOp::Pattern {
                    regex,
                    replace,
                    occurrence,
                },
                RuleOp::Pattern {
                    regex: x2,
                    replace: r2,
                    occurrence: o2,
                },
            ) => regex.as_str() == x2.as_str() && replace == r2 && occurrence == o2,
            _ => false,
        }
    }
}

/// A single declarative edit. Construct through [`Rule::literal`],
/// [`Rule::block`] or [`Rule::pattern`] so invalid rules never reach the
/// applier.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: Option<String>,
    pub op: RuleOp,
}

impl Rule {
    pub fn literal(find: impl Into<String>, replace: impl Into<String>) -> Result<Self, RuleError> {
        let find = find.into();
        if find.is_empty() {
            return Err(RuleError::EmptyFind);
        }
        Ok(Rule {
            name: None,
            op: RuleOp::Literal {
                find,
                replace: replace.into(),
            },
        })
    }

    pub fn block(
        start: impl Into<String>,
        end: impl Into<String>,
        replace: impl Into<String>,
        occurrence: Occurrence,
    ) -> Result<Self, RuleError> {
        let start = start.into();
        let end = end.into();
        if start.is_empty() || end.is_empty() {
            return Err(RuleError::EmptyDelimiter);
        }
        Ok(Rule {
            name: None,
            op: RuleOp::Block {
                start,
                end,
                replace: replace.into(),
                occurrence,
            },
        })
    }

    pub fn pattern(
        pattern: &str,
        replace: impl Into<String>,
        occurrence: Occurrence,
    ) -> Result<Self, RuleError> {
        let regex = Regex::new(pattern).map_err(|e| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        if regex.is_match("") {
            return Err(RuleError::EmptyMatch(pattern.to_string()));
        }
        Ok(Rule {
            name: None,
            op: RuleOp::Pattern {
                regex,
                replace: replace.into(),
                occurrence,
            },
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match &self.op {
            RuleOp::Literal { find, .. } => format!("find {:?}", preview(find)),
            RuleOp::Block { start, end, .. } => {
                format!("block {:?}..{:?}", preview(start), preview(end))
            }
            RuleOp::Pattern { regex, .. } => format!("pattern {:?}", preview(regex.as_str())),
        }
    }
}

fn preview(s: &str) -> String {
    let first = s.lines().next().unwrap_or("");
    let mut out: String = first.chars().take(40).collect();
    if out.len() < s.len() {
        out.push_str("...");
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn with(mut self, rule: Rule) -> Self {
        self.push(rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub label: String,
    pub replacements: usize,
}

impl RuleOutcome {
    pub fn matched(&self) -> bool {
        self.replacements > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patched {
    pub text: String,
    pub outcomes: Vec<RuleOutcome>,
}

impl Patched {
    pub fn replacements(&self) -> usize {
        self.outcomes.iter().map(|o| o.replacements).sum()
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| !o.matched())
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOptions {
    pub dry_run: bool,
    pub strict: bool,
    pub atomic_write: bool,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            strict: false,
            atomic_write: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSummary {
    pub rules: usize,
    pub applied: usize,
    pub unmatched: usize,
    pub replacements: usize,
    pub changed: bool,
    pub written: bool,
}
