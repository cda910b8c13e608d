pub mod fence_markers;
pub mod toml_rules;

pub use toml_rules::parse_toml;

use crate::types::{Rule, RuleError, RuleSet};
use fence_markers::{
    parse_opening, strip_terminator, FenceKind, MARKER_BLOCK_DIVIDER, MARKER_DIVIDER,
    MARKER_REPLACE_END,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: fence opened here is never closed")]
    Unterminated { line: usize },
    #[error("line {line}: block fence needs a '-------' line between its start and end delimiters")]
    MissingBlockDivider { line: usize },
    #[error("line {line}: {source}")]
    InvalidRule {
        line: usize,
        #[source]
        source: RuleError,
    },
    #[error("invalid TOML rule file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("rule #{index}: {reason}")]
    InvalidTomlRule { index: usize, reason: String },
}

#[derive(Debug, PartialEq)]
enum ParserState {
    Idle,
    InFind,
    InEnd,
    InReplace,
}

/// Parses the fenced rule format into an ordered rule set.
///
/// Text outside fences is ignored, except that the non-empty line directly
/// above an opening fence names the rule.
pub fn parse(content: &str) -> Result<RuleSet, ParseError> {
    let mut rules = RuleSet::new();
    let mut state = ParserState::Idle;
    let mut previous_line = String::new();
    let mut name: Option<String> = None;
    let mut kind = FenceKind::Search;
    let mut opened_at = 0;
    let mut find_lines: Vec<&str> = Vec::new();
    let mut end_lines: Vec<&str> = Vec::new();
    let mut replace_lines: Vec<&str> = Vec::new();

    for (idx, line) in content.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let stripped = line.trim();

        match state {
            ParserState::Idle => {
                if let Some(opening) = parse_opening(stripped, line_no) {
                    kind = opening?;
                    opened_at = line_no;
                    let candidate = previous_line.trim();
                    name = (!candidate.is_empty()).then(|| candidate.to_string());
                    find_lines.clear();
                    end_lines.clear();
                    replace_lines.clear();
                    state = ParserState::InFind;
                } else if stripped.starts_with("```") || stripped.is_empty() {
                    previous_line.clear();
                } else {
                    previous_line = line.to_string();
                }
            }
            ParserState::InFind => {
                let is_block = matches!(kind, FenceKind::Block(_));
                if is_block && stripped == MARKER_BLOCK_DIVIDER {
                    state = ParserState::InEnd;
                } else if stripped == MARKER_DIVIDER {
                    if is_block {
                        return Err(ParseError::MissingBlockDivider { line: opened_at });
                    }
                    state = ParserState::InReplace;
                } else {
                    find_lines.push(line);
                }
            }
            ParserState::InEnd => {
                if stripped == MARKER_DIVIDER {
                    state = ParserState::InReplace;
                } else {
                    end_lines.push(line);
                }
            }
            ParserState::InReplace => {
                if stripped == MARKER_REPLACE_END {
                    let rule = build_rule(
                        kind,
                        strip_terminator(find_lines.concat()),
                        strip_terminator(end_lines.concat()),
                        strip_terminator(replace_lines.concat()),
                    )
                    .map_err(|source| ParseError::InvalidRule {
                        line: opened_at,
                        source,
                    })?;
                    rules.push(match name.take() {
                        Some(n) => rule.named(n),
                        None => rule,
                    });
                    state = ParserState::Idle;
                    previous_line.clear();
                } else {
                    replace_lines.push(line);
                }
            }
        }
    }

    if state != ParserState::Idle {
        return Err(ParseError::Unterminated { line: opened_at });
    }

    Ok(rules)
}

fn build_rule(kind: FenceKind, find: String, end: String, replace: String) -> Result<Rule, RuleError> {
    match kind {
        FenceKind::Search => Rule::literal(find, replace),
        FenceKind::Block(occurrence) => Rule::block(find, end, replace, occurrence),
        FenceKind::Pattern(occurrence) => Rule::pattern(&find, replace, occurrence),
    }
}
