use crate::matcher::{block_spans, literal_spans, pattern_spans, select, splice};
use crate::types::{Patched, Rule, RuleOp, RuleOutcome, RuleSet};
use log::{debug, info};

/// Applies `rules` to `document` in declaration order. Pure: the caller owns
/// reading and writing the document.
pub fn apply(document: &str, rules: &RuleSet) -> Patched {
    let mut text = document.to_string();
    let mut outcomes = Vec::with_capacity(rules.len());

    for (i, rule) in rules.iter().enumerate() {
        let (next, replacements) = apply_rule(&text, rule);
        let label = rule.label();

        if replacements == 0 {
            info!("Rule #{} ({}) matched nothing", i + 1, label);
        } else {
            debug!("Rule #{} ({}) made {} replacement(s)", i + 1, label, replacements);
            text = next;
        }

        outcomes.push(RuleOutcome {
            label,
            replacements,
        });
    }

    Patched { text, outcomes }
}

/// Applies a single rule, returning the new text and how many spans it
/// replaced. An unmatched rule returns the input unchanged.
pub fn apply_rule(text: &str, rule: &Rule) -> (String, usize) {
    let (spans, replacement) = match &rule.op {
        RuleOp::Literal { find, replace } => (literal_spans(text, find), replace),
        RuleOp::Block {
            start,
            end,
            replace,
            occurrence,
        } => (select(block_spans(text, start, end), *occurrence), replace),
        RuleOp::Pattern {
            regex,
            replace,
            occurrence,
        } => (select(pattern_spans(text, regex), *occurrence), replace),
    };

    if spans.is_empty() {
        return (text.to_string(), 0);
    }
    (splice(text, &spans, replacement), spans.len())
}
