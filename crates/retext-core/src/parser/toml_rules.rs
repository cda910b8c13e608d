use super::ParseError;
use crate::types::{Occurrence, Rule, RuleSet};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    #[serde(default, rename = "rule")]
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleEntry {
    name: Option<String>,
    find: Option<String>,
    start: Option<String>,
    end: Option<String>,
    pattern: Option<String>,
    #[serde(default)]
    replace: String,
    occurrence: Option<Occurrence>,
}

impl RuleEntry {
    fn into_rule(self, index: usize) -> Result<Rule, ParseError> {
        let invalid = |reason: String| ParseError::InvalidTomlRule { index, reason };

        let rule = match (self.find, self.start, self.end, self.pattern) {
            (Some(find), None, None, None) => {
                if self.occurrence.is_some() {
                    return Err(invalid(
                        "occurrence applies only to block and pattern rules".to_string(),
                    ));
                }
                Rule::literal(find, self.replace)
            }
            (None, Some(start), Some(end), None) => {
                Rule::block(start, end, self.replace, self.occurrence.unwrap_or_default())
            }
            (None, None, None, Some(pattern)) => {
                Rule::pattern(&pattern, self.replace, self.occurrence.unwrap_or_default())
            }
            _ => {
                return Err(invalid(
                    "set exactly one of `find`, `start` + `end`, or `pattern`".to_string(),
                ))
            }
        }
        .map_err(|e| invalid(e.to_string()))?;

        Ok(match self.name {
            Some(name) => rule.named(name),
            None => rule,
        })
    }
}

/// Parses a TOML rule file made of `[[rule]]` tables, keeping file order.
pub fn parse_toml(content: &str) -> Result<RuleSet, ParseError> {
    let file: RuleFile = toml::from_str(content)?;
    let rules = file
        .rules
        .into_iter()
        .enumerate()
        .map(|(i, entry)| entry.into_rule(i + 1))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RuleSet::from(rules))
}
