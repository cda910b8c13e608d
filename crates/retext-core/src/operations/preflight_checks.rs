use super::file_operations::read_document;
use super::patch_applicator::apply;
use crate::types::{PatchOptions, Patched, RuleSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("preflight checks failed:\n{}", .0.join("\n"))]
pub struct PreflightFailed(pub Vec<String>);

/// Everything a successful preflight learned: the original document, the
/// simulated result and a human-readable line per check.
#[derive(Debug, Clone)]
pub struct Preflight {
    pub original: String,
    pub patched: Patched,
    pub report: Vec<String>,
}

impl Preflight {
    pub fn changed(&self) -> bool {
        self.original != self.patched.text
    }
}

/// Checks that `path` can be patched and simulates `rules` against it.
/// Nothing is written. Returns every failure found, not just the first.
pub fn run_preflight_checks(
    path: &Path,
    rules: &RuleSet,
    options: &PatchOptions,
) -> Result<Preflight, Vec<String>> {
    let prefix = format!("  - {:?}:", path);
    let mut errors = Vec::new();

    if !path.exists() {
        return Err(vec![format!("{} FAILED (File not found)", prefix)]);
    }
    if !path.is_file() {
        return Err(vec![format!("{} FAILED (Not a regular file)", prefix)]);
    }

    if !options.dry_run {
        if let Ok(metadata) = fs::metadata(path) {
            if metadata.permissions().readonly() {
                errors.push(format!("{} FAILED (File is read-only)", prefix));
            }
        }
    }

    let original = match read_document(path) {
        Ok(content) => content,
        Err(e) => {
            errors.push(format!("{} FAILED (Could not read file: {:#})", prefix, e));
            return Err(errors);
        }
    };

    let patched = apply(&original, rules);
    let mut report = vec![format!("{} OK ({} rule(s) to apply)", prefix, rules.len())];

    for (i, outcome) in patched.outcomes.iter().enumerate() {
        let line = format!("  - Rule #{} ({}):", i + 1, outcome.label);
        if outcome.matched() {
            report.push(format!("{} OK ({} replacement(s))", line, outcome.replacements));
        } else if options.strict {
            errors.push(format!("{} FAILED (No match)", line));
        } else {
            report.push(format!("{} UNMATCHED (skipped)", line));
        }
    }

    if errors.is_empty() {
        Ok(Preflight {
            original,
            patched,
            report,
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rule;
    use tempfile::tempdir;

    fn spacing_rules() -> RuleSet {
        RuleSet::new()
            .with(Rule::literal("font - size", "font-size").unwrap())
            .with(Rule::literal("margin - top", "margin-top").unwrap())
    }

    #[test]
    fn test_preflight_success_reports_unmatched() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Register.js");
        fs::write(&file_path, "font - size: 1rem;").unwrap();

        let preflight =
            run_preflight_checks(&file_path, &spacing_rules(), &PatchOptions::default()).unwrap();
        assert!(preflight.changed());
        assert_eq!(preflight.patched.text, "font-size: 1rem;");
        assert!(preflight.report[1].contains("OK (1 replacement(s))"));
        assert!(preflight.report[2].contains("UNMATCHED"));
    }

    #[test]
    fn test_preflight_strict_fails_on_unmatched() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Register.js");
        fs::write(&file_path, "font - size: 1rem;").unwrap();

        let options = PatchOptions {
            strict: true,
            ..PatchOptions::default()
        };
        let errors = run_preflight_checks(&file_path, &spacing_rules(), &options).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Rule #2"));
        assert!(errors[0].contains("No match"));
    }

    #[test]
    fn test_preflight_file_not_found() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("nonexistent.js");

        let errors =
            run_preflight_checks(&file_path, &spacing_rules(), &PatchOptions::default())
                .unwrap_err();
        assert!(errors[0].contains("File not found"));
    }

    #[test]
    fn test_preflight_directory_is_rejected() {
        let dir = tempdir().unwrap();
        let errors =
            run_preflight_checks(dir.path(), &spacing_rules(), &PatchOptions::default())
                .unwrap_err();
        assert!(errors[0].contains("Not a regular file"));
    }

    #[test]
    fn test_preflight_invalid_utf8() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("binary.js");
        fs::write(&file_path, [0xff, 0xfe, 0x00]).unwrap();

        let errors =
            run_preflight_checks(&file_path, &spacing_rules(), &PatchOptions::default())
                .unwrap_err();
        assert!(errors[0].contains("Could not read file: Failed to read file"));
        assert!(errors[0].contains("binary.js"));
    }
}
