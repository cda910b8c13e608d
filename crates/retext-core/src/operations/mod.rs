pub mod file_operations;
pub mod patch_applicator;
pub mod preflight_checks;

pub use file_operations::{read_document, write_document};
pub use patch_applicator::{apply, apply_rule};
pub use preflight_checks::{run_preflight_checks, Preflight, PreflightFailed};

use crate::types::{PatchOptions, PatchSummary, RuleSet};
use anyhow::Result;
use log::info;
use std::path::Path;

/// Writes the outcome of a successful preflight back to `path`, unless this
/// is a dry run or nothing changed.
pub fn commit(path: &Path, preflight: &Preflight, options: &PatchOptions) -> Result<PatchSummary> {
    let patched = &preflight.patched;
    let changed = preflight.changed();
    let written = changed && !options.dry_run;

    if written {
        write_document(path, &patched.text, options.atomic_write)?;
        info!("Wrote {} byte(s) to {:?}", patched.text.len(), path);
    } else if !changed {
        info!("{:?} already up to date, skipping write", path);
    }

    let unmatched = patched.unmatched_count();
    Ok(PatchSummary {
        rules: patched.outcomes.len(),
        applied: patched.outcomes.len() - unmatched,
        unmatched,
        replacements: patched.replacements(),
        changed,
        written,
    })
}

/// Read, check, apply and write in one call.
pub fn patch_file(path: &Path, rules: &RuleSet, options: &PatchOptions) -> Result<PatchSummary> {
    let preflight = run_preflight_checks(path, rules, options).map_err(PreflightFailed)?;
    commit(path, &preflight, options)
}
