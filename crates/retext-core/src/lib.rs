pub mod matcher;
pub mod operations;
pub mod parser;
pub mod presets;
pub mod types;

pub use operations::{apply, commit, patch_file, run_preflight_checks, Preflight};
pub use parser::{parse, parse_toml, ParseError};
pub use presets::{preset, Preset, PRESETS};
pub use types::{
    Occurrence, PatchOptions, PatchSummary, Patched, Rule, RuleError, RuleOp, RuleOutcome,
    RuleSet,
};
