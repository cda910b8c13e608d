use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Fail the run when a rule matches nothing.
    pub strict: bool,
    /// Write through a temporary file and rename it over the target. Symlinks
    /// are followed and the mode is copied. A target owned by another user or
    /// group is rewritten in place, since the rename would change its owner.
    pub atomic_write: bool,
    /// Preset used when neither `--rules` nor `--preset` is given.
    pub default_preset: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: false,
            atomic_write: true,
            default_preset: None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "retext",
    version,
    about = "Apply an ordered set of find/replace rules to one text file"
)]
pub struct Args {
    #[arg(help = "File to patch in place", required_unless_present = "list_presets")]
    pub file: Option<PathBuf>,

    #[arg(
        short,
        long,
        conflicts_with = "preset",
        help = "Rule file: fenced format, or TOML when it ends in .toml ('-' reads stdin)"
    )]
    pub rules: Option<PathBuf>,

    #[arg(short, long, help = "Use a built-in rule set (see --list-presets)")]
    pub preset: Option<String>,

    #[arg(long, help = "Print the built-in rule sets and exit")]
    pub list_presets: bool,

    #[arg(short = 'n', long, help = "Report what would change without writing")]
    pub dry_run: bool,

    #[arg(long, help = "Fail when any rule matches nothing")]
    pub strict: bool,

    #[arg(
        short,
        long,
        help = "Path to config file [default: ~/.config/retext/config.toml]"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Use built-in defaults, ignore config file")]
    pub ignore_config: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    pub verbose: u8,
}

/// Loads the config file if there is one. A missing file is not an error and
/// is never created.
pub fn load_config(args: &Args) -> Result<Config> {
    if args.ignore_config {
        return Ok(Config::default());
    }

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => match get_default_config_path() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    if !config_path.exists() {
        if args.config.is_some() {
            anyhow::bail!("Config file not found at {:?}", config_path);
        }
        log::debug!("No config at {:?}, using defaults", config_path);
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {:?}", config_path))?;

    parse_config(&content).with_context(|| format!("Failed to parse config file at {:?}", config_path))
}

pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

fn get_default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "retext").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_config_defaults_missing_keys() {
        let config = parse_config("strict = true\n").unwrap();
        assert!(config.strict);
        assert!(config.atomic_write);
        assert_eq!(config.default_preset, None);

        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_config_rejects_bad_types() {
        assert!(parse_config("atomic_write = \"yes\"\n").is_err());
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_preset = \"styled-spacing\"\natomic_write = false\n").unwrap();

        let args = Args::parse_from(["retext", "Register.js", "--config", path.to_str().unwrap()]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.default_preset.as_deref(), Some("styled-spacing"));
        assert!(!config.atomic_write);
    }

    #[test]
    fn test_load_config_explicit_missing_path_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let args = Args::parse_from(["retext", "Register.js", "-c", path.to_str().unwrap()]);
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_ignore_config() {
        let args = Args::parse_from(["retext", "Register.js", "--ignore-config", "-c", "/nonexistent"]);
        assert_eq!(load_config(&args).unwrap(), Config::default());
    }

    #[test]
    fn test_args_list_presets_needs_no_file() {
        let args = Args::try_parse_from(["retext", "--list-presets"]).unwrap();
        assert!(args.list_presets);
        assert!(args.file.is_none());
        assert!(Args::try_parse_from(["retext"]).is_err());
        assert!(Args::try_parse_from(["retext", "f.js", "-r", "r.txt", "-p", "styled-spacing"]).is_err());
    }
}
