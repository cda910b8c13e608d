mod config;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{load_config, Args, Config};
use log::info;
use retext_core::{commit, parse, parse_toml, preset, run_preflight_checks, PatchOptions, RuleSet, PRESETS};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list_presets {
        for p in PRESETS {
            println!("{:<20} {}", p.name, p.description);
        }
        return;
    }

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {:#}", e);
            process::exit(1);
        }
    };

    match run(&args, &config) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(args: &Args, config: &Config) -> Result<i32> {
    let Some(path) = args.file.as_deref() else {
        bail!("No file to patch was given.");
    };

    let rules = load_rules(args, config)?;
    if rules.is_empty() {
        println!("No rules found. {:?} left untouched.", path);
        return Ok(0);
    }

    let options = PatchOptions {
        dry_run: args.dry_run,
        strict: args.strict || config.strict,
        atomic_write: config.atomic_write,
    };
    info!("Patching {:?} with {} rule(s), {:?}", path, rules.len(), options);

    println!("--- Running Preflight Checks ---");
    let preflight = match run_preflight_checks(path, &rules, &options) {
        Ok(preflight) => {
            for line in &preflight.report {
                println!("{}", line);
            }
            println!("\n--- Preflight Checks Passed. Proceeding with patching. ---");
            preflight
        }
        Err(errors) => {
            println!("\n--- Preflight Checks Failed ---");
            for err in errors {
                println!("{}", err);
            }
            println!("\nAborting. No files were modified.");
            return Ok(1);
        }
    };

    let summary = commit(path, &preflight, &options)?;

    let outcome = if options.dry_run {
        "[DRY RUN] Would patch"
    } else if summary.written {
        "Patched"
    } else {
        "Unchanged"
    };
    println!(
        "{} {:?}: {} replacement(s) from {} rule(s), {} unmatched",
        outcome, path, summary.replacements, summary.applied, summary.unmatched
    );

    Ok(0)
}

fn load_rules(args: &Args, config: &Config) -> Result<RuleSet> {
    if let Some(rules_path) = &args.rules {
        if rules_path.as_os_str() == "-" {
            return parse(&read_stdin()?).context("Failed to parse rules from stdin");
        }
        return load_rule_file(rules_path);
    }

    let preset_name = args.preset.as_deref().or(config.default_preset.as_deref());
    if let Some(name) = preset_name {
        let Some(found) = preset(name) else {
            bail!("Unknown preset '{}'. Use --list-presets to see the available ones.", name);
        };
        info!("Using preset '{}'", found.name);
        return Ok(found.rules()?);
    }

    if atty::is(atty::Stream::Stdin) {
        bail!("No rules specified (--rules or --preset) and no data piped from stdin.");
    }
    parse(&read_stdin()?).context("Failed to parse rules from stdin")
}

fn load_rule_file(path: &Path) -> Result<RuleSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Rule file not found or unreadable at {:?}", path))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let rules = if is_toml {
        parse_toml(&content)
    } else {
        parse(&content)
    };
    rules.with_context(|| format!("Failed to parse rule file {:?}", path))
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read rules from stdin")?;
    Ok(buffer)
}
