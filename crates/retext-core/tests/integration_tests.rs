use retext_core::{
    apply, parse, parse_toml, patch_file, preset, run_preflight_checks, PatchOptions, Rule,
    RuleSet,
};
use std::fs;
use tempfile::tempdir;

const REGISTER_JS: &str = "import styled from 'styled-components';

const RegisterCard = styled.div`
  padding: 2rem 2.5rem;
  border - radius: 24px;
`;

const Form = styled.form`
  display: flex;
  flex - direction: column;
  gap: 0.85rem;
`;

const Title = styled.h2`
  text - align: center; /* \u{2014} \u{201c}quoted\u{201d} */
`;
";

#[test]
fn test_patch_file_with_fenced_rules() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("src/pages/Register.js");
    fs::create_dir_all(file_path.parent().unwrap()).unwrap();
    fs::write(&file_path, REGISTER_JS).unwrap();

    let rules = parse(
        r#"Spacing fixes first, the Form block depends on them.

border-radius
<<<<<<< SEARCH
border - radius
=======
border-radius
>>>>>>> REPLACE

flex-direction
<<<<<<< SEARCH
flex - direction
=======
flex-direction
>>>>>>> REPLACE

<<<<<<< BLOCK
const Form = styled.form`
  display: flex;
  flex-direction: column;
-------
`;
=======
const Form = styled.form`
  display: flex;
  flex-direction: column;
  overflow-y: auto;
`;
>>>>>>> REPLACE
"#,
    )
    .unwrap();
    assert_eq!(rules.len(), 3);

    let summary = patch_file(&file_path, &rules, &PatchOptions::default()).unwrap();
    assert_eq!(summary.rules, 3);
    assert_eq!(summary.applied, 3);
    assert_eq!(summary.unmatched, 0);
    assert!(summary.written);

    let content = fs::read_to_string(&file_path).unwrap();
    assert!(content.contains("border-radius: 24px;"));
    assert!(content.contains("  flex-direction: column;\n  overflow-y: auto;\n`;"));
    assert!(!content.contains("gap: 0.85rem"));
    assert!(content.contains("text - align: center; /* \u{2014} \u{201c}quoted\u{201d} */"));
}

#[test]
fn test_patch_file_with_toml_rules_and_preset_is_idempotent() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("Register.js");
    fs::write(&file_path, REGISTER_JS).unwrap();

    let rules = preset("styled-spacing").unwrap().rules().unwrap();
    let first = patch_file(&file_path, &rules, &PatchOptions::default()).unwrap();
    assert!(first.written);
    let after_first = fs::read_to_string(&file_path).unwrap();
    assert!(after_first.contains("text-align: center; /* \u{2014} \u{201c}quoted\u{201d} */"));
    assert!(after_first.contains("padding: 1.5rem 2.5rem; /* Reduced to save vertical space */"));
    assert!(after_first.contains("&::-webkit-scrollbar-thumb:hover"));

    let second = patch_file(&file_path, &rules, &PatchOptions::default()).unwrap();
    assert!(!second.changed);
    assert!(!second.written);
    assert_eq!(second.replacements, 0);
    assert_eq!(fs::read_to_string(&file_path).unwrap(), after_first);

    let extra = parse_toml("[[rule]]\nname = \"title\"\nfind = \"styled.h2\"\nreplace = \"styled.h1\"\n").unwrap();
    let third = patch_file(&file_path, &extra, &PatchOptions::default()).unwrap();
    assert_eq!(third.replacements, 1);
    assert!(fs::read_to_string(&file_path).unwrap().contains("styled.h1`"));
}

#[test]
fn test_dry_run_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("Register.js");
    fs::write(&file_path, REGISTER_JS).unwrap();

    let rules = RuleSet::new().with(Rule::literal("border - radius", "border-radius").unwrap());
    let options = PatchOptions {
        dry_run: true,
        ..PatchOptions::default()
    };
    let summary = patch_file(&file_path, &rules, &options).unwrap();
    assert!(summary.changed);
    assert!(!summary.written);
    assert_eq!(fs::read_to_string(&file_path).unwrap(), REGISTER_JS);
}

#[test]
fn test_missing_file_fails_before_write() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("nope.js");
    let rules = RuleSet::new().with(Rule::literal("a", "b").unwrap());

    let err = patch_file(&file_path, &rules, &PatchOptions::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("File not found"));
    assert!(!file_path.exists());
}

#[test]
fn test_strict_mode_fails_on_unmatched_rule() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("Register.js");
    fs::write(&file_path, REGISTER_JS).unwrap();

    let rules = RuleSet::new()
        .with(Rule::literal("border - radius", "border-radius").unwrap())
        .with(Rule::literal("does not occur", "x").unwrap().named("ghost"));

    let lenient = run_preflight_checks(&file_path, &rules, &PatchOptions::default()).unwrap();
    assert_eq!(lenient.patched.unmatched_count(), 1);

    let strict = PatchOptions {
        strict: true,
        ..PatchOptions::default()
    };
    let err = patch_file(&file_path, &rules, &strict).unwrap_err();
    assert!(format!("{:#}", err).contains("ghost"));
    assert_eq!(fs::read_to_string(&file_path).unwrap(), REGISTER_JS);
}

#[test]
fn test_crlf_and_bom_round_trip() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("Windows.js");
    let original = "\u{feff}line one\r\nfont - size: 1px;\r\nlast \u{2122}\r\n";
    fs::write(&file_path, original).unwrap();

    let rules = RuleSet::new().with(Rule::literal("font - size", "font-size").unwrap());
    patch_file(&file_path, &rules, &PatchOptions::default()).unwrap();

    let bytes = fs::read(&file_path).unwrap();
    assert_eq!(
        bytes,
        "\u{feff}line one\r\nfont-size: 1px;\r\nlast \u{2122}\r\n".as_bytes()
    );
    assert_eq!(apply(original, &RuleSet::new()).text.as_bytes(), original.as_bytes());
}

#[test]
fn test_in_place_write_when_not_atomic() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("Register.js");
    fs::write(&file_path, REGISTER_JS).unwrap();

    let rules = RuleSet::new().with(Rule::literal("styled.h2", "styled.h3").unwrap());
    let options = PatchOptions {
        atomic_write: false,
        ..PatchOptions::default()
    };
    patch_file(&file_path, &rules, &options).unwrap();
    assert!(fs::read_to_string(&file_path).unwrap().contains("styled.h3`"));
}

#[cfg(unix)]
#[test]
fn test_patch_file_writes_through_symlink() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real.js");
    let link = dir.path().join("Register.js");
    fs::write(&real, "font - size: 1px;").unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let rules = RuleSet::new().with(Rule::literal("font - size", "font-size").unwrap());
    let summary = patch_file(&link, &rules, &PatchOptions::default()).unwrap();
    assert!(summary.written);

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(&real).unwrap(), "font-size: 1px;");
    assert_eq!(fs::read_to_string(&link).unwrap(), "font-size: 1px;");
}
