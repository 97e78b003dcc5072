use std::fs;

use lintrc::config::{LintConfig, Overrides, discover_config};
use lintrc::descriptor::Severity;
use lintrc::error::ConfigError;
use tempfile::tempdir;

#[test]
fn extends_recommended_adds_rules() {
    let cfg = LintConfig::from_config_str("extends: recommended\n").expect("config parse");
    assert!(!cfg.rule_names().is_empty());
    assert_eq!(cfg.rule_severity("no-undef"), Some(Severity::Error));
    assert_eq!(cfg.rule_severity("no-unused-vars"), Some(Severity::Warn));
}

#[test]
fn strict_preset_extends_recommended() {
    let cfg = LintConfig::from_config_str("extends: strict\n").expect("config parse");
    // Inherited from recommended through the nested extends.
    assert_eq!(cfg.rule_severity("no-undef"), Some(Severity::Error));
    // Tightened by strict itself.
    assert_eq!(cfg.rule_severity("no-unused-vars"), Some(Severity::Error));
    assert_eq!(cfg.rule_severity("eqeqeq"), Some(Severity::Error));
}

#[test]
fn extends_empty_keeps_custom_rules() {
    let cfg = LintConfig::from_config_str(
        "extends: empty\nrules:\n  custom-rule: \"warn\"\n",
    )
    .expect("config parse");
    assert!(cfg.rule_names().iter().any(|s| s == "custom-rule"));
}

#[test]
fn unknown_preset_is_unresolvable_without_filesystem() {
    let err = LintConfig::from_config_str("extends: preset-missing\n").unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnresolvablePreset {
            name: "preset-missing".to_string()
        }
    );
}

#[test]
fn missing_preset_file_fails_resolution() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join(".lintrc");
    fs::write(&cfg_path, "extends: shared/preset.yaml\n").unwrap();

    let err = discover_config(
        &[],
        &Overrides {
            config_file: Some(cfg_path),
            config_data: None,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnresolvablePreset { name } if name == "shared/preset.yaml"
    ));
}

#[test]
fn extends_resolves_files_relative_to_the_extending_config() {
    let td = tempdir().unwrap();
    let shared = td.path().join("shared");
    fs::create_dir_all(&shared).unwrap();
    fs::write(
        shared.join("base.yaml"),
        "rules:\n  no-console: \"warn\"\n",
    )
    .unwrap();
    let cfg_path = td.path().join(".lintrc");
    fs::write(&cfg_path, "extends: shared/base.yaml\n").unwrap();

    let ctx = discover_config(
        &[],
        &Overrides {
            config_file: Some(cfg_path),
            config_data: None,
        },
    )
    .expect("config parse");
    assert_eq!(
        ctx.config.rule_severity("no-console"),
        Some(Severity::Warn)
    );
}

#[test]
fn circular_file_extends_is_rejected() {
    let td = tempdir().unwrap();
    fs::write(td.path().join("a.yaml"), "extends: b.yaml\n").unwrap();
    fs::write(
        td.path().join("b.yaml"),
        "extends: a.yaml\nrules:\n  no-empty: \"warn\"\n",
    )
    .unwrap();
    let cfg_path = td.path().join(".lintrc");
    fs::write(&cfg_path, "extends: a.yaml\n").unwrap();

    let err = discover_config(
        &[],
        &Overrides {
            config_file: Some(cfg_path),
            config_data: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::CircularExtends { .. }));
}
