use std::fs;

use lintrc::config::{LintConfig, Overrides, discover_config};
use lintrc::descriptor::{EcmaVersion, SourceType};
use lintrc::error::ConfigError;
use tempfile::tempdir;

#[test]
fn year_and_latest_forms_are_accepted() {
    let cfg = LintConfig::from_config_str("parserOptions:\n  ecmaVersion: 2020\n")
        .expect("config parse");
    assert_eq!(
        cfg.parser_options().ecma_version,
        Some(EcmaVersion::Year(2020))
    );

    let cfg = LintConfig::from_config_str("parserOptions:\n  ecmaVersion: latest\n")
        .expect("config parse");
    assert_eq!(cfg.parser_options().ecma_version, Some(EcmaVersion::Latest));
}

#[test]
fn edition_numbers_are_kept_as_written() {
    let cfg = LintConfig::from_config_str("parserOptions:\n  ecmaVersion: 6\n")
        .expect("config parse");
    assert_eq!(cfg.parser_options().ecma_version, Some(EcmaVersion::Year(6)));
}

#[test]
fn unsupported_language_version_is_rejected() {
    let err = LintConfig::from_config_str("parserOptions:\n  ecmaVersion: 1999\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn source_type_must_be_module_or_script() {
    let cfg = LintConfig::from_config_str("parserOptions:\n  sourceType: script\n")
        .expect("config parse");
    assert_eq!(cfg.parser_options().source_type, Some(SourceType::Script));

    let err =
        LintConfig::from_config_str("parserOptions:\n  sourceType: commonjs\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn nearer_descriptor_overrides_parser_options_per_field() {
    let td = tempdir().unwrap();
    let proj = td.path().join("proj");
    let nested = proj.join("app");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        proj.join(".lintrc"),
        "parserOptions:\n  ecmaVersion: 2015\n  sourceType: script\n",
    )
    .unwrap();
    fs::write(
        nested.join(".lintrc"),
        "parserOptions:\n  sourceType: module\n",
    )
    .unwrap();

    let inputs = vec![nested];
    let ctx = discover_config(&inputs, &Overrides::default()).unwrap();
    assert_eq!(
        ctx.config.parser_options().ecma_version,
        Some(EcmaVersion::Year(2015))
    );
    assert_eq!(
        ctx.config.parser_options().source_type,
        Some(SourceType::Module)
    );
}
