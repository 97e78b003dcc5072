//! End-to-end resolution of a typical front-end project descriptor.

use lintrc::config::LintConfig;
use lintrc::descriptor::{EcmaVersion, Severity, SourceType};

#[test]
fn front_end_descriptor_resolves_as_documented() {
    let data = r#"
root: true
env:
  node: true
extends:
  - recommended
parserOptions:
  ecmaVersion: 2020
  sourceType: module
rules:
  no-undef: "off"
"#;
    let cfg = LintConfig::from_config_str(data).expect("config parse");

    // The override beats the preset; untouched preset rules survive.
    assert_eq!(cfg.rule_severity("no-undef"), Some(Severity::Off));
    assert!(!cfg.is_rule_enabled("no-undef"));
    assert_eq!(cfg.rule_severity("no-unused-vars"), Some(Severity::Warn));

    assert_eq!(
        cfg.parser_options().ecma_version,
        Some(EcmaVersion::Year(2020))
    );
    assert_eq!(cfg.parser_options().source_type, Some(SourceType::Module));

    // Node globals joined the known-identifier set.
    assert_eq!(cfg.environments(), &["node".to_string()]);
    assert!(cfg.knows_identifier("process"));
    assert!(cfg.knows_identifier("__dirname"));
    // Language builtins are always known.
    assert!(cfg.knows_identifier("JSON"));
    assert!(!cfg.knows_identifier("window"));
}
