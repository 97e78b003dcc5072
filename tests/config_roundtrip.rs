use lintrc::descriptor::Descriptor;

#[test]
fn descriptor_survives_serialize_then_reload() {
    let desc = Descriptor::parse(
        r#"
root: true
env:
  node: true
  es2020: true
extends:
  - recommended
  - shared/base.yaml
parserOptions:
  ecmaVersion: 2020
  sourceType: module
rules:
  no-undef: "off"
  max-len: ["error", 100]
globals:
  myFramework: "readonly"
ignorePatterns:
  - dist/**
  - "*.generated.js"
"#,
    )
    .expect("descriptor parse");

    let reloaded = Descriptor::from_json_value(&desc.to_json_value()).expect("reload");
    assert_eq!(reloaded, desc);
}

#[test]
fn empty_descriptor_round_trips() {
    let desc = Descriptor::parse("{}").expect("descriptor parse");
    let reloaded = Descriptor::from_json_value(&desc.to_json_value()).expect("reload");
    assert_eq!(reloaded, desc);
    assert!(!desc.root);
    assert!(desc.rules.is_empty());
}

#[test]
fn boolean_globals_normalize_to_access_strings() {
    let desc = Descriptor::parse("globals:\n  a: true\n  b: false\n").expect("descriptor parse");
    let reloaded = Descriptor::from_json_value(&desc.to_json_value()).expect("reload");
    assert_eq!(reloaded, desc);
    let rendered = desc.to_json_value();
    assert_eq!(rendered["globals"]["a"], "writable");
    assert_eq!(rendered["globals"]["b"], "readonly");
}
