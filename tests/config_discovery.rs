use std::fs;
use std::path::PathBuf;

use lintrc::config::{Overrides, discover_config, discover_config_with_env};
use lintrc::descriptor::Severity;
use tempfile::tempdir;

fn write(path: &PathBuf, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn inline_config_takes_precedence_over_file() {
    let td = tempdir().unwrap();
    let proj = td.path().join("proj");
    fs::create_dir_all(&proj).unwrap();
    write(
        &proj.join(".lintrc"),
        "rules:\n  from-project: \"error\"\n",
    );

    let inputs = vec![proj.clone()];
    let ctx = discover_config(
        &inputs,
        &Overrides {
            config_file: None,
            config_data: Some("rules:\n  from-inline: \"warn\"\n".into()),
        },
    )
    .unwrap();

    assert!(ctx.config.rule_setting("from-inline").is_some());
    assert!(ctx.config.rule_setting("from-project").is_none());
    assert!(ctx.source.is_none());
}

#[test]
fn nearest_descriptor_wins_in_cascade() {
    let td = tempdir().unwrap();
    let proj = td.path().join("proj");
    let nested = proj.join("packages").join("app");
    fs::create_dir_all(&nested).unwrap();
    write(
        &proj.join(".lintrc"),
        "rules:\n  outer-only: \"error\"\n  shared-rule: \"warn\"\n",
    );
    write(
        &nested.join(".lintrc"),
        "rules:\n  shared-rule: \"error\"\n",
    );

    let inputs = vec![nested.clone()];
    let ctx = discover_config(&inputs, &Overrides::default()).unwrap();

    assert_eq!(
        ctx.config.rule_severity("shared-rule"),
        Some(Severity::Error)
    );
    assert_eq!(
        ctx.config.rule_severity("outer-only"),
        Some(Severity::Error)
    );
    assert_eq!(ctx.base_dir, nested);
    assert_eq!(ctx.source, Some(nested.join(".lintrc")));
}

#[test]
fn root_descriptor_blocks_ancestor_lookup() {
    let td = tempdir().unwrap();
    let proj = td.path().join("proj");
    fs::create_dir_all(&proj).unwrap();
    write(
        &td.path().join(".lintrc"),
        "rules:\n  ancestor-rule: \"error\"\n",
    );
    write(
        &proj.join(".lintrc"),
        "root: true\nrules:\n  project-rule: \"warn\"\n",
    );

    let inputs = vec![proj.clone()];
    let ctx = discover_config(&inputs, &Overrides::default()).unwrap();

    assert!(ctx.config.rule_setting("project-rule").is_some());
    assert!(ctx.config.rule_setting("ancestor-rule").is_none());
}

#[test]
fn env_config_used_when_no_project_config_via_injected_env() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("lintrc.yaml");
    write(&cfg, "rules:\n  from-env-file: \"error\"\n");

    let ctx = discover_config_with_env(&[], &Overrides::default(), &|k| {
        if k == "LINTRC_CONFIG_FILE" {
            Some(cfg.display().to_string())
        } else {
            None
        }
    })
    .unwrap();
    assert!(ctx.config.rule_setting("from-env-file").is_some());
    assert_eq!(ctx.source, Some(cfg));
}
