#![allow(clippy::module_name_repetitions)]

// Builtin presets resolvable by name from `extends`. Presets use the same
// descriptor schema as config files and may themselves extend other presets.

#[must_use]
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "recommended" => Some(RECOMMENDED),
        "strict" => Some(STRICT),
        "empty" => Some(EMPTY),
        _ => None,
    }
}

const RECOMMENDED: &str = r"
rules:
  no-undef: error
  no-unused-vars: warn
  no-dupe-keys: error
  no-unreachable: error
  no-redeclare: error
  use-isnan: error
  no-empty: warn
";

const STRICT: &str = r"
extends:
  - recommended
rules:
  no-unused-vars: error
  no-empty: error
  eqeqeq: error
  no-console: warn
";

const EMPTY: &str = r"
rules: {}
";
