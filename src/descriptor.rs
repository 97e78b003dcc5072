use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use saphyr::{LoadableYamlNode, YamlOwned};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Severity assigned to a rule: `off`/`0`, `warn`/`1`, or `error`/`2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "off" => Some(Self::Off),
                "warn" => Some(Self::Warn),
                "error" => Some(Self::Error),
                _ => None,
            },
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(Self::Off),
                Some(1) => Some(Self::Warn),
                Some(2) => Some(Self::Error),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A rule's resolved setting: severity plus any detail arguments from the
/// `[severity, ...args]` form.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl RuleSetting {
    #[must_use]
    pub const fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    /// Parse a rule value in any of the recognized forms.
    ///
    /// # Errors
    /// Returns `MalformedRuleSetting` when the value is not a recognized
    /// severity scalar or a non-empty array starting with one.
    pub fn parse(rule: &str, value: &Value) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedRuleSetting {
            rule: rule.to_owned(),
            value: value.to_string(),
        };
        match value {
            Value::String(_) | Value::Number(_) => Ok(Self::new(
                Severity::from_value(value).ok_or_else(malformed)?,
            )),
            Value::Array(items) => {
                let first = items.first().ok_or_else(malformed)?;
                let severity = Severity::from_value(first).ok_or_else(malformed)?;
                Ok(Self {
                    severity,
                    options: items[1..].to_vec(),
                })
            }
            _ => Err(malformed()),
        }
    }

    /// Canonical file-format value: a bare severity string, or an array when
    /// detail arguments are present.
    #[must_use]
    pub fn to_value(&self) -> Value {
        if self.options.is_empty() {
            Value::String(self.severity.as_str().to_owned())
        } else {
            let mut items = Vec::with_capacity(self.options.len() + 1);
            items.push(Value::String(self.severity.as_str().to_owned()));
            items.extend(self.options.iter().cloned());
            Value::Array(items)
        }
    }
}

/// Language version the parser should assume, as written in the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcmaVersion {
    Latest,
    Year(u16),
}

impl EcmaVersion {
    fn parse(value: &Value) -> Result<Self, ConfigError> {
        if let Some(s) = value.as_str() {
            if s == "latest" {
                return Ok(Self::Latest);
            }
        } else if let Some(n) = value.as_i64() {
            // Editions 3 and 5-17 or year forms 2015+ are accepted as-is.
            if matches!(n, 3 | 5..=17 | 2015..=2027) {
                return Ok(Self::Year(u16::try_from(n).expect("range checked")));
            }
            return Err(ConfigError::Invalid(format!(
                "parserOptions.ecmaVersion {n} is not a supported language version"
            )));
        }
        Err(ConfigError::Invalid(
            "parserOptions.ecmaVersion should be an integer or \"latest\"".to_string(),
        ))
    }

    fn to_value(self) -> Value {
        match self {
            Self::Latest => Value::String("latest".to_owned()),
            Self::Year(n) => Value::Number(n.into()),
        }
    }
}

/// Module semantics the parser should assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Module,
    Script,
}

impl SourceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Script => "script",
        }
    }
}

impl Serialize for SourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Parser configuration; fields left out of the descriptor stay `None` and
/// inherit whatever an outer descriptor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserOptions {
    pub ecma_version: Option<EcmaVersion>,
    pub source_type: Option<SourceType>,
}

impl ParserOptions {
    fn parse(node: &Value) -> Result<Self, ConfigError> {
        let Some(map) = node.as_object() else {
            return Err(ConfigError::Invalid(
                "parserOptions should be a mapping".to_string(),
            ));
        };
        let mut out = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "ecmaVersion" => out.ecma_version = Some(EcmaVersion::parse(value)?),
                "sourceType" => {
                    out.source_type = Some(match value.as_str() {
                        Some("module") => SourceType::Module,
                        Some("script") => SourceType::Script,
                        _ => {
                            return Err(ConfigError::Invalid(
                                "parserOptions.sourceType should be \"module\" or \"script\""
                                    .to_string(),
                            ));
                        }
                    });
                }
                _ => {}
            }
        }
        Ok(out)
    }

    /// Overlay `other` on `self`: fields `other` sets replace ours.
    pub fn apply(&mut self, other: Self) {
        if other.ecma_version.is_some() {
            self.ecma_version = other.ecma_version;
        }
        if other.source_type.is_some() {
            self.source_type = other.source_type;
        }
    }

    fn is_empty(self) -> bool {
        self.ecma_version.is_none() && self.source_type.is_none()
    }

    fn to_value(self) -> Value {
        let mut map = Map::new();
        if let Some(v) = self.ecma_version {
            map.insert("ecmaVersion".to_owned(), v.to_value());
        }
        if let Some(s) = self.source_type {
            map.insert("sourceType".to_owned(), Value::String(s.as_str().to_owned()));
        }
        Value::Object(map)
    }
}

/// Access declared for an explicit global identifier. Booleans in the file
/// map to `true` => writable, `false` => readonly; `"off"` removes the
/// identifier from the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalValue {
    Readonly,
    Writable,
    Off,
}

impl GlobalValue {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Readonly => "readonly",
            Self::Writable => "writable",
            Self::Off => "off",
        }
    }

    fn parse(ident: &str, value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Bool(true) => Ok(Self::Writable),
            Value::Bool(false) => Ok(Self::Readonly),
            Value::String(s) => match s.as_str() {
                "readonly" => Ok(Self::Readonly),
                "writable" => Ok(Self::Writable),
                "off" => Ok(Self::Off),
                _ => Err(ConfigError::Invalid(format!(
                    "global '{ident}' should be \"readonly\", \"writable\", \"off\", or a boolean"
                ))),
            },
            _ => Err(ConfigError::Invalid(format!(
                "global '{ident}' should be \"readonly\", \"writable\", \"off\", or a boolean"
            ))),
        }
    }
}

/// One parsed configuration file, immutable once loaded. Descriptors say
/// nothing about other descriptors; cascading and preset resolution happen
/// in [`crate::config`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Descriptor {
    pub root: bool,
    pub env: Vec<String>,
    pub extends: Vec<String>,
    pub parser_options: ParserOptions,
    pub rules: BTreeMap<String, RuleSetting>,
    pub globals: BTreeMap<String, GlobalValue>,
    pub ignore_patterns: Vec<String>,
}

impl Descriptor {
    /// Parse descriptor text, sniffing JSON (leading `{`) vs YAML.
    ///
    /// # Errors
    /// Returns an error when the text cannot be parsed or a field has the
    /// wrong shape.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        if s.trim_start().starts_with('{') {
            Self::from_json_str(s)
        } else {
            Self::from_yaml_str(s)
        }
    }

    /// Parse the contents of a config file, choosing the format from the
    /// file extension (`.json` forces JSON, anything else sniffs).
    ///
    /// # Errors
    /// Returns an error when the text cannot be parsed or a field has the
    /// wrong shape.
    pub fn parse_file_data(path: &Path, data: &str) -> Result<Self, ConfigError> {
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(data)
        } else {
            Self::parse(data)
        }
    }

    /// Parse a YAML descriptor.
    ///
    /// # Errors
    /// Returns an error when the text is not valid YAML or a field has the
    /// wrong shape.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let docs = YamlOwned::load_from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let Some(doc) = docs.first() else {
            return Err(ConfigError::Invalid("not a mapping".to_string()));
        };
        Self::from_json_value(&yaml_to_json(doc)?)
    }

    /// Parse a JSON descriptor.
    ///
    /// # Errors
    /// Returns an error when the text is not valid JSON or a field has the
    /// wrong shape.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_json_value(&value)
    }

    /// Build a descriptor from an already-parsed file-format value.
    ///
    /// # Errors
    /// Returns an error when the value is not a mapping or a field has the
    /// wrong shape.
    pub fn from_json_value(value: &Value) -> Result<Self, ConfigError> {
        let Some(map) = value.as_object() else {
            return Err(ConfigError::Invalid("not a mapping".to_string()));
        };
        let mut desc = Self::default();

        if let Some(root) = map.get("root") {
            desc.root = root
                .as_bool()
                .ok_or_else(|| ConfigError::Invalid("root should be a boolean".to_string()))?;
        }

        if let Some(env) = map.get("env") {
            desc.env = load_env_names(env)?;
        }

        if let Some(extends) = map.get("extends") {
            desc.extends = load_extends(extends)?;
        }

        if let Some(options) = map.get("parserOptions") {
            desc.parser_options = ParserOptions::parse(options)?;
        }

        if let Some(rules) = map.get("rules") {
            let Some(rules) = rules.as_object() else {
                return Err(ConfigError::Invalid("rules should be a mapping".to_string()));
            };
            for (name, value) in rules {
                desc.rules
                    .insert(name.clone(), RuleSetting::parse(name, value)?);
            }
        }

        if let Some(globals) = map.get("globals") {
            let Some(globals) = globals.as_object() else {
                return Err(ConfigError::Invalid(
                    "globals should be a mapping".to_string(),
                ));
            };
            for (ident, value) in globals {
                desc.globals
                    .insert(ident.clone(), GlobalValue::parse(ident, value)?);
            }
        }

        if let Some(node) = map.get("ignorePatterns") {
            desc.ignore_patterns = load_ignore_patterns(node)?;
        }

        Ok(desc)
    }

    /// Canonical file-format rendering. Composing with
    /// [`Self::from_json_value`] yields an equal descriptor.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        let mut map = Map::new();
        if self.root {
            map.insert("root".to_owned(), Value::Bool(true));
        }
        if !self.env.is_empty() {
            let mut env = Map::new();
            for name in &self.env {
                env.insert(name.clone(), Value::Bool(true));
            }
            map.insert("env".to_owned(), Value::Object(env));
        }
        if !self.extends.is_empty() {
            map.insert(
                "extends".to_owned(),
                Value::Array(
                    self.extends
                        .iter()
                        .map(|e| Value::String(e.clone()))
                        .collect(),
                ),
            );
        }
        if !self.parser_options.is_empty() {
            map.insert("parserOptions".to_owned(), self.parser_options.to_value());
        }
        if !self.rules.is_empty() {
            let mut rules = Map::new();
            for (name, setting) in &self.rules {
                rules.insert(name.clone(), setting.to_value());
            }
            map.insert("rules".to_owned(), Value::Object(rules));
        }
        if !self.globals.is_empty() {
            let mut globals = Map::new();
            for (ident, value) in &self.globals {
                globals.insert(ident.clone(), Value::String(value.as_str().to_owned()));
            }
            map.insert("globals".to_owned(), Value::Object(globals));
        }
        if !self.ignore_patterns.is_empty() {
            map.insert(
                "ignorePatterns".to_owned(),
                Value::Array(
                    self.ignore_patterns
                        .iter()
                        .map(|p| Value::String(p.clone()))
                        .collect(),
                ),
            );
        }
        Value::Object(map)
    }
}

fn load_env_names(node: &Value) -> Result<Vec<String>, ConfigError> {
    let mut names: Vec<String> = Vec::new();
    match node {
        Value::Object(map) => {
            for (name, enabled) in map {
                let Some(enabled) = enabled.as_bool() else {
                    return Err(ConfigError::Invalid(
                        "env entries should map names to booleans".to_string(),
                    ));
                };
                if enabled {
                    names.push(name.clone());
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                let Some(name) = item.as_str() else {
                    return Err(ConfigError::Invalid(
                        "env should be a mapping or a list of names".to_string(),
                    ));
                };
                names.push(name.to_owned());
            }
        }
        Value::String(name) => names.push(name.clone()),
        _ => {
            return Err(ConfigError::Invalid(
                "env should be a mapping or a list of names".to_string(),
            ));
        }
    }
    names.sort_unstable();
    names.dedup();
    Ok(names)
}

fn load_extends(node: &Value) -> Result<Vec<String>, ConfigError> {
    match node {
        Value::String(entry) => Ok(vec![entry.clone()]),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let Some(entry) = item.as_str() else {
                    return Err(ConfigError::Invalid(
                        "extends should be a preset name or a list of preset names".to_string(),
                    ));
                };
                out.push(entry.to_owned());
            }
            Ok(out)
        }
        _ => Err(ConfigError::Invalid(
            "extends should be a preset name or a list of preset names".to_string(),
        )),
    }
}

fn load_ignore_patterns(node: &Value) -> Result<Vec<String>, ConfigError> {
    match node {
        Value::String(s) => Ok(patterns_from_scalar(s)),
        Value::Array(items) => {
            let mut out = Vec::new();
            for item in items {
                let Some(s) = item.as_str() else {
                    return Err(ConfigError::Invalid(
                        "ignorePatterns should contain file patterns".to_string(),
                    ));
                };
                out.extend(patterns_from_scalar(s));
            }
            Ok(out)
        }
        _ => Err(ConfigError::Invalid(
            "ignorePatterns should contain file patterns".to_string(),
        )),
    }
}

fn patterns_from_scalar(value: &str) -> Vec<String> {
    value
        .lines()
        .map(|line| line.trim_end_matches(['\r']))
        .filter(|line| !line.trim().is_empty())
        .map(std::string::ToString::to_string)
        .collect()
}

fn yaml_to_json(node: &YamlOwned) -> Result<Value, ConfigError> {
    if node.is_null() {
        return Ok(Value::Null);
    }
    if let Some(b) = node.as_bool() {
        return Ok(Value::Bool(b));
    }
    if let Some(n) = node.as_integer() {
        return Ok(Value::Number(n.into()));
    }
    if let Some(f) = node.as_floating_point() {
        return serde_json::Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| ConfigError::Invalid("non-finite number".to_string()));
    }
    if let Some(s) = node.as_str() {
        return Ok(Value::String(s.to_owned()));
    }
    if let Some(seq) = node.as_sequence() {
        let mut items = Vec::with_capacity(seq.len());
        for it in seq {
            items.push(yaml_to_json(it)?);
        }
        return Ok(Value::Array(items));
    }
    if let Some(map) = node.as_mapping() {
        let mut out = Map::new();
        for (k, v) in map {
            let Some(key) = k.as_str() else {
                return Err(ConfigError::Invalid(
                    "mapping keys should be strings".to_string(),
                ));
            };
            out.insert(key.to_owned(), yaml_to_json(v)?);
        }
        return Ok(Value::Object(out));
    }
    Err(ConfigError::Invalid("unsupported value".to_string()))
}
