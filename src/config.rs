use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde_json::{Map, Value};

use crate::conf;
use crate::descriptor::{Descriptor, GlobalValue, ParserOptions, RuleSetting, Severity};
use crate::envs;
use crate::error::ConfigError;

/// Abstraction over environment/filesystem to enable full test coverage.
pub trait Env {
    /// Current working directory.
    fn current_dir(&self) -> PathBuf;
    /// Platform configuration directory (e.g., XDG config dir).
    fn config_dir(&self) -> Option<PathBuf>;
    /// Read file contents.
    ///
    /// # Errors
    /// Returns an error string when the file cannot be read.
    fn read_to_string(&self, p: &Path) -> Result<String, String>;
    fn path_exists(&self, p: &Path) -> bool;
    fn env_var(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl Env for SystemEnv {
    fn current_dir(&self) -> PathBuf {
        PathBuf::from(".")
    }
    fn config_dir(&self) -> Option<PathBuf> {
        dirs::config_dir()
    }
    fn read_to_string(&self, p: &Path) -> Result<String, String> {
        match fs::read_to_string(p) {
            Ok(s) => Ok(s),
            Err(e) => Err(e.to_string()),
        }
    }
    fn path_exists(&self, p: &Path) -> bool {
        p.exists()
    }
    fn env_var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// Config file names probed in each directory, in precedence order.
const CONFIG_FILE_NAMES: [&str; 4] = [".lintrc", ".lintrc.yaml", ".lintrc.yml", ".lintrc.json"];

/// Environment variable naming a config file to use when no explicit
/// override or project descriptor applies.
pub const CONFIG_FILE_VAR: &str = "LINTRC_CONFIG_FILE";

/// Preset used when discovery finds nothing at all.
const DEFAULT_PRESET: &str = "recommended";

/// Explicit configuration sources that bypass project discovery.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub config_data: Option<String>,
}

/// Fully resolved configuration: presets merged, overrides applied,
/// environments expanded. Read-only once built.
#[derive(Debug, Clone)]
pub struct LintConfig {
    rule_names: Vec<String>,
    rules: BTreeMap<String, RuleSetting>,
    environments: Vec<String>,
    globals: BTreeMap<String, GlobalValue>,
    parser_options: ParserOptions,
    ignore_patterns: Vec<String>,
    ignore_matcher: Option<Gitignore>,
    known_identifiers: BTreeSet<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            rule_names: Vec::new(),
            rules: BTreeMap::new(),
            environments: Vec::new(),
            globals: BTreeMap::new(),
            parser_options: ParserOptions::default(),
            ignore_patterns: Vec::new(),
            ignore_matcher: None,
            known_identifiers: envs::BUILTIN.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl LintConfig {
    /// Resolve configuration data without filesystem access. `extends` is
    /// limited to builtin preset names in this mode.
    ///
    /// # Errors
    /// Returns an error when the data cannot be parsed or resolution fails.
    pub fn from_config_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_config_str_with_env(s, None, None)
    }

    fn from_config_str_with_env(
        s: &str,
        envx: Option<&dyn Env>,
        base_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let desc = Descriptor::parse(s)?;
        let mut cfg = Self::default();
        let mut resolving = Vec::new();
        cfg.apply_descriptor(&desc, envx, base_dir, &mut resolving)?;
        Ok(cfg)
    }

    /// Resolve a parsed descriptor on top of whatever this config already
    /// holds: presets first (left to right, last wins), then the
    /// descriptor's own rules, environments, globals, parser options, and
    /// ignore patterns.
    fn apply_descriptor(
        &mut self,
        desc: &Descriptor,
        envx: Option<&dyn Env>,
        base_dir: Option<&Path>,
        resolving: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        let base_path = base_dir.unwrap_or_else(|| Path::new(""));

        for entry in &desc.extends {
            self.extend_from_entry(entry, envx, base_path, resolving)?;
        }

        for (name, setting) in &desc.rules {
            self.insert_rule(name, setting.clone());
        }

        for name in &desc.env {
            let Some(idents) = envs::globals(name) else {
                return Err(ConfigError::UnknownEnvironment { name: name.clone() });
            };
            if !self.environments.iter().any(|e| e == name) {
                self.environments.push(name.clone());
            }
            for ident in idents {
                self.known_identifiers.insert(ident.to_string());
            }
        }

        for (ident, value) in &desc.globals {
            match value {
                GlobalValue::Off => {
                    self.known_identifiers.remove(ident);
                }
                GlobalValue::Readonly | GlobalValue::Writable => {
                    self.known_identifiers.insert(ident.clone());
                }
            }
            self.globals.insert(ident.clone(), *value);
        }

        self.parser_options.apply(desc.parser_options);

        self.ignore_patterns
            .extend(desc.ignore_patterns.iter().cloned());

        Ok(())
    }

    fn extend_from_entry(
        &mut self,
        entry: &str,
        envx: Option<&dyn Env>,
        base_dir: &Path,
        resolving: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        if let Some(text) = conf::builtin(entry) {
            if resolving.iter().any(|e| e == entry) {
                return Err(ConfigError::CircularExtends {
                    name: entry.to_owned(),
                });
            }
            let desc = Descriptor::parse(text).expect("builtin preset must parse");
            resolving.push(entry.to_owned());
            let result = self.apply_descriptor(&desc, envx, Some(base_dir), resolving);
            resolving.pop();
            return result;
        }

        let Some(envx) = envx else {
            // Without filesystem access only builtin presets can resolve.
            return Err(ConfigError::UnresolvablePreset {
                name: entry.to_owned(),
            });
        };

        let resolved = resolve_extend_path(entry, envx, Some(base_dir));
        if !envx.path_exists(&resolved) {
            return Err(ConfigError::UnresolvablePreset {
                name: entry.to_owned(),
            });
        }
        let key = resolved.display().to_string();
        if resolving.iter().any(|e| e == &key) {
            return Err(ConfigError::CircularExtends {
                name: entry.to_owned(),
            });
        }
        let data = envx
            .read_to_string(&resolved)
            .map_err(|message| ConfigError::Io {
                path: resolved.clone(),
                message,
            })?;
        let desc = Descriptor::parse_file_data(&resolved, &data)?;
        let parent_dir = resolved
            .parent()
            .map_or_else(|| base_dir.to_path_buf(), Path::to_path_buf);
        resolving.push(key);
        let result = self.apply_descriptor(&desc, Some(envx), Some(&parent_dir), resolving);
        resolving.pop();
        result
    }

    fn insert_rule(&mut self, name: &str, setting: RuleSetting) {
        if self.rules.insert(name.to_owned(), setting).is_none() {
            self.rule_names.push(name.to_owned());
        }
    }

    #[must_use]
    pub fn rule_names(&self) -> &[String] {
        &self.rule_names
    }

    #[must_use]
    pub fn rule_setting(&self, rule: &str) -> Option<&RuleSetting> {
        self.rules.get(rule)
    }

    #[must_use]
    pub fn rule_severity(&self, rule: &str) -> Option<Severity> {
        self.rules.get(rule).map(|s| s.severity)
    }

    /// True when the rule is present with a severity other than `off`.
    #[must_use]
    pub fn is_rule_enabled(&self, rule: &str) -> bool {
        self.rule_severity(rule)
            .is_some_and(|sev| sev != Severity::Off)
    }

    #[must_use]
    pub fn environments(&self) -> &[String] {
        &self.environments
    }

    #[must_use]
    pub const fn parser_options(&self) -> &ParserOptions {
        &self.parser_options
    }

    /// Identifiers the engine should treat as predefined: language builtins,
    /// environment globals, and explicit `globals` entries not turned off.
    #[must_use]
    pub const fn known_identifiers(&self) -> &BTreeSet<String> {
        &self.known_identifiers
    }

    #[must_use]
    pub fn knows_identifier(&self, ident: &str) -> bool {
        self.known_identifiers.contains(ident)
    }

    #[must_use]
    pub fn ignore_patterns(&self) -> &[String] {
        &self.ignore_patterns
    }

    /// Returns true when `path` should be ignored according to config
    /// patterns. Matching is performed on the path relative to `base_dir`.
    #[must_use]
    pub fn is_file_ignored(&self, path: &Path, base_dir: &Path) -> bool {
        let Some(matcher) = &self.ignore_matcher else {
            return false;
        };
        let rel = path.strip_prefix(base_dir).map_or(path, |r| r);
        matcher.matched_path_or_any_parents(rel, false).is_ignore()
    }

    fn finalize(&mut self, base_dir: &Path) -> Result<(), ConfigError> {
        self.ignore_matcher = if self.ignore_patterns.is_empty() {
            None
        } else {
            let mut builder = GitignoreBuilder::new(base_dir);
            for pat in &self.ignore_patterns {
                let normalized = pat.trim_end_matches(['\r']);
                if let Err(err) = builder.add_line(None, normalized) {
                    return Err(ConfigError::Invalid(format!(
                        "ignore pattern '{normalized}' is invalid: {err}"
                    )));
                }
            }
            Some(
                builder
                    .build()
                    .expect("ignore matcher build should not fail after validation"),
            )
        };
        Ok(())
    }

    /// Effective configuration in the descriptor file format, for reporting.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        let mut map = Map::new();
        let mut rules = Map::new();
        for (name, setting) in &self.rules {
            rules.insert(name.clone(), setting.to_value());
        }
        map.insert("rules".to_owned(), Value::Object(rules));
        map.insert(
            "env".to_owned(),
            Value::Array(
                self.environments
                    .iter()
                    .map(|e| Value::String(e.clone()))
                    .collect(),
            ),
        );
        let mut globals = Map::new();
        for (ident, value) in &self.globals {
            globals.insert(ident.clone(), Value::String(value.as_str().to_owned()));
        }
        map.insert("globals".to_owned(), Value::Object(globals));
        map.insert("parserOptions".to_owned(), {
            let mut opts = Map::new();
            if let Some(v) = self.parser_options.ecma_version {
                opts.insert(
                    "ecmaVersion".to_owned(),
                    match v {
                        crate::descriptor::EcmaVersion::Latest => Value::String("latest".to_owned()),
                        crate::descriptor::EcmaVersion::Year(n) => Value::Number(n.into()),
                    },
                );
            }
            if let Some(s) = self.parser_options.source_type {
                opts.insert("sourceType".to_owned(), Value::String(s.as_str().to_owned()));
            }
            Value::Object(opts)
        });
        map.insert(
            "ignorePatterns".to_owned(),
            Value::Array(
                self.ignore_patterns
                    .iter()
                    .map(|p| Value::String(p.clone()))
                    .collect(),
            ),
        );
        Value::Object(map)
    }
}

/// Result of configuration discovery.
#[derive(Debug, Clone)]
pub struct ConfigContext {
    pub config: LintConfig,
    pub base_dir: PathBuf,
    pub source: Option<PathBuf>,
}

fn finalize_context(
    mut cfg: LintConfig,
    base_dir: impl Into<PathBuf>,
    source: Option<PathBuf>,
) -> Result<ConfigContext, ConfigError> {
    let base_dir = base_dir.into();
    cfg.finalize(&base_dir)?;
    Ok(ConfigContext {
        config: cfg,
        base_dir,
        source,
    })
}

/// Discover configuration with precedence:
/// config-data > config-file > project descriptors > env var > user-global >
/// builtin default preset.
///
/// # Errors
/// Returns an error when a config file cannot be read or resolved.
pub fn discover_config(
    inputs: &[PathBuf],
    overrides: &Overrides,
) -> Result<ConfigContext, ConfigError> {
    discover_config_with(inputs, overrides, &SystemEnv)
}

/// Discover configuration using a provided `Env` implementation.
///
/// # Errors
/// Returns an error when a configuration file cannot be read or resolved.
///
/// # Panics
/// Panics only if a builtin preset cannot be parsed, which indicates a
/// programming error.
pub fn discover_config_with(
    inputs: &[PathBuf],
    overrides: &Overrides,
    envx: &dyn Env,
) -> Result<ConfigContext, ConfigError> {
    if let Some(ref data) = overrides.config_data {
        let base_dir = envx.current_dir();
        let cfg = LintConfig::from_config_str_with_env(data, Some(envx), Some(&base_dir))?;
        return finalize_context(cfg, base_dir, None);
    }
    if let Some(ref file) = overrides.config_file {
        return ctx_from_config_path_core(envx, file);
    }
    if let Some(chain) = find_project_chain_core(envx, inputs)? {
        return resolve_chain(envx, chain);
    }
    if let Some(ctx) = try_env_config_core(envx)? {
        return Ok(ctx);
    }
    let cwd = envx.current_dir();
    try_user_global_core(envx, &cwd)?.map_or_else(
        move || {
            finalize_context(
                LintConfig::from_config_str(
                    conf::builtin(DEFAULT_PRESET).expect("default preset must exist"),
                )
                .expect("builtin preset must parse"),
                cwd,
                None,
            )
        },
        Ok,
    )
}

/// Variant of `discover_config` with injectable environment variables to
/// keep tests safe.
///
/// # Errors
/// Returns an error when a config file cannot be read or resolved.
pub fn discover_config_with_env(
    _inputs: &[PathBuf],
    overrides: &Overrides,
    env_get: &dyn Fn(&str) -> Option<String>,
) -> Result<ConfigContext, ConfigError> {
    struct ClosureEnv<'a> {
        get: &'a dyn Fn(&str) -> Option<String>,
    }
    impl Env for ClosureEnv<'_> {
        fn current_dir(&self) -> PathBuf {
            SystemEnv.current_dir()
        }
        fn config_dir(&self) -> Option<PathBuf> {
            SystemEnv.config_dir()
        }
        fn read_to_string(&self, p: &Path) -> Result<String, String> {
            SystemEnv.read_to_string(p)
        }
        fn path_exists(&self, p: &Path) -> bool {
            SystemEnv.path_exists(p)
        }
        fn env_var(&self, key: &str) -> Option<String> {
            (self.get)(key)
        }
    }
    discover_config_with(&[], overrides, &ClosureEnv { get: env_get })
}

/// Discover the effective config for a single file. Precedence: project
/// descriptors up-tree from the file's directory, then user-global, then
/// the builtin default preset.
///
/// # Errors
/// Returns an error when a config file cannot be read or resolved.
pub fn discover_per_file(path: &Path) -> Result<ConfigContext, ConfigError> {
    discover_per_file_with(path, &SystemEnv)
}

/// Discover the effective config for a single file using a provided `Env`.
///
/// # Errors
/// Returns an error when a configuration file cannot be read or resolved.
///
/// # Panics
/// Panics only if a builtin preset cannot be parsed.
pub fn discover_per_file_with(path: &Path, envx: &dyn Env) -> Result<ConfigContext, ConfigError> {
    let start_dir = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    };

    if let Some(chain) = find_project_chain_core(envx, &[start_dir.to_path_buf()])? {
        return resolve_chain(envx, chain);
    }
    try_user_global_core(envx, start_dir)?.map_or_else(
        || {
            finalize_context(
                LintConfig::from_config_str(
                    conf::builtin(DEFAULT_PRESET).expect("default preset must exist"),
                )
                .expect("builtin preset must parse"),
                envx.current_dir(),
                None,
            )
        },
        Ok,
    )
}

// Testable core helpers below.

fn ctx_from_config_path_core(envx: &dyn Env, p: &Path) -> Result<ConfigContext, ConfigError> {
    let data = envx.read_to_string(p).map_err(|message| ConfigError::Io {
        path: p.to_path_buf(),
        message,
    })?;
    let base = p
        .parent()
        .map_or_else(|| envx.current_dir(), Path::to_path_buf);
    let desc = Descriptor::parse_file_data(p, &data)?;
    let mut cfg = LintConfig::default();
    let mut resolving = Vec::new();
    cfg.apply_descriptor(&desc, Some(envx), Some(&base), &mut resolving)?;
    finalize_context(cfg, base, Some(p.to_path_buf()))
}

fn try_env_config_core(envx: &dyn Env) -> Result<Option<ConfigContext>, ConfigError> {
    envx.env_var(CONFIG_FILE_VAR)
        .map(PathBuf::from)
        .filter(|p| envx.path_exists(p))
        .map(|p| ctx_from_config_path_core(envx, &p))
        .transpose()
}

fn try_user_global_core(
    envx: &dyn Env,
    base_dir: &Path,
) -> Result<Option<ConfigContext>, ConfigError> {
    envx.config_dir()
        .map(|base| base.join("lintrc").join("config"))
        .filter(|p| envx.path_exists(p))
        .map(|p| {
            let data = envx.read_to_string(&p).map_err(|message| ConfigError::Io {
                path: p.clone(),
                message,
            })?;
            let desc = Descriptor::parse_file_data(&p, &data)?;
            let mut cfg = LintConfig::default();
            let mut resolving = Vec::new();
            cfg.apply_descriptor(&desc, Some(envx), Some(base_dir), &mut resolving)?;
            finalize_context(cfg, base_dir.to_path_buf(), Some(p))
        })
        .transpose()
}

/// A project descriptor located during the ascending walk, nearest first.
struct ChainEntry {
    path: PathBuf,
    dir: PathBuf,
    descriptor: Descriptor,
}

/// Apply a discovered chain outermost-first so nearer descriptors win per
/// key. Each descriptor's `extends` entries resolve relative to its own
/// directory.
fn resolve_chain(envx: &dyn Env, chain: Vec<ChainEntry>) -> Result<ConfigContext, ConfigError> {
    let base_dir = chain[0].dir.clone();
    let source = chain[0].path.clone();
    let mut cfg = LintConfig::default();
    for entry in chain.iter().rev() {
        let mut resolving = Vec::new();
        cfg.apply_descriptor(&entry.descriptor, Some(envx), Some(&entry.dir), &mut resolving)?;
    }
    finalize_context(cfg, base_dir, Some(source))
}

/// Walk ancestor directories of each start, collecting descriptors until
/// one sets `root: true` (included; nothing above it is ever read), the
/// home directory, or the filesystem root.
fn find_project_chain_core(
    envx: &dyn Env,
    inputs: &[PathBuf],
) -> Result<Option<Vec<ChainEntry>>, ConfigError> {
    let mut starts: Vec<PathBuf> = Vec::new();
    let cwd = envx.current_dir();
    if inputs.is_empty() {
        starts.push(cwd.clone());
    } else {
        for p in inputs {
            let s = if p.is_dir() {
                p.clone()
            } else {
                p.parent().map_or_else(|| cwd.clone(), Path::to_path_buf)
            };
            let abs = if s.is_absolute() { s } else { cwd.join(s) };
            if !starts.iter().any(|e| e == &abs) {
                starts.push(abs);
            }
        }
    }
    let home_dir = envx
        .env_var("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir);
    let home_abs = home_dir.as_ref().map(|h| {
        if h.is_absolute() {
            h.clone()
        } else {
            cwd.join(h)
        }
    });
    for start in starts {
        let mut chain: Vec<ChainEntry> = Vec::new();
        let mut dir = if start.is_absolute() {
            start
        } else {
            cwd.join(start)
        };
        loop {
            if let Some(cand) = CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|cand| envx.path_exists(cand))
            {
                let data = envx
                    .read_to_string(&cand)
                    .map_err(|message| ConfigError::Io {
                        path: cand.clone(),
                        message,
                    })?;
                let descriptor = Descriptor::parse_file_data(&cand, &data)?;
                let stop = descriptor.root;
                chain.push(ChainEntry {
                    path: cand,
                    dir: dir.clone(),
                    descriptor,
                });
                if stop {
                    break;
                }
            }
            if home_abs.as_ref().is_some_and(|home| home == &dir) {
                break;
            }
            match dir.parent() {
                Some(parent) if parent != dir => dir = parent.to_path_buf(),
                _ => break,
            }
        }
        if !chain.is_empty() {
            return Ok(Some(chain));
        }
    }
    Ok(None)
}

fn resolve_extend_path(entry: &str, envx: &dyn Env, base_dir: Option<&Path>) -> PathBuf {
    let candidate = PathBuf::from(entry);
    if candidate.is_absolute() {
        return candidate;
    }
    if let Some(joined) = base_dir
        .map(|base| base.join(&candidate))
        .filter(|candidate| envx.path_exists(candidate))
    {
        return joined;
    }
    let cwd = envx.current_dir();
    let fallback = cwd.join(&candidate);
    if envx.path_exists(&fallback) {
        fallback
    } else {
        candidate
    }
}
