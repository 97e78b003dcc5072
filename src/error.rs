use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while loading or resolving a configuration descriptor.
///
/// All variants are fatal to resolution: later steps depend on a fully
/// merged rule set, so no partial configuration is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An `extends` entry names neither a builtin preset nor a readable file.
    #[error("invalid config: extends '{name}' does not resolve to a builtin preset or a config file")]
    UnresolvablePreset { name: String },

    /// An `extends` chain reaches a preset that is already being resolved.
    #[error("invalid config: circular extends through '{name}'")]
    CircularExtends { name: String },

    /// A rule value is not one of the recognized severity forms.
    #[error("invalid config: rule '{rule}' has unrecognized setting {value}")]
    MalformedRuleSetting { rule: String, value: String },

    /// An `env` entry does not name a known environment.
    #[error("invalid config: unknown environment '{name}'")]
    UnknownEnvironment { name: String },

    /// The descriptor has the wrong shape (bad types, unsupported options).
    #[error("invalid config: {0}")]
    Invalid(String),

    /// The descriptor text is not valid YAML or JSON.
    #[error("failed to parse config data: {0}")]
    Parse(String),

    /// A config or preset file could not be read.
    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}
