#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

pub mod conf;
pub mod config;
pub mod descriptor;
pub mod envs;
pub mod error;

pub use config::{
    ConfigContext, Env, LintConfig, Overrides, SystemEnv, discover_config, discover_config_with,
    discover_config_with_env, discover_per_file, discover_per_file_with,
};
pub use descriptor::{
    Descriptor, EcmaVersion, GlobalValue, ParserOptions, RuleSetting, Severity, SourceType,
};
pub use error::ConfigError;
