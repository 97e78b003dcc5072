#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use lintrc::config::{
    CONFIG_FILE_VAR, ConfigContext, Overrides, discover_config, discover_per_file,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "lintrc",
    version,
    about = "Resolve effective lint configuration for files and directories"
)]
struct Cli {
    /// One or more paths: files and/or directories
    #[arg(value_name = "PATH_OR_FILE", num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Path to configuration file (yaml or json)
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Inline configuration data
    #[arg(short = 'd', long = "config-data", value_name = "DATA")]
    config_data: Option<String>,

    /// Print only the discovered config file path per input
    #[arg(long = "list-source", default_value_t = false)]
    list_source: bool,
}

#[derive(Serialize)]
struct Report {
    path: String,
    source: Option<String>,
    config: serde_json::Value,
}

fn build_global_cfg(inputs: &[PathBuf], cli: &Cli) -> Option<ConfigContext> {
    if cli.config_data.is_some()
        || cli.config_file.is_some()
        || std::env::var(CONFIG_FILE_VAR).is_ok()
    {
        // Bare preset names are accepted as shorthand for `extends: NAME`.
        let config_data = cli.config_data.as_ref().map(|raw| {
            if !raw.is_empty() && !raw.contains(':') {
                format!("extends: {raw}")
            } else {
                raw.clone()
            }
        });
        Some(
            discover_config(
                inputs,
                &Overrides {
                    config_file: cli.config_file.clone(),
                    config_data,
                },
            )
            .unwrap_or_else(|e| {
                eprintln!("{e}");
                std::process::exit(2);
            }),
        )
    } else {
        None
    }
}

/// Resolve the context for one input, caching per start directory. The
/// cache is only ever appended to within a single invocation.
fn resolve_ctx(
    path: &Path,
    global: Option<&ConfigContext>,
    cache: &mut HashMap<PathBuf, ConfigContext>,
) -> Result<ConfigContext, String> {
    if let Some(ctx) = global {
        return Ok(ctx.clone());
    }
    let start = if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    };
    if !cache.contains_key(&start) {
        let ctx = discover_per_file(path).map_err(|e| e.to_string())?;
        cache.insert(start.clone(), ctx);
    }
    Ok(cache[&start].clone())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.inputs.is_empty() {
        eprintln!("error: expected one or more paths (files and/or directories)");
        return ExitCode::from(2);
    }

    let global_cfg = build_global_cfg(&cli.inputs, &cli);
    let mut cache: HashMap<PathBuf, ConfigContext> = HashMap::new();

    for input in &cli.inputs {
        let ctx = match resolve_ctx(input, global_cfg.as_ref(), &mut cache) {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(2);
            }
        };
        if cli.list_source {
            match &ctx.source {
                Some(p) => println!("{}", p.display()),
                None => println!(),
            }
            continue;
        }
        let report = Report {
            path: input.display().to_string(),
            source: ctx.source.as_ref().map(|p| p.display().to_string()),
            config: ctx.config.to_json_value(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("failed to serialize report: {e}");
                return ExitCode::from(2);
            }
        }
    }

    ExitCode::SUCCESS
}
