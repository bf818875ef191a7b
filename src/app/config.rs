use crate::app::cleaner::DEFAULT_TARGETS;
use crate::app::cli::{CleanArgs, FormatArgs};
use crate::app::models::{InclusionRules, RuntimeConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "ue-tidy.toml";

/// Settings read from `ue-tidy.toml`. Every key is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub projects: Option<Vec<String>>,
    pub plugins: Option<Vec<String>>,
    pub formatter: Option<String>,
    pub reference: Option<String>,
    pub root: Option<String>,
    pub clean_targets: Option<Vec<String>>,
}

/// Loads the config file: `explicit` if given, else `ue-tidy.toml` in
/// `search_dir`, else `~/.config/ue-tidy/config.toml`, else defaults.
pub fn load_config_file(explicit: Option<&Path>, search_dir: &Path) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let local = search_dir.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return read_config(&local);
    }

    if let Some(global) = global_config_path() {
        if global.is_file() {
            return read_config(&global);
        }
    }

    log::debug!("No config file found, using built-in defaults");
    Ok(ConfigFile::default())
}

fn global_config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("ue-tidy").join("config.toml"))
}

fn read_config(path: &Path) -> Result<ConfigFile> {
    log::debug!("Reading config from {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Appends CLI items to the file's items, dropping repeats but keeping order.
fn merge_vecs(file_vec: Vec<String>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = file_vec;
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

pub fn resolve_format_config(args: FormatArgs, file: ConfigFile) -> RuntimeConfig {
    let defaults = InclusionRules::default();
    let projects = merge_vecs(file.projects.unwrap_or(defaults.projects), args.projects);
    let plugins = merge_vecs(file.plugins.unwrap_or(defaults.plugin_allowlist), args.plugins);

    RuntimeConfig {
        rules: InclusionRules::new(projects, plugins),
        formatter: args
            .formatter
            .or(file.formatter)
            .unwrap_or_else(|| "clang-format".to_string()),
        reference: args
            .reference
            .or(file.reference)
            .unwrap_or_else(|| "HEAD".to_string()),
        root: args.root.or(file.root),
        check: !args.keep_going,
        verbose: args.verbose,
        paths: args.paths,
    }
}

pub fn resolve_clean_targets(args: CleanArgs, file: ConfigFile) -> Vec<String> {
    let base = file
        .clean_targets
        .unwrap_or_else(|| DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect());
    merge_vecs(base, args.targets)
}
