//! Locating and loading `rules.toml`.

use directories::{BaseDirs, ProjectDirs};
use log::debug;
use ps2rfp_core::Rules;
use std::path::PathBuf;

/// `<config dir>/ps2rfp/rules.toml`, if the platform has a config dir.
pub fn user_rules_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "ps2rfp")?;
    Some(proj.config_dir().join("rules.toml"))
}

/// Load rules from `rules_file`, or from the user config dir when not given.
///
/// Problems never stop the run: they are returned as warnings and the
/// built-in rules are used instead.
pub fn load_rules(rules_file: Option<&PathBuf>) -> (Rules, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = rules_file.cloned().or_else(user_rules_path) else {
        return (Rules::default(), warnings);
    };

    if !path.exists() {
        if rules_file.is_some() {
            warnings.push(format!("Rules file not found: {}", path.display()));
        }
        return (Rules::default(), warnings);
    }

    match Rules::load(&path) {
        Ok(rules) => {
            debug!("loaded rules from {}", path.display());
            (rules, warnings)
        }
        Err(err) => {
            warnings.push(format!("{} (using built-in rules)", err));
            (Rules::default(), warnings)
        }
    }
}

/// Clean up a pasted path: surrounding whitespace and quotes go, and a
/// leading `~` becomes the home directory.
pub fn clean_input_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim().trim_matches('"').trim_matches('\'').trim();
    let expanded = expand_home(trimmed);
    std::path::absolute(&expanded).unwrap_or(expanded)
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(path),
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}
