//! Loads process environment from a project `.env` file and an XDG
//! `config.toml`, applying values only where the environment does not
//! already set them. Existing env always wins; `.env` beats XDG.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

#[derive(Debug, Default, serde::Deserialize)]
struct XdgDocument {
    #[serde(default)]
    env: HashMap<String, String>,
}

fn load_xdg_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let base = dirs::config_dir().ok_or_else(|| LoadError::XdgPath("no config dir".into()))?;
    let path = base.join(app_name).join("config.toml");
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let raw = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let doc: XdgDocument = toml::from_str(&raw)?;
    Ok(doc.env)
}

fn load_dotenv_map(dir: Option<&Path>) -> Result<HashMap<String, String>, std::io::Error> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let path = dir.join(".env");
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let raw = std::fs::read_to_string(path)?;
    let mut map = HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(map)
}

/// Loads config from `$XDG_CONFIG_HOME/<app_name>/config.toml` and an
/// optional project `.env`, then sets environment variables for keys not
/// already present in the process environment.
///
/// Precedence when a key is missing from the process environment:
/// 1. `.env` (in `override_dir`, or the current directory)
/// 2. `[env]` table of the XDG `config.toml`
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = load_xdg_map(app_name)?;
    let dotenv_map = load_dotenv_map(override_dir).map_err(LoadError::DotenvRead)?;

    let mut keys: std::collections::HashSet<String> = xdg_map.keys().cloned().collect();
    keys.extend(dotenv_map.keys().cloned());

    for key in keys {
        if std::env::var(&key).is_ok() {
            continue;
        }
        if let Some(value) = dotenv_map.get(&key).or_else(|| xdg_map.get(&key)) {
            std::env::set_var(&key, value);
        }
    }

    Ok(())
}
