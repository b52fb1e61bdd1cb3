use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "DATACLEANUP_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingSection,
    pub chase_visa: ChaseVisaSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default level for the datacleanup crates; RUST_LOG still wins.
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseVisaSection {
    /// Substrings whose lines are logged after every scanner stage.
    pub trace: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `--config`, then `$DATACLEANUP_CONFIG`, then `$HOME/.datacleanup/config.toml`.
///
/// `None` when none of them is available.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_config: Option<OsString>,
    home: Option<OsString>,
) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    if let Some(p) = env_config.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(p));
    }
    home.filter(|v| !v.is_empty())
        .map(|h| PathBuf::from(h).join(".datacleanup").join("config.toml"))
}

pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    resolve_config_path(
        explicit,
        std::env::var_os(CONFIG_ENV),
        std::env::var_os("HOME"),
    )
}

/// Config for a run. No resolvable location means built-in defaults.
pub fn load_run_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load_config(p),
        None => Ok(Config::default()),
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = load_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.chase_visa.trace.is_empty());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[chase_visa]\ntrace = [\"I V Y\"]\n").unwrap();

        let cfg = load_config(&p).unwrap();
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.chase_visa.trace, vec!["I V Y".to_string()]);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[logging\nlevel = ").unwrap();

        assert!(load_config(&p).is_err());
    }

    #[test]
    fn test_init_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("nested").join("config.toml");

        init_config(&p).unwrap();
        assert_eq!(load_config(&p).unwrap(), Config::default());

        // Second init leaves an edited file alone.
        fs::write(&p, "[logging]\nlevel = \"debug\"\n").unwrap();
        init_config(&p).unwrap();
        assert_eq!(load_config(&p).unwrap().logging.level, "debug");
    }

    #[test]
    fn test_explicit_path_wins() {
        let p = resolve_config_path(
            Some(Path::new("/tmp/custom.toml")),
            Some("/etc/other.toml".into()),
            Some("/home/me".into()),
        );
        assert_eq!(p, Some(PathBuf::from("/tmp/custom.toml")));
    }

    #[test]
    fn test_env_then_home() {
        let p = resolve_config_path(None, Some("/etc/dc.toml".into()), Some("/home/me".into()));
        assert_eq!(p, Some(PathBuf::from("/etc/dc.toml")));

        let p = resolve_config_path(None, Some("".into()), Some("/home/me".into()));
        assert_eq!(p, Some(PathBuf::from("/home/me/.datacleanup/config.toml")));
    }

    #[test]
    fn test_no_home_falls_back_to_defaults() {
        assert_eq!(resolve_config_path(None, None, None), None);
        assert_eq!(resolve_config_path(None, None, Some("".into())), None);
        assert_eq!(load_run_config(None).unwrap(), Config::default());
    }
}
