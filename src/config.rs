//! Configuration for coursemap paths and playback.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (COURSEMAP_HOME, COURSEMAP_OUTPUT)
//! 2. Config file (.coursemap/config.yaml)
//! 3. Defaults (home ~/.coursemap, output in the current directory)
//!
//! Config file discovery:
//! - Searches current directory and parents for .coursemap/config.yaml
//! - `paths.home` is relative to the .coursemap/ directory
//! - `paths.output` is relative to the directory containing .coursemap/

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::content::DEFAULT_VIDEO_TYPE;
use crate::library::DEFAULT_PLAYBACK_TEMPLATE;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".coursemap";
const HOME_VAR: &str = "COURSEMAP_HOME";
const OUTPUT_VAR: &str = "COURSEMAP_OUTPUT";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub playback: Option<PlaybackConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    pub home: Option<String>,
    /// Where catalogs are written
    pub output: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// Must contain `{source_id}`
    pub url_template: Option<String>,
    pub default_video_type: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub home: PathBuf,
    /// Directory catalogs and manifests are written to
    pub output: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSettings {
    pub url_template: String,
    pub default_video_type: String,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_PLAYBACK_TEMPLATE.to_string(),
            default_video_type: DEFAULT_VIDEO_TYPE.to_string(),
        }
    }
}

impl PlaybackSettings {
    fn from_config(config: Option<&PlaybackConfig>) -> Self {
        let defaults = Self::default();
        let Some(config) = config else {
            return defaults;
        };

        Self {
            url_template: config
                .url_template
                .clone()
                .filter(|t| t.contains("{source_id}"))
                .unwrap_or(defaults.url_template),
            default_video_type: config
                .default_video_type
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or(defaults.default_video_type),
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Combine config file, environment and defaults
fn resolve(
    config_file: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
    default_home: PathBuf,
    cwd: PathBuf,
) -> ResolvedConfig {
    let Some((config_path, config)) = config_file else {
        return ResolvedConfig {
            home: env(HOME_VAR).map(PathBuf::from).unwrap_or(default_home),
            output: env(OUTPUT_VAR).map(PathBuf::from).unwrap_or(cwd),
            config_file: None,
            playback: PlaybackSettings::default(),
        };
    };

    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let base_dir = config_dir.parent().unwrap_or(Path::new("."));

    let home = match (env(HOME_VAR), &config.paths.home) {
        (Some(env_home), _) => PathBuf::from(env_home),
        (None, Some(home_path)) => resolve_path(config_dir, home_path),
        (None, None) => default_home,
    };

    let output = match (env(OUTPUT_VAR), &config.paths.output) {
        (Some(env_output), _) => PathBuf::from(env_output),
        (None, Some(output_path)) => resolve_path(base_dir, output_path),
        (None, None) => base_dir.to_path_buf(),
    };

    ResolvedConfig {
        home,
        output,
        playback: PlaybackSettings::from_config(config.playback.as_ref()),
        config_file: Some(config_path),
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let config_file = match find_config_file(&cwd) {
        Some(path) => {
            let config = load_config_file(&path)?;
            Some((path, config))
        }
        None => None,
    };

    Ok(resolve(config_file, |key| std::env::var(key).ok(), default_home, cwd))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(
            None,
            no_env,
            PathBuf::from("/home/u/.coursemap"),
            PathBuf::from("/work"),
        );

        assert_eq!(config.home, PathBuf::from("/home/u/.coursemap"));
        assert_eq!(config.output, PathBuf::from("/work"));
        assert!(config.config_file.is_none());
        assert_eq!(config.playback, PlaybackSettings::default());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env: HashMap<&str, &str> = [(HOME_VAR, "/state"), (OUTPUT_VAR, "/out")].into();
        let config = resolve(
            None,
            |key| env.get(key).map(|v| v.to_string()),
            PathBuf::from("/home/u/.coursemap"),
            PathBuf::from("/work"),
        );

        assert_eq!(config.home, PathBuf::from("/state"));
        assert_eq!(config.output, PathBuf::from("/out"));
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
version: "1.0"
paths:
  home: ./
  output: catalogs
playback:
  url_template: "https://cdn.example/{source_id}/index.m3u8"
  default_video_type: vimeo
"#,
        );

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.output, Some("catalogs".to_string()));

        let resolved = resolve(
            Some((path.clone(), config)),
            no_env,
            PathBuf::from("/unused"),
            PathBuf::from("/unused"),
        );
        assert_eq!(resolved.config_file, Some(path));
        assert_eq!(resolved.output, temp.path().join("catalogs"));
        assert_eq!(
            resolved.playback.url_template,
            "https://cdn.example/{source_id}/index.m3u8"
        );
        assert_eq!(resolved.playback.default_video_type, "vimeo");
    }

    #[test]
    fn test_template_without_placeholder_is_ignored() {
        let playback = PlaybackSettings::from_config(Some(&PlaybackConfig {
            url_template: Some("https://cdn.example/static.m3u8".to_string()),
            default_video_type: None,
        }));

        assert_eq!(playback, PlaybackSettings::default());
    }

    #[test]
    fn test_find_config_in_parent() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "version: \"1.0\"");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file(&nested), Some(path));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
