//! Configuration for Hedgerow.
//!
//! Read from `~/.hedgerow/config.toml`:
//!
//! ```toml
//! [app]
//! tui = "full"            # or "inline"
//! ascii_only = false
//! high_contrast = false
//!
//! [reporter]
//! kind = "jsonl"          # "log" (default), "jsonl", or "none"
//! path = "${HOME}/.hedgerow/faults.jsonl"
//! ```
//!
//! `HEDGEROW_REPORTER` overrides `reporter.kind`.

use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf};
use thiserror::Error;

use hedgerow_types::ui::UiOptions;

pub const REPORTER_ENV: &str = "HEDGEROW_REPORTER";

const CONFIG_DIR: &str = ".hedgerow";
const DEFAULT_FAULT_QUEUE: &str = "faults.jsonl";

#[derive(Debug, Default, Deserialize)]
pub struct HedgerowConfig {
    pub app: Option<AppConfig>,
    pub reporter: Option<ReporterConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    pub tui: Option<String>,
    /// Use ASCII-only glyphs for borders and icons.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

/// Where contained faults are forwarded.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// Emit each fault as a `tracing` event.
    #[default]
    Log,
    /// Append each fault as a JSON line to a queue file.
    Jsonl,
    /// Drop faults.
    None,
}

impl ReporterKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Jsonl => "jsonl",
            Self::None => "none",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "log" | "tracing" => Some(Self::Log),
            "jsonl" | "file" => Some(Self::Jsonl),
            "none" | "off" => Some(Self::None),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReporterConfig {
    #[serde(default)]
    pub kind: ReporterKind,
    /// Queue file for the `jsonl` reporter. `${VAR}` references are expanded.
    pub path: Option<String>,
}

/// Reporter settings after env overrides and path defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterSettings {
    pub kind: ReporterKind,
    pub path: PathBuf,
}

impl HedgerowConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn tui_mode(&self) -> Option<&str> {
        self.app.as_ref().and_then(|app| app.tui.as_deref())
    }

    /// Resolves reporter settings, honoring `HEDGEROW_REPORTER`.
    #[must_use]
    pub fn reporter_settings(&self) -> ReporterSettings {
        let env_override = env::var(REPORTER_ENV).ok();
        self.reporter_settings_with(env_override.as_deref())
    }

    #[must_use]
    pub fn reporter_settings_with(&self, env_override: Option<&str>) -> ReporterSettings {
        let configured = self.reporter.as_ref();
        let kind = match env_override {
            Some(raw) => ReporterKind::parse(raw).unwrap_or_else(|| {
                tracing::warn!("Unknown reporter kind in {REPORTER_ENV}: {raw}");
                configured.map(|r| r.kind).unwrap_or_default()
            }),
            None => configured.map(|r| r.kind).unwrap_or_default(),
        };

        let path = configured
            .and_then(|r| r.path.as_deref())
            .map(|raw| PathBuf::from(expand_env_vars(raw)))
            .unwrap_or_else(default_fault_queue_path);

        ReporterSettings { kind, path }
    }
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

fn default_fault_queue_path() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR))
        .join(DEFAULT_FAULT_QUEUE)
}
