//! Host configuration and factories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use sortable_core::traits::{GradeSink, IdentityTranslator, Translator};

use crate::catalog::CatalogTranslator;
use crate::http::HttpGradeSink;
use crate::logging::LogGradeSink;
use crate::memory::RecordingGradeSink;

/// Where grades go.
///
/// Note: Custom Debug impl masks the API token to prevent accidental exposure in logs.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GradeSinkConfig {
    /// Log grades through `tracing`.
    #[default]
    Log,
    /// Keep grades in process memory.
    Memory,
    /// POST grades to an LMS endpoint.
    Http {
        base_url: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl std::fmt::Debug for GradeSinkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeSinkConfig::Log => f.write_str("Log"),
            GradeSinkConfig::Memory => f.write_str("Memory"),
            GradeSinkConfig::Http {
                base_url,
                token,
                timeout_secs,
            } => f
                .debug_struct("Http")
                .field("base_url", base_url)
                .field("token", &token.as_ref().map(|_| "***"))
                .field("timeout_secs", timeout_secs)
                .finish(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Top-level sortable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortableConfig {
    /// Directory holding problem and learner records.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Grade sink to publish to.
    #[serde(default)]
    pub grade_sink: GradeSinkConfig,
    /// Optional message catalog for feedback translation.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("./sortable-state")
}

impl Default for SortableConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            grade_sink: GradeSinkConfig::default(),
            catalog: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_grade_sink_config(config: &GradeSinkConfig) -> GradeSinkConfig {
    match config {
        GradeSinkConfig::Http {
            base_url,
            token,
            timeout_secs,
        } => GradeSinkConfig::Http {
            base_url: resolve_env_vars(base_url),
            token: token.as_ref().map(|t| resolve_env_vars(t)),
            timeout_secs: *timeout_secs,
        },
        other => other.clone(),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `sortable.toml` in the current directory
/// 2. `~/.config/sortable/config.toml`
///
/// Environment variable overrides: `SORTABLE_GRADE_URL`, `SORTABLE_GRADE_TOKEN`.
pub fn load_config() -> Result<SortableConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SortableConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("sortable.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loading config from {}", path.display());
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SortableConfig::default(),
    };

    apply_grade_overrides(
        &mut config.grade_sink,
        std::env::var("SORTABLE_GRADE_URL").ok(),
        std::env::var("SORTABLE_GRADE_TOKEN").ok(),
    );
    config.grade_sink = resolve_grade_sink_config(&config.grade_sink);
    Ok(config)
}

/// Point the grade sink at `url` and/or replace its token. A configured
/// HTTP sink keeps its other settings.
fn apply_grade_overrides(sink: &mut GradeSinkConfig, url: Option<String>, token: Option<String>) {
    if let Some(url) = url {
        *sink = match std::mem::take(sink) {
            GradeSinkConfig::Http {
                token,
                timeout_secs,
                ..
            } => GradeSinkConfig::Http {
                base_url: url,
                token,
                timeout_secs,
            },
            _ => GradeSinkConfig::Http {
                base_url: url,
                token: None,
                timeout_secs: default_timeout_secs(),
            },
        };
    }

    if let Some(key) = token {
        if let GradeSinkConfig::Http { token, .. } = sink {
            *token = Some(key);
        }
    }
}

/// Parse a config document.
pub fn parse_config_str(content: &str) -> Result<SortableConfig> {
    Ok(toml::from_str::<SortableConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("sortable"))
}

/// Create a grade sink from its configuration.
pub fn create_grade_sink(config: &GradeSinkConfig) -> Result<Arc<dyn GradeSink>> {
    match config {
        GradeSinkConfig::Log => Ok(Arc::new(LogGradeSink)),
        GradeSinkConfig::Memory => Ok(Arc::new(RecordingGradeSink::new())),
        GradeSinkConfig::Http {
            base_url,
            token,
            timeout_secs,
        } => Ok(Arc::new(HttpGradeSink::with_timeout(
            base_url,
            token.clone(),
            *timeout_secs,
        )?)),
    }
}

/// Create the translator named by the config, identity when none is set.
pub fn create_translator(config: &SortableConfig) -> Result<Arc<dyn Translator>> {
    match &config.catalog {
        Some(path) => Ok(Arc::new(CatalogTranslator::load(path)?)),
        None => Ok(Arc::new(IdentityTranslator)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_SORTABLE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_SORTABLE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_SORTABLE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_SORTABLE_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_unset_is_empty() {
        std::env::remove_var("_SORTABLE_UNSET_VAR");
        assert_eq!(resolve_env_vars("${_SORTABLE_UNSET_VAR}"), "");
        assert_eq!(
            resolve_env_vars("Bearer ${_SORTABLE_UNSET_VAR}!"),
            "Bearer !"
        );
        assert_eq!(resolve_env_vars("no references"), "no references");
    }

    #[test]
    fn url_override_keeps_configured_timeout_and_token() {
        let mut sink = GradeSinkConfig::Http {
            base_url: "https://old.example.com".into(),
            token: Some("sk-file".into()),
            timeout_secs: 5,
        };
        apply_grade_overrides(&mut sink, Some("https://new.example.com".into()), None);
        match sink {
            GradeSinkConfig::Http {
                base_url,
                token,
                timeout_secs,
            } => {
                assert_eq!(base_url, "https://new.example.com");
                assert_eq!(token.as_deref(), Some("sk-file"));
                assert_eq!(timeout_secs, 5);
            }
            other => panic!("unexpected sink: {other:?}"),
        }
    }

    #[test]
    fn url_override_turns_log_sink_into_http() {
        let mut sink = GradeSinkConfig::Log;
        apply_grade_overrides(
            &mut sink,
            Some("https://lms.example.com".into()),
            Some("sk-env".into()),
        );
        match sink {
            GradeSinkConfig::Http {
                token,
                timeout_secs,
                ..
            } => {
                assert_eq!(token.as_deref(), Some("sk-env"));
                assert_eq!(timeout_secs, 30);
            }
            other => panic!("unexpected sink: {other:?}"),
        }

        let mut log = GradeSinkConfig::Log;
        apply_grade_overrides(&mut log, None, Some("sk-env".into()));
        assert!(matches!(log, GradeSinkConfig::Log));
    }

    #[test]
    fn default_config() {
        let config = SortableConfig::default();
        assert_eq!(config.state_dir, PathBuf::from("./sortable-state"));
        assert!(matches!(config.grade_sink, GradeSinkConfig::Log));
        assert!(config.catalog.is_none());
    }

    #[test]
    fn parse_http_sink() {
        let config = parse_config_str(
            r#"
state_dir = "/var/lib/sortable"

[grade_sink]
type = "http"
base_url = "https://lms.example.com/api"
token = "sk-test"
"#,
        )
        .unwrap();
        assert_eq!(config.state_dir, PathBuf::from("/var/lib/sortable"));
        match &config.grade_sink {
            GradeSinkConfig::Http {
                base_url,
                timeout_secs,
                ..
            } => {
                assert_eq!(base_url, "https://lms.example.com/api");
                assert_eq!(*timeout_secs, 30);
            }
            other => panic!("unexpected sink: {other:?}"),
        }
    }

    #[test]
    fn debug_masks_token() {
        let sink = GradeSinkConfig::Http {
            base_url: "https://lms.example.com".into(),
            token: Some("sk-secret".into()),
            timeout_secs: 30,
        };
        let rendered = format!("{sink:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/sortable.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn factories() {
        assert_eq!(create_grade_sink(&GradeSinkConfig::Log).unwrap().name(), "log");
        assert_eq!(create_grade_sink(&GradeSinkConfig::Memory).unwrap().name(), "memory");
        let translator = create_translator(&SortableConfig::default()).unwrap();
        assert_eq!(translator.gettext("x"), "x");
    }
}
