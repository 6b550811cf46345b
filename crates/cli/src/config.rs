//! Server configuration: defaults, optional TOML file, environment, CLI flags.
//!
//! Later layers override earlier ones. The Gemini API key is not part of
//! this struct; the client reads it from `GEMINI_API`.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use reverseai_core::llm::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT};

/// Default port.
pub(crate) const DEFAULT_PORT: u16 = 8501;

/// Default bind address.
const DEFAULT_BIND: &str = "0.0.0.0";

pub(crate) const ENV_PORT: &str = "REVERSEAI_PORT";
pub(crate) const ENV_MODEL: &str = "REVERSEAI_MODEL";
pub(crate) const ENV_API_BASE: &str = "REVERSEAI_API_BASE";

/// Errors while assembling a [`ServeConfig`].
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Fully resolved settings for `reverseai serve`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ServeConfig {
    pub(crate) bind: IpAddr,
    pub(crate) port: u16,
    pub(crate) model: String,
    pub(crate) api_base: String,
    pub(crate) request_timeout: Duration,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Shape of the optional TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    port: Option<u16>,
    bind: Option<String>,
    model: Option<String>,
    api_base: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Values given on the command line. `None` means "not passed".
#[derive(Debug, Default, Clone)]
pub(crate) struct CliOverrides {
    pub(crate) port: Option<u16>,
    pub(crate) bind: Option<String>,
    pub(crate) model: Option<String>,
    pub(crate) api_base: Option<String>,
}

/// Resolve the config from the process environment.
pub(crate) fn load(
    config_path: Option<&Path>,
    overrides: CliOverrides,
) -> Result<ServeConfig, ConfigError> {
    load_with_env(config_path, overrides, |var| std::env::var(var).ok())
}

/// Resolve the config with an injectable environment lookup.
pub(crate) fn load_with_env<F>(
    config_path: Option<&Path>,
    overrides: CliOverrides,
    env: F,
) -> Result<ServeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file = match config_path {
        Some(path) => read_file(path)?,
        None => FileConfig::default(),
    };

    let env_port = match env(ENV_PORT) {
        Some(v) => Some(v.trim().parse::<u16>().map_err(|_| ConfigError::InvalidEnv {
            var: ENV_PORT,
            value: v.clone(),
        })?),
        None => None,
    };

    let defaults = ServeConfig::default();

    let port = overrides.port.or(env_port).or(file.port).unwrap_or(defaults.port);

    let bind_str = overrides
        .bind
        .or(file.bind)
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let bind = bind_str
        .parse::<IpAddr>()
        .map_err(|_| ConfigError::InvalidBind(bind_str.clone()))?;

    let model = overrides
        .model
        .or_else(|| env(ENV_MODEL))
        .or(file.model)
        .unwrap_or(defaults.model);
    if model.trim().is_empty() {
        return Err(ConfigError::Empty("model"));
    }

    let api_base = overrides
        .api_base
        .or_else(|| env(ENV_API_BASE))
        .or(file.api_base)
        .unwrap_or(defaults.api_base);
    if api_base.trim().is_empty() {
        return Err(ConfigError::Empty("api_base"));
    }

    let request_timeout = file
        .request_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(defaults.request_timeout);

    Ok(ServeConfig {
        bind,
        port,
        model,
        api_base,
        request_timeout,
    })
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_any_source() {
        let config = load_with_env(None, CliOverrides::default(), no_env).unwrap();
        assert_eq!(config, ServeConfig::default());
        assert_eq!(config.port, 8501);
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.bind.to_string(), "0.0.0.0");
    }

    #[test]
    fn file_values_apply() {
        let file = write_config(
            r#"
port = 9000
bind = "127.0.0.1"
model = "gemini-1.5-pro"
api_base = "http://localhost:8080"
request_timeout_secs = 5
"#,
        );
        let config = load_with_env(Some(file.path()), CliOverrides::default(), no_env).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind.to_string(), "127.0.0.1");
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn env_overrides_file_and_cli_overrides_env() {
        let file = write_config("port = 9000\nmodel = \"from-file\"\n");
        let env: HashMap<&str, &str> = [(ENV_PORT, "9100"), (ENV_MODEL, "from-env")].into();
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());

        let config =
            load_with_env(Some(file.path()), CliOverrides::default(), lookup).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.model, "from-env");

        let overrides = CliOverrides {
            port: Some(9200),
            model: Some("from-cli".to_string()),
            ..Default::default()
        };
        let config = load_with_env(Some(file.path()), overrides, lookup).unwrap();
        assert_eq!(config.port, 9200);
        assert_eq!(config.model, "from-cli");
    }

    #[test]
    fn unknown_file_key_is_rejected() {
        let file = write_config("api_key = \"sneaky\"\n");
        let err = load_with_env(Some(file.path()), CliOverrides::default(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got {:?}", err);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_with_env(
            Some(Path::new("/nonexistent/reverseai.toml")),
            CliOverrides::default(),
            no_env,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn bad_env_port_is_rejected() {
        let err = load_with_env(None, CliOverrides::default(), |k| {
            (k == ENV_PORT).then(|| "eighty".to_string())
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid value for REVERSEAI_PORT: 'eighty'");
    }

    #[test]
    fn bad_bind_is_rejected() {
        let overrides = CliOverrides {
            bind: Some("localhost:80".to_string()),
            ..Default::default()
        };
        let err = load_with_env(None, overrides, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind(_)));
    }

    #[test]
    fn empty_model_is_rejected() {
        let overrides = CliOverrides {
            model: Some("  ".to_string()),
            ..Default::default()
        };
        let err = load_with_env(None, overrides, no_env).unwrap_err();
        assert_eq!(err.to_string(), "model must not be empty");
    }
}
