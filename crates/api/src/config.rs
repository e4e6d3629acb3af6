use axum::http::HeaderValue;
use spdrive_graph::config::{ConfigError, GraphConfig};

/// Server configuration loaded from environment variables.
///
/// Server fields have defaults suitable for local development; the Graph
/// credentials have none and must be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Inbound request timeout in seconds (default: `120`).
    ///
    /// Longer than the upstream timeout so a token fetch plus a Graph call
    /// can both run to their own limits.
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Graph credentials, endpoints and territory table.
    pub graph: GraphConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    ///
    /// Graph settings are documented on [`GraphConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |key: &str| std::env::var(key).ok();

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = parse_var("PORT", var("PORT"), 3000)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    reason: format!("'{origin}': {e}"),
                })?;
        }

        let request_timeout_secs =
            parse_var("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 120)?;
        let shutdown_timeout_secs =
            parse_var("SHUTDOWN_TIMEOUT_SECS", var("SHUTDOWN_TIMEOUT_SECS"), 30)?;

        let graph = GraphConfig::from_env()?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            graph,
        })
    }
}

fn parse_var<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_var_defaults_when_unset() {
        assert_eq!(parse_var::<u16>("PORT", None, 3000).unwrap(), 3000);
    }

    #[test]
    fn parse_var_reads_value() {
        assert_eq!(parse_var::<u64>("X", Some(" 45 ".into()), 1).unwrap(), 45);
    }

    #[test]
    fn parse_var_rejects_garbage() {
        assert_matches!(
            parse_var::<u16>("PORT", Some("70000".into()), 3000),
            Err(ConfigError::Invalid { var: "PORT", .. })
        );
    }
}
