//! Environment Configuration
//!
//! Loads environment variables from a local `.env` file (development
//! convenience) and resolves the bridge's required settings. Variables that
//! are already set in the process environment are never overridden.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable holding the Notion integration token.
pub const NOTION_TOKEN_VAR: &str = "NOTION_TOKEN";

/// Accepted endpoint variable names, first present-and-non-empty wins.
pub const ENDPOINT_VARS: &[&str] = &["XIAOZHI_WSS", "MCP_ENDPOINT"];

/// Env-file paths checked in order.
pub const ENV_FILE_PATHS: &[&str] = &[".env"];

/// Resolved bridge configuration, constructed once at startup and passed by
/// reference into every component requiring external-service access.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Notion integration token.
    pub notion_token: String,
    /// Websocket endpoint of the agent side.
    pub endpoint: String,
}

impl BridgeConfig {
    /// Build the configuration from the process environment.
    ///
    /// Fails with a configuration error naming the absent variable. This is
    /// the only fatal error path of the bridge; it is surfaced before any
    /// connection attempt.
    pub fn from_env() -> Result<Self> {
        let notion_token = get_config_opt(NOTION_TOKEN_VAR)
            .ok_or_else(|| Error::config(format!("Missing {}", NOTION_TOKEN_VAR)))?;
        let endpoint = resolve_endpoint()
            .ok_or_else(|| Error::config(format!("Missing {}", ENDPOINT_VARS.join(" or "))))?;
        Ok(Self {
            notion_token,
            endpoint,
        })
    }
}

/// Resolve the websocket endpoint, accepting both naming styles.
pub fn resolve_endpoint() -> Option<String> {
    ENDPOINT_VARS.iter().find_map(|var| get_config_opt(var))
}

/// Load environment variables from a local env file.
///
/// Checks `BRIDGE_ENV_FILE` first, then `.env` in the working directory.
/// Returns the path that was loaded, or None if no file was found.
pub fn load_environment() -> Option<String> {
    if let Ok(custom_path) = std::env::var("BRIDGE_ENV_FILE") {
        if let Some(path) = try_load_env_file(&custom_path) {
            return Some(path);
        }
    }

    for path in ENV_FILE_PATHS {
        if let Some(loaded_path) = try_load_env_file(path) {
            return Some(loaded_path);
        }
    }

    debug!("No environment file found, using existing environment");
    None
}

/// Try to load an environment file from the given path.
fn try_load_env_file(path: &str) -> Option<String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return None;
    }

    match fs::read_to_string(path_obj) {
        Ok(content) => {
            let mut loaded_count = 0;

            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = parse_env_line(line) {
                    // Don't override existing environment variables
                    if std::env::var(&key).is_err() {
                        std::env::set_var(&key, &value);
                        loaded_count += 1;
                    }
                }
            }

            info!("Loaded {} environment variables from {}", loaded_count, path);
            Some(path.to_string())
        }
        Err(e) => {
            warn!("Failed to read environment file {}: {}", path, e);
            None
        }
    }
}

/// Parse a single `KEY=VALUE` line, stripping surrounding quotes.
fn parse_env_line(line: &str) -> Option<(String, String)> {
    let mut parts = line.splitn(2, '=');
    let key = parts.next()?.trim();
    let value = parts.next()?.trim();

    if key.is_empty() {
        return None;
    }

    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    Some((key.to_string(), value.to_string()))
}

/// Get an optional configuration value; empty strings count as absent.
pub fn get_config_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_line_simple() {
        let (k, v) = parse_env_line("FOO=bar").unwrap();
        assert_eq!(k, "FOO");
        assert_eq!(v, "bar");
    }

    #[test]
    fn test_parse_env_line_quoted() {
        let (k, v) = parse_env_line("FOO=\"bar baz\"").unwrap();
        assert_eq!(k, "FOO");
        assert_eq!(v, "bar baz");
    }

    #[test]
    fn test_parse_env_line_single_quoted() {
        let (k, v) = parse_env_line("TOKEN='secret'").unwrap();
        assert_eq!(k, "TOKEN");
        assert_eq!(v, "secret");
    }

    #[test]
    fn test_parse_env_line_empty() {
        assert!(parse_env_line("").is_none());
        assert!(parse_env_line("=value").is_none());
    }

    // Environment mutation is kept inside one test so parallel tests in
    // this crate never race on the same variables.
    #[test]
    fn test_from_env_reports_missing_variables() {
        std::env::remove_var(NOTION_TOKEN_VAR);
        for var in ENDPOINT_VARS {
            std::env::remove_var(var);
        }

        let err = BridgeConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(NOTION_TOKEN_VAR));

        std::env::set_var(NOTION_TOKEN_VAR, "secret-token");
        let err = BridgeConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("XIAOZHI_WSS"));

        // Second naming style is accepted.
        std::env::set_var("MCP_ENDPOINT", "wss://example.invalid/mcp");
        let config = BridgeConfig::from_env().unwrap();
        assert_eq!(config.endpoint, "wss://example.invalid/mcp");

        // First naming style wins when both are present.
        std::env::set_var("XIAOZHI_WSS", "wss://primary.invalid/mcp");
        let config = BridgeConfig::from_env().unwrap();
        assert_eq!(config.endpoint, "wss://primary.invalid/mcp");

        // Blank values count as absent.
        std::env::set_var("XIAOZHI_WSS", "  ");
        let config = BridgeConfig::from_env().unwrap();
        assert_eq!(config.endpoint, "wss://example.invalid/mcp");

        std::env::remove_var(NOTION_TOKEN_VAR);
        std::env::remove_var("XIAOZHI_WSS");
        std::env::remove_var("MCP_ENDPOINT");
    }
}
