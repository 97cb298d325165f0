use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use http::HeaderValue;
use thiserror::Error;

use crate::upstream::GeminiSettings;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3001";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 150;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are the AI Space Guide, a helpful and engaging \
assistant for NASA space images. Keep answers concise, informative, and focused only on \
astronomy, galaxies, nebulae, and stars.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("invalid CHAT_ADDR {value:?}: {source}")]
    InvalidAddr {
        value: String,
        source: AddrParseError,
    },
    #[error("invalid CHAT_ALLOWED_ORIGIN {0:?}")]
    InvalidOrigin(String),
}

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub addr: SocketAddr,
    /// The only origin allowed by CORS.
    pub allowed_origin: HeaderValue,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub system_instruction: String,
    pub max_output_tokens: u32,
    pub upstream_timeout: Duration,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable numbers fall back to
    /// their defaults; a bad address or origin is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let addr_raw = var_or(&lookup, "CHAT_ADDR", DEFAULT_ADDR);
        let addr = addr_raw
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                value: addr_raw.clone(),
                source,
            })?;

        let origin_raw = var_or(&lookup, "CHAT_ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN);
        let origin = origin_raw.trim().trim_end_matches('/');
        if origin == "*" {
            return Err(ConfigError::InvalidOrigin(origin_raw));
        }
        let allowed_origin = HeaderValue::from_str(origin)
            .map_err(|_| ConfigError::InvalidOrigin(origin_raw.clone()))?;

        Ok(Self {
            addr,
            allowed_origin,
            api_key,
            model: var_or(&lookup, "GEMINI_MODEL", DEFAULT_MODEL),
            base_url: var_or(&lookup, "GEMINI_BASE_URL", DEFAULT_BASE_URL),
            system_instruction: var_or(
                &lookup,
                "CHAT_SYSTEM_INSTRUCTION",
                DEFAULT_SYSTEM_INSTRUCTION,
            ),
            max_output_tokens: var_parsed(
                &lookup,
                "CHAT_MAX_OUTPUT_TOKENS",
                DEFAULT_MAX_OUTPUT_TOKENS,
            ),
            upstream_timeout: Duration::from_secs(var_parsed(
                &lookup,
                "CHAT_UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )),
        })
    }

    pub fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            system_instruction: self.system_instruction.clone(),
            max_output_tokens: self.max_output_tokens,
        }
    }
}

fn var_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn var_parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use pretty_assertions::assert_eq;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let cfg = RelayConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:3001".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.allowed_origin, "http://localhost:5173");
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.max_output_tokens, 150);
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(30));
        assert_eq!(cfg.system_instruction, DEFAULT_SYSTEM_INSTRUCTION);
    }

    #[test]
    fn missing_or_blank_key_is_fatal() {
        assert!(matches!(
            RelayConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(
            RelayConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn overrides_are_read() {
        let cfg = RelayConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("CHAT_ADDR", "0.0.0.0:8080"),
            ("CHAT_ALLOWED_ORIGIN", "https://explorer.example/"),
            ("GEMINI_MODEL", "gemini-test"),
            ("CHAT_MAX_OUTPUT_TOKENS", "64"),
            ("CHAT_UPSTREAM_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.allowed_origin, "https://explorer.example");
        assert_eq!(cfg.model, "gemini-test");
        assert_eq!(cfg.max_output_tokens, 64);
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let cfg = RelayConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("CHAT_MAX_OUTPUT_TOKENS", "lots"),
        ]))
        .unwrap();
        assert_eq!(cfg.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
    }

    #[test]
    fn bad_addr_is_an_error() {
        let err = RelayConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("CHAT_ADDR", "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr { .. }));
    }

    #[test]
    fn wildcard_origin_is_rejected() {
        let err = RelayConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("CHAT_ALLOWED_ORIGIN", "*"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOrigin(_)));
    }

    #[test]
    fn bad_origin_is_an_error() {
        let err = RelayConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("CHAT_ALLOWED_ORIGIN", "http://bad\norigin"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOrigin(_)));
    }
}
