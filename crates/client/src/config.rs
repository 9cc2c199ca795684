//! Gateway configuration.
//!
//! The configuration is a JSON file, re-read on every session init so edits
//! take effect without a restart. Every string value in the raw JSON tree
//! undergoes environment substitution before typed deserialization:
//!
//! | Placeholder | Resolves to |
//! |-------------|-------------|
//! | `${NAME}` | the value of environment variable `NAME`; unset is a fatal error |
//! | `${NAME-DEFAULT}` | the value of `NAME`, or the literal `DEFAULT` when unset |
//!
//! # Example
//!
//! ```json
//! {
//!   "okapi": {
//!     "url": "https://folio-snapshot-okapi.dev.folio.org",
//!     "tenant": "${OKAPI_TENANT-diku}"
//!   },
//!   "login": { "username": "diku_admin", "password": "${OKAPI_PASSWORD}" },
//!   "indexMap": { "1": "contributors", "4": "title", "7": "hrid" },
//!   "queryFilter": "source=marc",
//!   "chunkSize": 10
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;

/// The read-only configuration snapshot owned by one session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Back-end location and tenant.
    pub okapi: OkapiConfig,

    /// Default credentials, used when the init request carries none.
    #[serde(default)]
    pub login: LoginConfig,

    /// Map from BIB-1 use-attribute value (decimal string) to CQL index
    /// expression. Absent means attribute values name indexes directly.
    #[serde(default)]
    pub index_map: Option<HashMap<String, String>>,

    /// CQL fragment `and`-joined around every translated query.
    #[serde(default)]
    pub query_filter: Option<String>,

    /// Records fetched from the back end per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,

    /// Per-request timeout on back-end calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Sort-index modifier categories to suppress, keyed by CQL index name.
    #[serde(default)]
    pub omit_sort_index_modifiers: HashMap<String, Vec<SortModifier>>,
}

/// Location of the Okapi back end.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OkapiConfig {
    /// Base URL for login and, by default, searches.
    pub url: String,

    /// Distinct base URL for the search endpoint, if any.
    #[serde(default)]
    pub query_url: Option<String>,

    /// Tenant identifier, sent as `X-Okapi-tenant` on every request.
    pub tenant: String,
}

/// Default credentials for sessions that do not carry their own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginConfig {
    /// Default username.
    #[serde(default)]
    pub username: Option<String>,

    /// Default password.
    #[serde(default)]
    pub password: Option<String>,
}

/// A sort-modifier category that can be suppressed per index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortModifier {
    /// The `missing` modifier.
    Missing,
    /// The `relation` modifier.
    Relation,
    /// The `case` modifier.
    Case,
}

fn default_chunk_size() -> u32 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parses a configuration from raw JSON text, applying environment
    /// substitution before typed deserialization.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut value: Value = serde_json::from_str(raw)?;
        substitute_env(&mut value)?;
        let config: Config = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Base URL for the search endpoint: `queryUrl` when set, `url` otherwise.
    pub fn query_base_url(&self) -> &str {
        self.okapi.query_url.as_deref().unwrap_or(&self.okapi.url)
    }

    /// The query filter, with blank values treated as absent.
    pub fn query_filter(&self) -> Option<&str> {
        self.query_filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(())
    }
}

/// Rewrites every string value in the tree through [`expand_placeholders`].
fn substitute_env(value: &mut Value) -> Result<(), ConfigError> {
    match value {
        Value::String(s) => *s = expand_placeholders(s)?,
        Value::Array(items) => {
            for item in items {
                substitute_env(item)?;
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                substitute_env(item)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Expands `${NAME}` and `${NAME-DEFAULT}` placeholders against the process
/// environment. A `${` without a closing `}` passes through verbatim.
fn expand_placeholders(input: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };
        let body = &after[..end];
        let (name, default) = match body.split_once('-') {
            Some((name, default)) => (name, Some(default)),
            None => (body, None),
        };
        match std::env::var(name) {
            Ok(value) => out.push_str(&value),
            Err(_) => match default {
                Some(default) => out.push_str(default),
                None => {
                    return Err(ConfigError::UnresolvedVariable {
                        name: name.to_string(),
                    })
                }
            },
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(extra: &str) -> String {
        format!(
            r#"{{"okapi": {{"url": "http://localhost:9130", "tenant": "diku"}}{}}}"#,
            extra
        )
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = Config::from_json(&minimal("")).unwrap();
        assert_eq!(config.okapi.url, "http://localhost:9130");
        assert_eq!(config.okapi.tenant, "diku");
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.request_timeout, 30);
        assert!(config.login.username.is_none());
        assert!(config.index_map.is_none());
        assert!(config.query_filter().is_none());
        assert_eq!(config.query_base_url(), "http://localhost:9130");
    }

    #[test]
    fn test_full_config() {
        let raw = r#"{
            "okapi": {
                "url": "http://localhost:9130",
                "queryUrl": "http://search.localhost:9130",
                "tenant": "diku"
            },
            "login": {"username": "admin", "password": "secret"},
            "indexMap": {"4": "title"},
            "queryFilter": "source=marc",
            "chunkSize": 25,
            "requestTimeout": 5,
            "omitSortIndexModifiers": {"title": ["missing", "case"]}
        }"#;
        let config = Config::from_json(raw).unwrap();
        assert_eq!(config.query_base_url(), "http://search.localhost:9130");
        assert_eq!(config.login.username.as_deref(), Some("admin"));
        assert_eq!(
            config.index_map.as_ref().unwrap().get("4").unwrap(),
            "title"
        );
        assert_eq!(config.query_filter(), Some("source=marc"));
        assert_eq!(config.chunk_size, 25);
        assert_eq!(config.request_timeout, 5);
        assert_eq!(
            config.omit_sort_index_modifiers.get("title").unwrap(),
            &vec![SortModifier::Missing, SortModifier::Case]
        );
    }

    #[test]
    fn test_blank_query_filter_is_absent() {
        let config = Config::from_json(&minimal(r#", "queryFilter": "   ""#)).unwrap();
        assert!(config.query_filter().is_none());
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let err = Config::from_json(&minimal(r#", "chunkSize": 0"#)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChunkSize));
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("Z2FOLIO_TEST_TENANT", "acme");
        let raw = r#"{"okapi": {"url": "http://localhost:9130", "tenant": "${Z2FOLIO_TEST_TENANT}"}}"#;
        let config = Config::from_json(raw).unwrap();
        assert_eq!(config.okapi.tenant, "acme");
    }

    #[test]
    fn test_env_substitution_default_used_when_unset() {
        let raw =
            r#"{"okapi": {"url": "http://localhost:9130", "tenant": "${Z2FOLIO_TEST_UNSET-diku}"}}"#;
        let config = Config::from_json(raw).unwrap();
        assert_eq!(config.okapi.tenant, "diku");
    }

    #[test]
    fn test_env_substitution_prefers_variable_over_default() {
        std::env::set_var("Z2FOLIO_TEST_SET", "real");
        let raw =
            r#"{"okapi": {"url": "http://localhost:9130", "tenant": "${Z2FOLIO_TEST_SET-diku}"}}"#;
        let config = Config::from_json(raw).unwrap();
        assert_eq!(config.okapi.tenant, "real");
    }

    #[test]
    fn test_env_substitution_inside_larger_string() {
        std::env::set_var("Z2FOLIO_TEST_HOST", "folio.example.com");
        assert_eq!(
            expand_placeholders("https://${Z2FOLIO_TEST_HOST}:9130/path").unwrap(),
            "https://folio.example.com:9130/path"
        );
    }

    #[test]
    fn test_unresolved_variable_is_fatal() {
        let raw =
            r#"{"okapi": {"url": "http://localhost:9130", "tenant": "${Z2FOLIO_TEST_MISSING}"}}"#;
        let err = Config::from_json(raw).unwrap_err();
        match err {
            ConfigError::UnresolvedVariable { name } => {
                assert_eq!(name, "Z2FOLIO_TEST_MISSING")
            }
            other => panic!("expected UnresolvedVariable, got {other}"),
        }
    }

    #[test]
    fn test_unterminated_placeholder_passes_through() {
        assert_eq!(expand_placeholders("a${b").unwrap(), "a${b");
    }

    #[test]
    fn test_substitution_applies_to_nested_values() {
        std::env::set_var("Z2FOLIO_TEST_INDEX", "contributors");
        let raw = r#"{
            "okapi": {"url": "http://localhost:9130", "tenant": "diku"},
            "indexMap": {"1": "${Z2FOLIO_TEST_INDEX}"}
        }"#;
        let config = Config::from_json(raw).unwrap();
        assert_eq!(
            config.index_map.as_ref().unwrap().get("1").unwrap(),
            "contributors"
        );
    }
}
