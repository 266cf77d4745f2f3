//! Harness configuration
//!
//! Built once from defaults, an optional config file, and environment
//! variables, then passed by reference to every component.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scenario::ScenarioSet;

pub const DEFAULT_BASE_URL: &str = "https://trim-manager.appliedbellcurve.com";

/// Immutable run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Base URL of the deployment under test
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Marks the run as a test run; forwarded for logging only
    pub testing: bool,

    /// Sent as `Authorization: Bearer <token>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Sent as `X-API-Key`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    pub debug: bool,

    pub log_level: String,

    /// Extra request headers
    pub headers: BTreeMap<String, String>,

    /// Narrowed accepted sets for named scenarios
    pub status_overrides: Vec<StatusOverride>,
}

/// Tighten one scenario's accepted status set.
///
/// ```toml
/// [[status_overrides]]
/// scenario = "fetch_campaign_plan_lookup"
/// statuses = [200]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverride {
    pub scenario: String,
    pub statuses: Vec<u16>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            testing: true,
            api_token: None,
            api_key: None,
            debug: false,
            log_level: "INFO".to_string(),
            headers: BTreeMap::new(),
            status_overrides: Vec::new(),
        }
    }
}

impl HarnessConfig {
    /// Load config from file; format chosen by extension (json, yaml/yml, else toml)
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed, or sets a zero timeout
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            Some("yaml" | "yml") => {
                serde_yml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            _ => toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?,
        };
        parse_timeout("timeout_secs", &config.timeout_secs.to_string())?;
        Ok(config)
    }

    /// Load the first default config file found in `dir`, or defaults
    ///
    /// # Errors
    ///
    /// Returns error if a candidate exists but cannot be read or parsed
    pub fn load_default_in(dir: &Path) -> Result<Self, ConfigError> {
        let candidates = [
            ".trimcheck.toml",
            ".trimcheck.json",
            ".trimcheck.yaml",
            "trimcheck.toml",
        ];

        for name in candidates {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load from the current directory
    ///
    /// # Errors
    ///
    /// See [`HarnessConfig::load_default_in`]
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_default_in(Path::new("."))
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unparsable or zero timeout
    /// and for booleans outside `true/false/1/0/yes/no`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("API_BASE_URL") {
            self.base_url = url;
        }
        if let Some(raw) = lookup("API_TIMEOUT") {
            self.timeout_secs = parse_timeout("API_TIMEOUT", &raw)?;
        }
        if let Some(raw) = lookup("TESTING") {
            self.testing = parse_bool("TESTING", &raw)?;
        }
        if let Some(token) = lookup("API_TOKEN").filter(|t| !t.is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(key) = lookup("API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(raw) = lookup("DEBUG") {
            self.debug = parse_bool("DEBUG", &raw)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(self)
    }

    /// Tracing filter directive implied by `debug` and `log_level`
    #[must_use]
    pub fn log_filter(&self) -> String {
        if self.debug {
            "debug".to_string()
        } else {
            self.log_level.to_lowercase()
        }
    }

    /// Apply `status_overrides` to a validated scenario set.
    ///
    /// # Errors
    ///
    /// Rejects unknown scenarios and any override that is empty or not a
    /// subset of the built-in accepted set.
    pub fn apply_overrides(&self, set: &mut ScenarioSet) -> Result<(), ConfigError> {
        for o in &self.status_overrides {
            let Some(scenario) = set.get_mut(&o.scenario) else {
                return Err(ConfigError::UnknownScenario(o.scenario.clone()));
            };
            let narrowed: BTreeSet<u16> = o.statuses.iter().copied().collect();
            if narrowed.is_empty() || !narrowed.is_subset(&scenario.expected) {
                return Err(ConfigError::LoosenedStatuses {
                    scenario: o.scenario.clone(),
                    allowed: scenario.expected_display(),
                });
            }
            tracing::debug!(
                scenario = %o.scenario,
                from = %scenario.expected_display(),
                statuses = ?narrowed,
                "narrowed accepted statuses"
            );
            scenario.expected = narrowed;
        }
        Ok(())
    }

    /// Example config written by `trimcheck init`
    pub fn example() -> &'static str {
        r#"# trimcheck configuration

# Deployment under test (env: API_BASE_URL)
base_url = "https://trim-manager.appliedbellcurve.com"

# Per-request timeout in seconds (env: API_TIMEOUT)
timeout_secs = 30

# env: TESTING, DEBUG, LOG_LEVEL
testing = true
debug = false
log_level = "INFO"

# Credentials (prefer env: API_TOKEN, API_KEY)
# api_token = "your-token-here"
# api_key = "your-api-key"

# Extra request headers
[headers]
# X-Client-Name = "default_client"

# Narrow a liveness scenario's accepted statuses once the backend is stable.
# Overrides may only remove statuses, never add them.
# [[status_overrides]]
# scenario = "fetch_campaign_plan_lookup"
# statuses = [200]
"#
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn parse_timeout(var: &str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
    #[error("Override for {scenario} must be a non-empty subset of {allowed}")]
    LoosenedStatuses { scenario: String, allowed: String },
    #[error("Override names unknown scenario: {0}")]
    UnknownScenario(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.testing);
        assert!(!config.debug);
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn parse_toml() {
        let toml = r#"
base_url = "http://localhost:8000"
timeout_secs = 5

[headers]
X-Client-Name = "acme"

[[status_overrides]]
scenario = "health_check"
statuses = [200]
"#;
        let config: HarnessConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.testing);
        assert_eq!(config.headers.get("X-Client-Name").map(String::as_str), Some("acme"));
        assert_eq!(config.status_overrides.len(), 1);
    }

    // --- file loading ---

    #[test]
    fn load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("c.json");
        std::fs::write(&json, r#"{"base_url":"http://j","timeout_secs":7}"#).unwrap();
        let c = HarnessConfig::load(&json).unwrap();
        assert_eq!((c.base_url.as_str(), c.timeout_secs), ("http://j", 7));

        let yaml = dir.path().join("c.yaml");
        std::fs::write(&yaml, "base_url: http://y\ndebug: true\n").unwrap();
        let c = HarnessConfig::load(&yaml).unwrap();
        assert_eq!(c.base_url, "http://y");
        assert!(c.debug);

        let toml = dir.path().join("c.toml");
        std::fs::write(&toml, "base_url = \"http://t\"\n").unwrap();
        assert_eq!(HarnessConfig::load(&toml).unwrap().base_url, "http://t");
    }

    #[test]
    fn load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            HarnessConfig::load(&missing),
            Err(ConfigError::Io(p, _)) if p == missing
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "timeout_secs = \"soon\"").unwrap();
        assert!(matches!(HarnessConfig::load(&bad), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let zero = dir.path().join("zero.toml");
        std::fs::write(&zero, "timeout_secs = 0").unwrap();
        assert!(matches!(
            HarnessConfig::load(&zero),
            Err(ConfigError::InvalidValue { var, value }) if var == "timeout_secs" && value == "0"
        ));

        let zero_json = dir.path().join("zero.json");
        std::fs::write(&zero_json, r#"{"timeout_secs":0}"#).unwrap();
        assert!(matches!(
            HarnessConfig::load(&zero_json),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn load_default_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let c = HarnessConfig::load_default_in(dir.path()).unwrap();
        assert_eq!(c.base_url, DEFAULT_BASE_URL);

        std::fs::write(dir.path().join("trimcheck.toml"), "base_url = \"http://late\"").unwrap();
        std::fs::write(dir.path().join(".trimcheck.json"), r#"{"base_url":"http://early"}"#)
            .unwrap();
        let c = HarnessConfig::load_default_in(dir.path()).unwrap();
        assert_eq!(c.base_url, "http://early");
    }

    #[test]
    fn example_parses() {
        let c: HarnessConfig = toml::from_str(HarnessConfig::example()).unwrap();
        assert_eq!(c.base_url, DEFAULT_BASE_URL);
        assert!(c.status_overrides.is_empty());
    }

    // --- environment ---

    #[test]
    fn env_overrides_file_values() {
        let c = HarnessConfig::default()
            .with_env(env(&[
                ("API_BASE_URL", "http://127.0.0.1:9000"),
                ("API_TIMEOUT", "12"),
                ("TESTING", "no"),
                ("API_TOKEN", "tok"),
                ("API_KEY", ""),
                ("DEBUG", "YES"),
                ("LOG_LEVEL", "WARNING"),
            ]))
            .unwrap();
        assert_eq!(c.base_url, "http://127.0.0.1:9000");
        assert_eq!(c.timeout_secs, 12);
        assert!(!c.testing);
        assert_eq!(c.api_token.as_deref(), Some("tok"));
        assert_eq!(c.api_key, None);
        assert!(c.debug);
        assert_eq!(c.log_filter(), "debug");
    }

    #[test]
    fn env_absent_keeps_defaults() {
        let c = HarnessConfig::default().with_env(|_| None).unwrap();
        assert_eq!(c.timeout_secs, 30);
        assert_eq!(c.log_level, "INFO");
    }

    #[test]
    fn env_rejects_bad_values() {
        for (var, value) in [("API_TIMEOUT", "0"), ("API_TIMEOUT", "fast"), ("DEBUG", "maybe")] {
            let err = HarnessConfig::default()
                .with_env(env(&[(var, value)]))
                .unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { var: ref v, .. } if v == var),
                "{var}={value}"
            );
        }
    }

    // --- status overrides ---

    fn with_override(scenario: &str, statuses: &[u16]) -> HarnessConfig {
        HarnessConfig {
            status_overrides: vec![StatusOverride {
                scenario: scenario.to_string(),
                statuses: statuses.to_vec(),
            }],
            ..HarnessConfig::default()
        }
    }

    fn broad_scenario(set: &ScenarioSet) -> String {
        set.scenarios()
            .iter()
            .find(|s| s.expected.len() >= 3)
            .map(|s| s.name.clone())
            .unwrap()
    }

    #[test]
    fn override_narrows() {
        let mut set = ScenarioSet::builtin().unwrap();
        let name = broad_scenario(&set);
        with_override(&name, &[200]).apply_overrides(&mut set).unwrap();
        assert_eq!(set.get(&name).unwrap().expected, BTreeSet::from([200]));
    }

    #[test]
    fn override_cannot_loosen() {
        let mut set = ScenarioSet::builtin().unwrap();
        let err = with_override("health_check", &[200, 500])
            .apply_overrides(&mut set)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Override for health_check must be a non-empty subset of {200}"
        );

        let err = with_override("health_check", &[])
            .apply_overrides(&mut set)
            .unwrap_err();
        assert!(matches!(err, ConfigError::LoosenedStatuses { .. }));
    }

    #[test]
    fn override_unknown_scenario() {
        let mut set = ScenarioSet::builtin().unwrap();
        let err = with_override("no_such", &[200])
            .apply_overrides(&mut set)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownScenario(n) if n == "no_such"));
    }
}
