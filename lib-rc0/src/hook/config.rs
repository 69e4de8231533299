use super::errors::HookErrors;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://my.rcodezero.at/api/v1/acme";
pub const DEFAULT_TTL: u32 = 600;
pub const DEFAULT_PROPAGATION_WAIT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONFIG_FILE: &str = "rc0_conf.yaml";
pub const DEFAULT_SLOT: &str = "default";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Credential {
    #[serde(rename = "Bearer")]
    pub bearer: String,
}

/// Domain suffix (or `default`) to API credential.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CredentialMap(BTreeMap<String, Credential>);

impl CredentialMap {
    /// Loads the mapping from a YAML or JSON document on disk.
    ///
    /// # Errors
    ///
    /// `ConfigMissing` if nothing exists at `path`, `ConfigRead` if it cannot
    /// be read and `ConfigParse` if the content is not a mapping of slots.
    pub fn from_path(path: &Path) -> Result<Self, HookErrors> {
        if !path.exists() {
            return Err(HookErrors::ConfigMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| HookErrors::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_yaml(&content)?;
        tracing::debug!(
            path = %path.display(),
            slots = ?map.slots().collect::<Vec<_>>(),
            "Loaded credential config"
        );
        Ok(map)
    }

    pub fn from_yaml(content: &str) -> Result<Self, HookErrors> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn get(&self, slot: &str) -> Option<&Credential> {
        self.0.get(slot)
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.0.contains_key(slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Credential)> for CredentialMap {
    fn from_iter<T: IntoIterator<Item = (String, Credential)>>(iter: T) -> Self {
        CredentialMap(iter.into_iter().collect())
    }
}

/// Location of the credential file: the explicit path if one was given,
/// otherwise `rc0_conf.yaml` beside the running executable.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    tracing::debug!("No config file location given, falling back to {}", DEFAULT_CONFIG_FILE);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.canonicalize().ok())
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CONFIG_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Everything an invocation needs, built once at startup.
#[derive(Debug, Clone)]
pub struct HookSettings {
    pub api_url: Url,
    pub ttl: u32,
    pub propagation_wait: Duration,
    pub credentials: CredentialMap,
}

impl HookSettings {
    /// # Errors
    ///
    /// `InvalidApiUrl` if `api_url` cannot have path segments appended.
    pub fn new(
        api_url: Url,
        ttl: u32,
        propagation_wait: Duration,
        credentials: CredentialMap,
    ) -> Result<Self, HookErrors> {
        if api_url.cannot_be_a_base() {
            return Err(HookErrors::InvalidApiUrl(api_url.to_string()));
        }
        Ok(HookSettings {
            api_url,
            ttl,
            propagation_wait,
            credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
default:
  Bearer: T0
example.com:
  Bearer: T1
"#;

    #[test]
    fn test_parse_yaml_config() {
        let map = CredentialMap::from_yaml(YAML).unwrap();
        assert_eq!(map.get("default").unwrap().bearer, "T0");
        assert_eq!(map.get("example.com").unwrap().bearer, "T1");
        assert_eq!(map.slots().count(), 2);
    }

    #[test]
    fn test_parse_json_config() {
        let json = r#"{"example.com": {"Bearer": "T1"}, "default": {"Bearer": "T0"}}"#;
        let map = CredentialMap::from_yaml(json).unwrap();
        assert!(map.contains("example.com"));
        assert!(map.contains("default"));
    }

    #[test]
    fn test_config_without_bearer_is_rejected() {
        let err = CredentialMap::from_yaml("default:\n  token: T0\n").unwrap_err();
        assert!(matches!(err, HookErrors::ConfigParse(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();
        let map = CredentialMap::from_path(file.path()).unwrap();
        assert_eq!(map.get("default").unwrap().bearer, "T0");
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rc0_conf.yaml");
        let err = CredentialMap::from_path(&path).unwrap_err();
        assert!(matches!(err, HookErrors::ConfigMissing(p) if p == path));
    }

    #[test]
    fn test_resolve_config_path() {
        let explicit = PathBuf::from("/etc/rc0/conf.yaml");
        assert_eq!(resolve_config_path(Some(explicit.clone())), explicit);
        assert!(resolve_config_path(None).ends_with(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_settings_reject_non_base_url() {
        let url = Url::parse("mailto:ops@example.com").unwrap();
        let err = HookSettings::new(url, DEFAULT_TTL, Duration::ZERO, CredentialMap::default())
            .unwrap_err();
        assert!(matches!(err, HookErrors::InvalidApiUrl(_)));
    }
}
