use reqwest::Error as ReqwestError;
use reqwest::StatusCode;
use serde_json::Error as SerdeError;
use serde_yaml::Error as YamlError;
use std::path::PathBuf;
use thiserror::Error;

/// Represents every condition that ends a hook invocation with a failure.
///
/// # Variants
///
/// - `ConfigMissing`: The credential file does not exist at the resolved location.
/// - `ConfigRead`: The credential file exists but could not be read.
/// - `ConfigParse`: The credential file is not a valid YAML/JSON mapping.
/// - `MissingCredential`: Neither a matching suffix nor the `default` slot is configured.
/// - `MissingArgument`: An actionable hook was called without one of its positional values.
/// - `InvalidApiUrl`: The API base URL cannot carry path segments.
/// - `ZoneNotFound`: No suffix of the domain is a zone the credential can access.
/// - `ApiRequest`: A read call against the provider returned a non-success status.
/// - `RecordMutation`: The rrset PATCH was rejected by the provider.
/// - `InconsistentRrsets`: The provider returned more than one rrset for one label.
/// - `RequestFailed`: Transport level failure of an HTTP request.
/// - `SerdeError`: JSON (de)serialization failure.
#[derive(Debug, Error)]
pub enum HookErrors {
    #[error("Config file missing or location wrong: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] YamlError),

    #[error("No credential slot for '{domain}' and no 'default' slot configured")]
    MissingCredential { domain: String },

    #[error("Hook '{hook}' requires the {argument} argument")]
    MissingArgument {
        hook: String,
        argument: &'static str,
    },

    #[error("API url '{0}' cannot be used as a base url")]
    InvalidApiUrl(String),

    #[error("No zone for domain '{domain}' found with credential slot '{slot}'")]
    ZoneNotFound { domain: String, slot: String },

    #[error("API request to {url} failed: HTTP {status} - {body}")]
    ApiRequest {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("{changetype} of TXT rrset '{name}' failed: HTTP {status} - {body}")]
    RecordMutation {
        name: String,
        changetype: String,
        status: StatusCode,
        body: String,
    },

    #[error("{count} rrsets returned for '{label}' in zone '{zone}', expected at most one")]
    InconsistentRrsets {
        label: String,
        zone: String,
        count: usize,
    },

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] ReqwestError),

    #[error("Serialization or deserialization error using Serde: {0}")]
    SerdeError(#[from] SerdeError),
}
