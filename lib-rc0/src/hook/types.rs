use super::errors::HookErrors;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Display;

/// Lifecycle events a dehydrated-style client passes as first argument.
///
/// Only `DeployChallenge` and `CleanChallenge` lead to any work; every other
/// event, known or not, is acknowledged with a successful exit.
#[derive(Debug, PartialEq, Clone)]
pub enum HookType {
    DeployChallenge,
    CleanChallenge,
    StartupHook,
    InvalidChallenge,
    DeployCert,
    Unknown(String),
}

impl From<&str> for HookType {
    fn from(hook_type: &str) -> Self {
        match hook_type {
            "deploy_challenge" => HookType::DeployChallenge,
            "clean_challenge" => HookType::CleanChallenge,
            "startup_hook" => HookType::StartupHook,
            "invalid_challenge" => HookType::InvalidChallenge,
            "deploy_cert" => HookType::DeployCert,
            other => HookType::Unknown(other.to_owned()),
        }
    }
}

impl Display for HookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookType::DeployChallenge => write!(f, "deploy_challenge"),
            HookType::CleanChallenge => write!(f, "clean_challenge"),
            HookType::StartupHook => write!(f, "startup_hook"),
            HookType::InvalidChallenge => write!(f, "invalid_challenge"),
            HookType::DeployCert => write!(f, "deploy_cert"),
            HookType::Unknown(other) => write!(f, "{}", other),
        }
    }
}

/// Values handed to an actionable hook.
#[derive(Debug, Clone, PartialEq)]
pub struct Challenge {
    pub domain: String,
    pub token: String,
    pub validation: String,
}

/// What a single process invocation has been asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Deploy(Challenge),
    Clean(Challenge),
    Ignored(Option<HookType>),
}

impl Invocation {
    /// Builds the invocation from the positional values of the command line.
    ///
    /// `extra` holds everything after the domain: the validation token file
    /// name and the TXT value. Anything beyond those two is ignored.
    ///
    /// # Errors
    ///
    /// `MissingArgument` when an actionable hook lacks its domain, token or
    /// challenge value.
    pub fn parse(
        hook_type: Option<&str>,
        domain: Option<&str>,
        extra: &[String],
    ) -> Result<Self, HookErrors> {
        let Some(hook_type) = hook_type.map(HookType::from) else {
            return Ok(Invocation::Ignored(None));
        };
        if !matches!(
            hook_type,
            HookType::DeployChallenge | HookType::CleanChallenge
        ) {
            return Ok(Invocation::Ignored(Some(hook_type)));
        }

        let missing = |argument| HookErrors::MissingArgument {
            hook: hook_type.to_string(),
            argument,
        };
        let domain = domain
            .map(normalize_domain)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| missing("domain"))?;
        let token = extra.first().ok_or_else(|| missing("token"))?;
        let validation = extra.get(1).ok_or_else(|| missing("challenge"))?;

        let challenge = Challenge {
            domain: domain.to_owned(),
            token: token.clone(),
            validation: validation.clone(),
        };
        Ok(match hook_type {
            HookType::DeployChallenge => Invocation::Deploy(challenge),
            _ => Invocation::Clean(challenge),
        })
    }
}

/// Strips a wildcard prefix and a trailing root dot.
pub fn normalize_domain(domain: &str) -> &str {
    let domain = domain.strip_prefix("*.").unwrap_or(domain);
    domain.strip_suffix('.').unwrap_or(domain)
}

/// Mutation verbs accepted by the rrsets PATCH endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Add,
    Update,
    Delete,
}

impl Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Add => write!(f, "add"),
            ChangeType::Update => write!(f, "update"),
            ChangeType::Delete => write!(f, "delete"),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub content: String,
    pub disabled: Option<bool>,
}

impl Record {
    pub fn new(content: impl Into<String>) -> Self {
        Record {
            content: content.into(),
            disabled: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rrset {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub records: Vec<Record>,
}

/// One page of `GET /zones/{zone}/rrsets`.
#[derive(Debug, Deserialize)]
pub(crate) struct RrsetPage {
    #[serde(default)]
    pub(crate) data: Vec<Rrset>,
    #[serde(default = "first_page")]
    pub(crate) last_page: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub(crate) struct RrsetQuery<'a> {
    pub(crate) types: &'static str,
    pub(crate) names: &'a str,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RrsetPatch {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: &'static str,
    pub ttl: u32,
    pub changetype: ChangeType,
    pub records: Option<Vec<Record>>,
}
