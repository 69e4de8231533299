//! Credential slot and hosted zone lookup for a challenge domain.

use super::config::{Credential, CredentialMap, DEFAULT_SLOT};
use super::errors::HookErrors;
use super::http_request::Rc0Client;

pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

/// Outcome of resolving a domain against the config and the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneResolution {
    pub slot: String,
    pub zone: String,
}

/// Every suffix of `domain` on label boundaries, longest first.
///
/// `a.b.c` yields `a.b.c`, `b.c`, `c`.
pub fn domain_suffixes(domain: &str) -> impl Iterator<Item = &str> {
    std::iter::once(domain).chain(
        domain
            .match_indices('.')
            .map(move |(pos, _)| &domain[pos + 1..]),
    )
}

/// Picks the most specific configured slot for `domain`, else `default`.
///
/// # Errors
///
/// `MissingCredential` when no suffix matches and `default` is absent too.
pub fn credential_slot<'a>(
    domain: &'a str,
    credentials: &'a CredentialMap,
) -> Result<(&'a str, &'a Credential), HookErrors> {
    let slot = domain_suffixes(domain)
        .find(|suffix| credentials.contains(suffix))
        .unwrap_or(DEFAULT_SLOT);
    tracing::debug!(domain = %domain, slot = %slot, "Selected credential slot");
    credentials
        .get(slot)
        .map(|credential| (slot, credential))
        .ok_or_else(|| HookErrors::MissingCredential {
            domain: domain.to_owned(),
        })
}

/// Asks the provider for each suffix, longest first, and returns the first
/// zone it reports as hosted.
///
/// # Errors
///
/// `ZoneNotFound` when none of the suffixes is accessible with the client's
/// token; transport failures are passed through.
pub async fn find_hosted_zone(
    client: &Rc0Client,
    domain: &str,
    slot: &str,
) -> Result<String, HookErrors> {
    for suffix in domain_suffixes(domain) {
        if client.zone_exists(suffix).await? {
            tracing::info!(
                "Domain: {} found as parent zone with API-Key ({}) to work in - continuing",
                suffix,
                slot
            );
            return Ok(suffix.to_owned());
        }
    }
    Err(HookErrors::ZoneNotFound {
        domain: domain.to_owned(),
        slot: slot.to_owned(),
    })
}

/// `_acme-challenge.<domain>`
pub fn challenge_label(domain: &str) -> String {
    format!("{}.{}", ACME_CHALLENGE_LABEL, domain)
}

/// The label relative to `zone`, as expected by the rrset listing filter.
pub fn query_label(label: &str, zone: &str) -> String {
    label
        .strip_suffix(zone)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(label)
        .to_owned()
}
