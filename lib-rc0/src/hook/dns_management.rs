use super::errors::HookErrors;
use super::http_request::Rc0Client;
use super::types::{ChangeType, Record, Rrset, RrsetPatch};
use super::zone::{challenge_label, query_label};
use reqwest::StatusCode;
use std::time::Duration;

const TXT: &str = "TXT";

/// Collects every TXT rrset named `label` in `zone`, walking all pages.
pub async fn get_txt_rrsets(
    client: &Rc0Client,
    zone: &str,
    label: &str,
) -> Result<Vec<Rrset>, HookErrors> {
    let mut result = Vec::new();
    let mut page = 1;
    loop {
        let rrset_page = client.rrset_page(zone, label, page).await?;
        tracing::trace!(zone = %zone, label = %label, page, last_page = rrset_page.last_page, "Fetched rrset page");
        result.extend(rrset_page.data);
        if page >= rrset_page.last_page {
            break;
        }
        page += 1;
    }
    Ok(result)
}

/// Decides between `add` and `update` for a new challenge value.
///
/// An existing rrset keeps all of its records; the new value goes first.
pub fn deploy_patch(
    name: String,
    ttl: u32,
    validation: &str,
    existing: &[Rrset],
    zone: &str,
) -> Result<RrsetPatch, HookErrors> {
    let mut records = vec![Record::new(validation)];
    let changetype = match existing {
        [] => {
            tracing::debug!("No existing TXT record - continuing with add");
            ChangeType::Add
        }
        [rrset] => {
            tracing::debug!(
                "Existing TXT record found for {} in {} - updating instead of adding",
                name,
                zone
            );
            records.extend(
                rrset
                    .records
                    .iter()
                    .filter(|record| record.content != validation)
                    .cloned(),
            );
            ChangeType::Update
        }
        _ => {
            return Err(HookErrors::InconsistentRrsets {
                label: name,
                zone: zone.to_owned(),
                count: existing.len(),
            })
        }
    };
    Ok(RrsetPatch {
        name,
        rtype: TXT,
        ttl,
        changetype,
        records: Some(records),
    })
}

pub fn clean_patch(name: String, ttl: u32) -> RrsetPatch {
    RrsetPatch {
        name,
        rtype: TXT,
        ttl,
        changetype: ChangeType::Delete,
        records: None,
    }
}

/// Places `validation` under `_acme-challenge.<domain>` and waits for
/// `propagation_wait` once the provider accepted it.
pub async fn deploy_challenge(
    client: &Rc0Client,
    zone: &str,
    domain: &str,
    validation: &str,
    ttl: u32,
    propagation_wait: Duration,
) -> Result<(), HookErrors> {
    let label = challenge_label(domain);
    let querylabel = query_label(&label, zone);
    tracing::debug!("Searching ({}) in zone ({})", querylabel, zone);

    let rrsets = get_txt_rrsets(client, zone, &querylabel).await?;
    let patch = deploy_patch(format!("{}.", label), ttl, validation, &rrsets, zone)?;

    tracing::debug!("Deploying ({}.) in zone ({})", label, zone);
    let response = client.patch_rrsets(zone, std::slice::from_ref(&patch)).await?;
    if response.status() != StatusCode::OK {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            "Adding TXT Record {} to zone {} failed because: {} : Records: {} - rrset: {:?}",
            label,
            zone,
            body,
            serde_json::to_string(&patch.records)?,
            rrsets
        );
        return Err(HookErrors::RecordMutation {
            name: patch.name,
            changetype: patch.changetype.to_string(),
            status,
            body,
        });
    }

    tracing::info!(
        "Adding TXT Record {} to zone {} was successful - waiting {} seconds before continuing",
        label,
        zone,
        propagation_wait.as_secs()
    );
    tokio::time::sleep(propagation_wait).await;
    Ok(())
}

/// Removes the whole `_acme-challenge.<domain>` rrset. A missing rrset is
/// fine: with wildcard orders the first cleanup already removed it.
pub async fn clean_challenge(
    client: &Rc0Client,
    zone: &str,
    domain: &str,
    ttl: u32,
) -> Result<(), HookErrors> {
    let label = challenge_label(domain);
    let querylabel = query_label(&label, zone);
    tracing::debug!("Searching ({}) in zone ({})", querylabel, zone);

    let rrsets = get_txt_rrsets(client, zone, &querylabel).await?;
    if rrsets.is_empty() {
        tracing::info!(
            "No TXT record found for cleaning of {} in {} - expected for wildcards, the first delete cleans all _acme-challenges",
            label,
            zone
        );
        return Ok(());
    }

    tracing::debug!("Cleaning ({}.) in zone ({})", label, zone);
    let patch = clean_patch(format!("{}.", label), ttl);
    let response = client.patch_rrsets(zone, std::slice::from_ref(&patch)).await?;
    if response.status() != StatusCode::OK {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            "Cleaning of TXT Record {} in zone {} failed because: {}",
            label,
            zone,
            body
        );
        return Err(HookErrors::RecordMutation {
            name: patch.name,
            changetype: patch.changetype.to_string(),
            status,
            body,
        });
    }

    tracing::info!(
        "Cleaning TXT Record {} in zone {} was successful",
        label,
        zone
    );
    Ok(())
}
