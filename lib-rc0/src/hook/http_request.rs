use super::errors::HookErrors;
use super::types::{RrsetPage, RrsetPatch, RrsetQuery};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use url::Url;

const APPLICATION_JSON: &str = "application/json";
pub const PAGE_SIZE: u32 = 50;

/// Thin wrapper over the ACME DNS endpoints, bound to one bearer token.
#[derive(Debug, Clone)]
pub struct Rc0Client {
    client: Client,
    api_url: Url,
    token: String,
}

impl Rc0Client {
    pub fn new(api_url: Url, token: &str) -> Self {
        Rc0Client {
            client: Client::new(),
            api_url,
            token: token.to_owned(),
        }
    }

    /// `{api_url}/zones/{zone}` plus any further segments.
    fn endpoint(&self, zone: &str, rest: &[&str]) -> Result<Url, HookErrors> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| HookErrors::InvalidApiUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .push("zones")
            .push(zone)
            .extend(rest);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, APPLICATION_JSON)
    }

    /// Whether `zone` exists and is accessible with this token.
    pub async fn zone_exists(&self, zone: &str) -> Result<bool, HookErrors> {
        let url = self.endpoint(zone, &[])?;
        let response = self.authorized(self.client.get(url)).send().await?;
        tracing::trace!(zone = %zone, status = %response.status(), "Zone lookup");
        Ok(response.status() == StatusCode::OK)
    }

    pub(crate) async fn rrset_page(
        &self,
        zone: &str,
        label: &str,
        page: u32,
    ) -> Result<RrsetPage, HookErrors> {
        let url = self.endpoint(zone, &["rrsets"])?;
        let query = RrsetQuery {
            types: "TXT",
            names: label,
            page,
            page_size: PAGE_SIZE,
        };
        let response = self
            .authorized(self.client.get(url.clone()))
            .query(&query)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HookErrors::ApiRequest {
                url: url.to_string(),
                status,
                body,
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn patch_rrsets(
        &self,
        zone: &str,
        patch: &[RrsetPatch],
    ) -> Result<Response, HookErrors> {
        let url = self.endpoint(zone, &["rrsets"])?;
        Ok(self
            .authorized(self.client.patch(url))
            .json(patch)
            .send()
            .await?)
    }
}
