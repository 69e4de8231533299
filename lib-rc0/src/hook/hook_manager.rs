use super::config::HookSettings;
use super::dns_management::{clean_challenge, deploy_challenge};
use super::errors::HookErrors;
use super::http_request::Rc0Client;
use super::types::{Challenge, Invocation};
use super::zone::{credential_slot, find_hosted_zone, ZoneResolution};

pub struct HookManager<'a> {
    settings: &'a HookSettings,
}

impl<'a> HookManager<'a> {
    pub fn new(settings: &'a HookSettings) -> Self {
        HookManager { settings }
    }

    /// Runs one hook invocation to completion.
    ///
    /// # Returns
    /// `Ok(())` for a finished deploy/clean and for every ignored hook type.
    pub async fn run(&self, invocation: &Invocation) -> Result<(), HookErrors> {
        match invocation {
            Invocation::Deploy(challenge) => self.deploy(challenge).await,
            Invocation::Clean(challenge) => self.clean(challenge).await,
            Invocation::Ignored(hook_type) => {
                tracing::debug!("Ignoring hook {:?}", hook_type);
                Ok(())
            }
        }
    }

    /// Finds the credential slot and the hosted zone for `domain` and
    /// returns a client bound to that slot's token.
    pub async fn resolve(&self, domain: &str) -> Result<(Rc0Client, ZoneResolution), HookErrors> {
        let (slot, credential) = credential_slot(domain, &self.settings.credentials)?;
        let client = Rc0Client::new(self.settings.api_url.clone(), &credential.bearer);
        let zone = match find_hosted_zone(&client, domain, slot).await {
            Ok(zone) => zone,
            Err(err) => {
                tracing::error!(
                    "No Domain: {} in Rcode0 with API-Key for Slot ({}) found",
                    domain,
                    slot
                );
                return Err(err);
            }
        };
        Ok((
            client,
            ZoneResolution {
                slot: slot.to_owned(),
                zone,
            },
        ))
    }

    async fn deploy(&self, challenge: &Challenge) -> Result<(), HookErrors> {
        let (client, resolution) = self.resolve(&challenge.domain).await?;
        deploy_challenge(
            &client,
            &resolution.zone,
            &challenge.domain,
            &challenge.validation,
            self.settings.ttl,
            self.settings.propagation_wait,
        )
        .await
    }

    async fn clean(&self, challenge: &Challenge) -> Result<(), HookErrors> {
        let (client, resolution) = self.resolve(&challenge.domain).await?;
        clean_challenge(
            &client,
            &resolution.zone,
            &challenge.domain,
            self.settings.ttl,
        )
        .await
    }
}
