use crate::config::provider::ProviderConfig;
use crate::core::json_parser::{parse_associated_services, parse_free_resources};
use crate::core::session::{Credentials, Session};
use crate::domain::model::{Bundle, Service, ServiceList};
use crate::domain::ports::UsageSource;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Authenticated retrieval: login, discover the account's lines, then fetch
/// each line's free resources.
pub struct PortalClient {
    config: ProviderConfig,
    credentials: Credentials,
}

impl PortalClient {
    pub fn new(config: ProviderConfig, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// Runs one retrieval. Lines are fetched one at a time in discovery order
    /// over a single session; the first failure aborts the run.
    pub async fn fetch_services(&self) -> Result<ServiceList> {
        let session = Session::login(&self.config, &self.credentials).await?;

        let msisdns = self.discover_services(&session).await?;
        tracing::info!("📱 Found {} associated services", msisdns.len());

        let total = msisdns.len();
        let mut services = Vec::with_capacity(total);
        for (index, msisdn) in msisdns.into_iter().enumerate() {
            tracing::debug!("Fetching free resources {}/{}: {}", index + 1, total, msisdn);
            let bundles = self.fetch_free_resources(&session, &msisdn).await?;
            services.push(Service::new(msisdn, bundles));
        }

        Ok(ServiceList(services))
    }

    async fn discover_services(&self, session: &Session) -> Result<Vec<String>> {
        let body = session
            .post_form(&self.config.associated_services_url, &[])
            .await?;
        parse_associated_services(&body, &self.config.success_message)
    }

    async fn fetch_free_resources(
        &self,
        session: &Session,
        msisdn: &str,
    ) -> Result<Vec<Bundle>> {
        let form = [
            ("msisdn", msisdn),
            ("apiVersion", self.config.api_version.as_str()),
        ];
        let body = session
            .post_form(&self.config.free_resources_url, &form)
            .await?;
        parse_free_resources(&body, &self.config.success_message)
    }
}

#[async_trait]
impl UsageSource for PortalClient {
    async fn fetch(&self) -> Result<ServiceList> {
        self.fetch_services().await
    }
}
