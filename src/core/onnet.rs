//! Unauthenticated retrieval over the on-net portal.
//!
//! Only works from a connection on the provider's own mobile network, and the
//! mobile number must be that of the SIM in use.

use crate::config::provider::ProviderConfig;
use crate::core::legacy_parser::parse_legacy;
use crate::core::session::Session;
use crate::domain::model::{BundleList, Service, ServiceList};
use crate::domain::ports::UsageSource;
use crate::utils::error::{Result, UsageError};
use async_trait::async_trait;

pub struct OnNetClient {
    config: ProviderConfig,
    mobile_number: String,
}

impl OnNetClient {
    pub fn new(config: ProviderConfig, mobile_number: impl Into<String>) -> Self {
        Self {
            config,
            mobile_number: mobile_number.into(),
        }
    }

    pub async fn fetch_bundles(&self) -> Result<BundleList> {
        let session = Session::new(&self.config)?;

        tracing::info!("📡 Requesting on-net context from {}", self.config.onnet_home_url);
        session.get(&self.config.onnet_home_url).await?;

        let body = session
            .post_text(&self.config.onnet_bundle_url, &dwr_request_body(&self.mobile_number))
            .await?;
        if body.is_empty() {
            return Err(UsageError::EmptyResponse {
                url: self.config.onnet_bundle_url.clone(),
            });
        }

        parse_legacy(&body)
    }
}

/// DWR plain-call body for `mobileDataServiceWrapper.getFreeResources`.
fn dwr_request_body(mobile_number: &str) -> String {
    [
        "callCount=1".to_string(),
        "scriptSessionId=".to_string(),
        "c0-scriptName=mobileDataServiceWrapper".to_string(),
        "c0-methodName=getFreeResources".to_string(),
        "c0-id=0".to_string(),
        format!("c0-param0=string:{}", mobile_number),
        "batchId=0".to_string(),
    ]
    .join("\n")
}

#[async_trait]
impl UsageSource for OnNetClient {
    async fn fetch(&self) -> Result<ServiceList> {
        let bundles = self.fetch_bundles().await?;
        Ok(ServiceList(vec![Service::new(self.mobile_number.clone(), bundles)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dwr_request_body() {
        let body = dwr_request_body("0821234567");
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "callCount=1");
        assert_eq!(lines[5], "c0-param0=string:0821234567");
        assert_eq!(lines[6], "batchId=0");
        assert!(!body.ends_with('\n'));
    }
}
