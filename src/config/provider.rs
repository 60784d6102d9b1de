use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::{Deserialize, Serialize};

/// Endpoints and fixed request parameters of the provider's portals.
///
/// `Default` holds the production values. Every field can be overridden from
/// the `[provider]` table of the config file, and tests point all URLs at a
/// mock server with [`ProviderConfig::with_base_url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub home_url: String,
    pub login_url: String,
    pub associated_services_url: String,
    pub free_resources_url: String,

    /// Fixed parameters the login form must carry alongside the credentials.
    pub challenge_url: String,
    pub locale: String,
    pub resource_url: String,

    pub api_version: String,
    pub success_message: String,

    pub onnet_home_url: String,
    pub onnet_bundle_url: String,

    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            home_url: "https://secure.telkom.co.za/today/".to_string(),
            login_url: "https://secure.telkom.co.za/sso/SSOLogin".to_string(),
            associated_services_url:
                "https://secure.telkom.co.za/today/rest/customer/associatedServices".to_string(),
            free_resources_url: "https://secure.telkom.co.za/today/rest/mobile/freeResources"
                .to_string(),
            challenge_url: "https://secure.telkom.co.za/sso/SSOLogin".to_string(),
            locale: "en_ZA".to_string(),
            resource_url: "https://secure.telkom.co.za/today/".to_string(),
            api_version: "2".to_string(),
            success_message: "SUCCESS".to_string(),
            onnet_home_url: "https://onnetsecure.telkom.co.za/onnet/public/mobileData?sid="
                .to_string(),
            onnet_bundle_url: "https://onnetsecure.telkom.co.za/onnet/public/dwr/call/plaincall/mobileDataServiceWrapper.getFreeResources.dwr".to_string(),
            timeout_seconds: 30,
            user_agent: concat!("telkom-bytes/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProviderConfig {
    /// Same paths as production, served from `base_url` instead.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            home_url: format!("{}/today/", base),
            login_url: format!("{}/sso/SSOLogin", base),
            associated_services_url: format!("{}/today/rest/customer/associatedServices", base),
            free_resources_url: format!("{}/today/rest/mobile/freeResources", base),
            challenge_url: format!("{}/sso/SSOLogin", base),
            resource_url: format!("{}/today/", base),
            onnet_home_url: format!("{}/onnet/public/mobileData?sid=", base),
            onnet_bundle_url: format!(
                "{}/onnet/public/dwr/call/plaincall/mobileDataServiceWrapper.getFreeResources.dwr",
                base
            ),
            ..Self::default()
        }
    }

    /// Login form body, credentials first.
    pub fn login_form<'a>(&'a self, username: &'a str, password: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("username", username),
            ("password", password),
            ("challengeUrl", self.challenge_url.as_str()),
            ("locale", self.locale.as_str()),
            ("resourceUrl", self.resource_url.as_str()),
        ]
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<()> {
        validate_url("provider.home_url", &self.home_url)?;
        validate_url("provider.login_url", &self.login_url)?;
        validate_url("provider.associated_services_url", &self.associated_services_url)?;
        validate_url("provider.free_resources_url", &self.free_resources_url)?;
        validate_url("provider.onnet_home_url", &self.onnet_home_url)?;
        validate_url("provider.onnet_bundle_url", &self.onnet_bundle_url)?;
        validate_non_empty_string("provider.success_message", &self.success_message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ProviderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_with_base_url_rewrites_every_endpoint() {
        let config = ProviderConfig::with_base_url("http://127.0.0.1:9000/");
        for url in [
            &config.home_url,
            &config.login_url,
            &config.associated_services_url,
            &config.free_resources_url,
            &config.onnet_home_url,
            &config.onnet_bundle_url,
        ] {
            assert!(url.starts_with("http://127.0.0.1:9000/"), "{}", url);
        }
        assert_eq!(config.success_message, "SUCCESS");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_login_form_carries_fixed_params() {
        let config = ProviderConfig::default();
        let form = config.login_form("user@example.com", "secret");
        assert_eq!(form[0], ("username", "user@example.com"));
        assert_eq!(form[1], ("password", "secret"));
        assert!(form.contains(&("locale", "en_ZA")));
        assert_eq!(form.len(), 5);
    }
}
