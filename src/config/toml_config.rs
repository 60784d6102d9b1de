use crate::config::provider::ProviderConfig;
use crate::utils::error::{Result, UsageError};
use crate::utils::validation::{validate_mobile_number, validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub mobile_number: Option<String>,
    pub credentials: Option<CredentialsConfig>,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(UsageError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| UsageError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TELKOM_PASSWORD})。未設定的變數保持原樣。
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| UsageError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref()?.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.credentials.as_ref()?.password.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.provider.validate()?;

        if let Some(mobile_number) = &self.mobile_number {
            validate_mobile_number("mobile_number", mobile_number)?;
        }
        if let Some(username) = self.username() {
            validate_non_empty_string("credentials.username", username)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
mobile_number = "0821234567"

[credentials]
username = "user@example.com"
password = "secret"

[provider]
timeout_seconds = 60
locale = "en_GB"
"#,
        )
        .unwrap();

        assert_eq!(config.mobile_number.as_deref(), Some("0821234567"));
        assert_eq!(config.username(), Some("user@example.com"));
        assert_eq!(config.password(), Some("secret"));
        assert_eq!(config.provider.timeout_seconds, 60);
        assert_eq!(config.provider.locale, "en_GB");
        // untouched provider fields keep their defaults
        assert_eq!(config.provider.home_url, ProviderConfig::default().home_url);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.mobile_number.is_none());
        assert!(config.username().is_none());
        assert_eq!(config.provider, ProviderConfig::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TELKOM_BYTES_TEST_PASSWORD", "from-env");
        let config = TomlConfig::from_toml_str(
            r#"
[credentials]
username = "user"
password = "${TELKOM_BYTES_TEST_PASSWORD}"
"#,
        )
        .unwrap();
        assert_eq!(config.password(), Some("from-env"));
    }

    #[test]
    fn test_unset_env_var_is_left_verbatim() {
        let config = TomlConfig::from_toml_str(
            r#"
[credentials]
password = "${TELKOM_BYTES_TEST_DEFINITELY_UNSET}"
"#,
        )
        .unwrap();
        assert_eq!(config.password(), Some("${TELKOM_BYTES_TEST_DEFINITELY_UNSET}"));
    }

    #[test]
    fn test_invalid_mobile_number_fails_validation() {
        let config = TomlConfig::from_toml_str(r#"mobile_number = "12345""#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mobile_number = \"0829876543\"").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mobile_number.as_deref(), Some("0829876543"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TomlConfig::from_file("/nonexistent/telkom-bytes.toml").unwrap_err();
        assert!(matches!(err, UsageError::Io(_)));
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = CredentialsConfig {
            username: Some("user".to_string()),
            password: Some("hunter2".to_string()),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
