use crate::utils::error::{Result, UsageError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(UsageError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(UsageError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(UsageError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| UsageError::MissingConfig {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(UsageError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Local format MSISDN: ten digits starting with `0`.
pub fn validate_mobile_number(field_name: &str, value: &str) -> Result<()> {
    let well_formed = value.len() == 10
        && value.starts_with('0')
        && value.chars().all(|c| c.is_ascii_digit());

    if !well_formed {
        return Err(UsageError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Mobile number must be 10 digits starting with 0, e.g. 0821234567"
                .to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("home_url", "https://example.com").is_ok());
        assert!(validate_url("home_url", "http://127.0.0.1:8080/home").is_ok());
        assert!(validate_url("home_url", "").is_err());
        assert!(validate_url("home_url", "invalid-url").is_err());
        assert!(validate_url("home_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_mobile_number() {
        assert!(validate_mobile_number("mobile_number", "0821234567").is_ok());
        assert!(validate_mobile_number("mobile_number", "821234567").is_err());
        assert!(validate_mobile_number("mobile_number", "1821234567").is_err());
        assert!(validate_mobile_number("mobile_number", "082123456a").is_err());
        assert!(validate_mobile_number("mobile_number", "08212345678").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("user".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("username", &present).unwrap(), "user");
        assert!(matches!(
            validate_required_field("username", &missing),
            Err(UsageError::MissingConfig { .. })
        ));
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("password", "secret").is_ok());
        assert!(validate_non_empty_string("password", "   ").is_err());
    }
}
