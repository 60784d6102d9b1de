//! Parsers for the authenticated portal's JSON responses.

use crate::domain::model::{Bundle, UNPARSEABLE_AMOUNT};
use crate::utils::error::{Result, UsageError};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    result_message: String,
    #[serde(default = "Vec::new")]
    payload: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FreeResource {
    #[serde(default)]
    service: String,
    type_name: String,
    #[serde(default)]
    used_amount: Value,
    #[serde(default)]
    total_amount: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssociatedService {
    service_number: String,
}

fn decode_envelope<T>(data: &[u8], context: &str, expected_message: &str) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let envelope: Envelope<T> =
        serde_json::from_slice(data).map_err(|source| UsageError::Decode {
            context: context.to_string(),
            source,
        })?;

    if envelope.result_message != expected_message {
        return Err(UsageError::UnexpectedResult {
            message: envelope.result_message,
        });
    }

    Ok(envelope.payload)
}

/// Parses a free resources response into bundles. Amounts that are not
/// integers ("Unlimited") become [`UNPARSEABLE_AMOUNT`].
pub fn parse_free_resources(data: &[u8], expected_message: &str) -> Result<Vec<Bundle>> {
    let resources: Vec<FreeResource> = decode_envelope(data, "free resources", expected_message)?;

    Ok(resources
        .into_iter()
        .map(|r| {
            let used_bytes = amount_or_sentinel(&r.type_name, "usedAmount", &r.used_amount);
            let remaining_bytes = amount_or_sentinel(&r.type_name, "totalAmount", &r.total_amount);
            Bundle {
                name: r.type_name,
                service_category: r.service,
                remaining_bytes,
                used_bytes,
                expiry: None,
            }
        })
        .collect())
}

/// Parses the associated services response into MSISDNs, in response order.
pub fn parse_associated_services(data: &[u8], expected_message: &str) -> Result<Vec<String>> {
    let services: Vec<AssociatedService> =
        decode_envelope(data, "associated services", expected_message)?;
    Ok(services.into_iter().map(|s| s.service_number).collect())
}

fn amount_or_sentinel(bundle: &str, field: &str, value: &Value) -> i64 {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        tracing::warn!("{} of '{}' is not a number ({}), using -1", field, bundle, value);
        UNPARSEABLE_AMOUNT
    })
}
