//! Parser for the on-net DWR callback payload.
//!
//! The payload is JavaScript: `var s0={};...` statements that assign values to
//! numbered slots. Each free resource record is emitted on a single line that
//! also carries its `endBillCycle`, so only those lines are read.

use crate::domain::model::{Bundle, BundleList};
use crate::utils::error::{Result, UsageError};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

const RECORD_MARKER: &str = ".endBillCycle";

/// Layout of `expiryDate` after the leading day name, e.g. `Apr 20 2018`.
const EXPIRY_DATE_FORMAT: &str = "%b %d %Y";

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn parse_legacy(data: &[u8]) -> Result<BundleList> {
    let text = String::from_utf8_lossy(data);
    let mut bundles = Vec::new();

    for line in text.lines().filter(|l| l.contains(RECORD_MARKER)) {
        let values = parse_kv_line(line)?;
        bundles.push(bundle_from_values(&values, line)?);
    }

    tracing::debug!("Parsed {} bundles from legacy payload", bundles.len());
    Ok(BundleList(bundles))
}

fn bundle_from_values(values: &HashMap<&str, &str>, line: &str) -> Result<Bundle> {
    let required = |key: &str| {
        values.get(key).copied().ok_or_else(|| {
            UsageError::format(format!("record is missing '{}': {}", key, line.trim()))
        })
    };

    Ok(Bundle {
        name: required("typeName")?.to_string(),
        service_category: values.get("service").copied().unwrap_or_default().to_string(),
        expiry: Some(parse_expiry_date(required("expiryDate")?)?),
        used_bytes: parse_amount("usedAmount", required("usedAmount")?)?,
        remaining_bytes: parse_amount("totalAmount", required("totalAmount")?)?,
    })
}

/// Splits a `;` separated line of `slot.key="value"` assignments into a key/value map.
fn parse_kv_line(line: &str) -> Result<HashMap<&str, &str>> {
    let mut values = HashMap::new();
    for fragment in line.split(';').map(str::trim).filter(|f| !f.is_empty()) {
        let (key, value) = parse_kv(fragment)?;
        values.insert(key, value);
    }
    Ok(values)
}

fn parse_kv(fragment: &str) -> Result<(&str, &str)> {
    let (left, right) = fragment
        .split_once('=')
        .ok_or_else(|| UsageError::format(format!("element is not a key/value pair: {}", fragment)))?;

    let key = match left.split('.').collect::<Vec<_>>().as_slice() {
        [_slot, key] => *key,
        _ => {
            return Err(UsageError::format(format!(
                "invalid key format: {}",
                left
            )))
        }
    };

    Ok((key, right.trim_matches('"')))
}

/// Parses e.g. `Fri Apr 20 2018` as midnight UTC. The day name must be a valid
/// abbreviation but is not checked against the date.
fn parse_expiry_date(value: &str) -> Result<DateTime<Utc>> {
    let invalid = || UsageError::format(format!("invalid expiry date: {:?}", value));

    let (day_name, rest) = value.trim().split_once(' ').ok_or_else(invalid)?;
    if !DAY_NAMES.iter().any(|d| d.eq_ignore_ascii_case(day_name)) {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(rest.trim(), EXPIRY_DATE_FORMAT).map_err(|_| invalid())?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;

    Ok(midnight.and_utc())
}

fn parse_amount(key: &str, value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| UsageError::format(format!("{} is not an integer: {:?}", key, value)))
}
