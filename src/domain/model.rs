use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount reported for bundles whose quantity is not a number ("Unlimited").
pub const UNPARSEABLE_AMOUNT: i64 = -1;

/// Service category of cellular data bundles.
pub const CELLULAR_DATA_CATEGORY: &str = "GPRS";

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub name: String,
    pub service_category: String,
    pub remaining_bytes: i64,
    pub used_bytes: i64,
    pub expiry: Option<DateTime<Utc>>,
}

impl Bundle {
    /// Used plus remaining, or the sentinel if either side is unknown.
    pub fn total_bytes(&self) -> i64 {
        if self.has_sentinel() {
            return UNPARSEABLE_AMOUNT;
        }
        self.used_bytes.saturating_add(self.remaining_bytes)
    }

    pub fn has_sentinel(&self) -> bool {
        self.remaining_bytes == UNPARSEABLE_AMOUNT || self.used_bytes == UNPARSEABLE_AMOUNT
    }

    fn is_cellular_data(&self) -> bool {
        self.service_category == CELLULAR_DATA_CATEGORY
    }

    /// Remaining bytes usable in a sum; sentinel amounts count as nothing.
    fn countable_remaining(&self) -> i64 {
        if self.remaining_bytes < 0 {
            0
        } else {
            self.remaining_bytes
        }
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_sentinel() {
            return write!(f, "{} REMAINING: unlimited", self.name);
        }
        write!(
            f,
            "{} REMAINING: {:.2} / {:.2} GB",
            self.name,
            self.remaining_bytes as f64 / GIB,
            self.total_bytes() as f64 / GIB
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleList(pub Vec<Bundle>);

impl BundleList {
    /// Bytes left in the data cap, ignoring night surfer and Wi-Fi bundles.
    pub fn cap_remaining_bytes(&self) -> i64 {
        self.0
            .iter()
            .filter(|b| {
                let lower = b.name.to_lowercase();
                !lower.contains("night") && !lower.contains("wi-fi")
            })
            .map(Bundle::countable_remaining)
            .fold(0, i64::saturating_add)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bundle> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Bundle>> for BundleList {
    fn from(bundles: Vec<Bundle>) -> Self {
        Self(bundles)
    }
}

impl<'a> IntoIterator for &'a BundleList {
    type Item = &'a Bundle;
    type IntoIter = std::slice::Iter<'a, Bundle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One subscriber line and its bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    identifier: String,
    bundles: BundleList,
}

impl Service {
    pub fn new(identifier: impl Into<String>, bundles: impl Into<BundleList>) -> Self {
        Self {
            identifier: identifier.into(),
            bundles: bundles.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn bundles(&self) -> &BundleList {
        &self.bundles
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceList(pub Vec<Service>);

impl ServiceList {
    fn cellular_bundles(&self) -> impl Iterator<Item = &Bundle> {
        self.0
            .iter()
            .flat_map(|s| s.bundles.iter())
            .filter(|b| b.is_cellular_data())
    }

    /// Paid-for data left across all lines: anytime data bundles only.
    pub fn non_free_bytes_remaining(&self) -> i64 {
        self.cellular_bundles()
            .filter(|b| {
                let lower = b.name.to_lowercase();
                !lower.contains("night surfer")
                    && (lower.contains("all networks data") || lower.contains("smartbroadband data"))
            })
            .map(Bundle::countable_remaining)
            .fold(0, i64::saturating_add)
    }

    pub fn night_surfer_remaining(&self) -> i64 {
        self.cellular_bundles()
            .filter(|b| b.name.to_lowercase().contains("night surfer"))
            .map(Bundle::countable_remaining)
            .fold(0, i64::saturating_add)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Service> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Service>> for ServiceList {
    fn from(services: Vec<Service>) -> Self {
        Self(services)
    }
}
