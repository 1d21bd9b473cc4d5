//! # Facility Catalog Module
//!
//! In-memory, read-only collection of emergency departments, clinics and
//! pharmacies. The catalog is loaded once at startup and shared by every
//! request without locking; nothing mutates it after [`FacilityCatalog::load`].
//!
//! Two dataset schema variants exist: one names the district column `地區`
//! (region), the other `行政區` (administrative district). Both are
//! accepted and treated as a fallback pair.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::CatalogError;

/// One clinic, hospital or pharmacy entry in the dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(rename = "醫院名稱", alias = "name", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "醫院地址", alias = "address", default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(rename = "醫院電話", alias = "phone", default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(rename = "縣市", alias = "city", default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    /// District under the `地區` schema variant
    #[serde(rename = "地區", alias = "region", default, deserialize_with = "lenient_string")]
    pub region: Option<String>,
    /// District under the `行政區` schema variant
    #[serde(rename = "行政區", alias = "district", default, deserialize_with = "lenient_string")]
    pub district: Option<String>,
}

/// Accepts strings, numbers (phone numbers are sometimes stored unquoted) and null
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl FacilityRecord {
    pub fn name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    pub fn address(&self) -> Option<&str> {
        non_blank(&self.address)
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(&self.phone)
    }

    /// District value used by the menu flow: `行政區`, falling back to `地區`
    pub fn district_value(&self) -> Option<&str> {
        self.district
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or(self.region.as_deref())
    }

    /// Free-text region match.
    ///
    /// `region` must be a substring of either district column. Comparison is
    /// case-sensitive against the raw field values; callers pass an already
    /// lowercased query, so an uppercase field value never matches an ASCII
    /// query. An empty `region` matches every record, including records with
    /// neither column present.
    pub fn matches_region(&self, region: &str) -> bool {
        let primary = self.region.as_deref().unwrap_or("");
        let fallback = self.district.as_deref().unwrap_or("");
        primary.contains(region) || fallback.contains(region)
    }

    fn field(&self, field: CatalogField) -> Option<&str> {
        match field {
            CatalogField::City => self.city.as_deref(),
            CatalogField::District => self.district_value(),
        }
    }
}

/// Record attributes the menu flow selects on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogField {
    City,
    District,
}

/// Read-only facility collection
#[derive(Debug, Clone, Default)]
pub struct FacilityCatalog {
    records: Vec<FacilityRecord>,
}

impl FacilityCatalog {
    pub fn new(records: Vec<FacilityRecord>) -> Self {
        Self { records }
    }

    /// Load the catalog from a JSON array file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path_str.clone(),
            source,
        })?;
        let records: Vec<FacilityRecord> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path_str.clone(),
                source,
            })?;

        info!(path = %path_str, records = records.len(), "Facility dataset loaded");
        debug!(first_records = ?records.iter().take(3).collect::<Vec<_>>(), "Dataset sample");

        Ok(Self { records })
    }

    /// Load the catalog, degrading to an empty catalog when the file is missing or malformed
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "Facility dataset unavailable, every query will report no match");
                Self::default()
            }
        }
    }

    pub fn records(&self) -> &[FacilityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching `predicate`, in dataset order
    pub fn filter<P>(&self, predicate: P) -> Vec<&FacilityRecord>
    where
        P: Fn(&FacilityRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// Sorted, de-duplicated values of `field`, optionally restricted to
    /// records whose `filter_by` field equals the given value exactly
    pub fn distinct_values(
        &self,
        field: CatalogField,
        filter_by: Option<(CatalogField, &str)>,
    ) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| match filter_by {
                Some((by, value)) => r.field(by) == Some(value),
                None => true,
            })
            .filter_map(|r| r.field(field))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records whose district columns contain `region`
    pub fn matching_region(&self, region: &str) -> Vec<&FacilityRecord> {
        self.filter(|r| r.matches_region(region))
    }

    /// Records in exactly `city` and `district`
    pub fn in_district(&self, city: &str, district: &str) -> Vec<&FacilityRecord> {
        self.filter(|r| r.city.as_deref() == Some(city) && r.district_value() == Some(district))
    }
}
