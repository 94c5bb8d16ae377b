//! Wire types for the backend ingestion endpoint.
//!
//! ## Payload shape expected by `POST /strains/create-strains`
//!
//! ```json
//! {
//!   "storeName": "Monroe Ohio",
//!   "strains": [
//!     {
//!       "url": "https://.../product/blue-dream-3-5g",
//!       "name": "Blue Dream",
//!       "strain_type": "Hybrid",
//!       "thc": "24.1%",
//!       "weight": "3.5g",
//!       "price": "$25.00",
//!       "terpenes": { "Myrcene": "1.23%" }
//!     }
//!   ]
//! }
//! ```
//!
//! `storeName` is camelCase on the wire; the record fields themselves are
//! snake_case. Optional fields are omitted entirely when absent — the
//! backend treats a missing key and an explicit `null` differently, so we
//! never serialize `null`. `terpenes` is always present (possibly `{}`).

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Terpene name → normalized percentage value, preserving the order the
/// terpenes appeared on the detail page.
///
/// Keys are unique: inserting an existing name overwrites its value in
/// place without moving it. Serializes as a JSON object in insertion order.
/// Values are always percentage strings; mg/g readings are converted before
/// insertion (see the crawler's normalization rules).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerpeneProfile(Vec<(String, String)>);

impl TerpeneProfile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a terpene entry, keeping the original position
    /// of an overwritten name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.0.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl Serialize for TerpeneProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, String)> for TerpeneProfile {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut profile = Self::new();
        for (name, value) in iter {
            profile.insert(name, value);
        }
        profile
    }
}

/// One normalized product, immutable once built, held only until submitted.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRecord {
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strain_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cbd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    /// Single-tier sites: the first price tile's value, `$`-prefixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Multi-tier sites: prices parallel to `weights`, in tile order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub terpenes: TerpeneProfile,
}

impl ProductRecord {
    /// A record with only the mandatory fields set; extraction fills in the
    /// rest field by field.
    #[must_use]
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            strain_type: None,
            thc: None,
            cbd: None,
            brand: None,
            weight: None,
            price: None,
            prices: None,
            weights: None,
            offer: None,
            image_url: None,
            terpenes: TerpeneProfile::new(),
        }
    }
}

/// Body of one submission call.
#[derive(Debug, Serialize)]
pub struct SubmissionPayload<'a> {
    #[serde(rename = "storeName")]
    pub store_name: &'a str,
    pub strains: &'a [ProductRecord],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terpene_profile_preserves_insertion_order() {
        let mut profile = TerpeneProfile::new();
        profile.insert("Myrcene", "1.23%");
        profile.insert("Limonene", "0.80%");
        profile.insert("Pinene", "0.12%");
        let names: Vec<&str> = profile.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Myrcene", "Limonene", "Pinene"]);
    }

    #[test]
    fn terpene_profile_overwrites_in_place() {
        let mut profile = TerpeneProfile::new();
        profile.insert("Myrcene", "1.00%");
        profile.insert("Limonene", "0.80%");
        profile.insert("Myrcene", "1.23%");
        assert_eq!(profile.len(), 2);
        assert_eq!(profile.get("Myrcene"), Some("1.23%"));
        let names: Vec<&str> = profile.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Myrcene", "Limonene"]);
    }

    #[test]
    fn terpene_profile_serializes_as_ordered_object() {
        let mut profile = TerpeneProfile::new();
        profile.insert("Beta-Caryophyllene", "0.45%");
        profile.insert("Myrcene", "1.23%");
        let json = serde_json::to_string(&profile).unwrap();
        assert_eq!(json, r#"{"Beta-Caryophyllene":"0.45%","Myrcene":"1.23%"}"#);
    }

    #[test]
    fn record_omits_absent_fields() {
        let record = ProductRecord::new("https://x.test/product/a", "Blue Dream");
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["url"], "https://x.test/product/a");
        assert_eq!(obj["name"], "Blue Dream");
        assert!(!obj.contains_key("strain_type"));
        assert!(!obj.contains_key("thc"));
        assert!(!obj.contains_key("price"));
        assert!(!obj.contains_key("offer"));
        // terpenes is always present, even when empty.
        assert_eq!(obj["terpenes"], serde_json::json!({}));
    }

    #[test]
    fn record_serializes_set_fields_snake_case() {
        let mut record = ProductRecord::new("https://x.test/product/a", "Blue Dream");
        record.strain_type = Some("Hybrid".to_owned());
        record.thc = Some("24.1%".to_owned());
        record.weight = Some("3.5g".to_owned());
        record.image_url = Some("https://img.test/a.jpg".to_owned());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["strain_type"], "Hybrid");
        assert_eq!(value["thc"], "24.1%");
        assert_eq!(value["weight"], "3.5g");
        assert_eq!(value["image_url"], "https://img.test/a.jpg");
    }

    #[test]
    fn payload_uses_camel_case_store_name() {
        let records = vec![ProductRecord::new("https://x.test/product/a", "A")];
        let payload = SubmissionPayload {
            store_name: "Monroe Ohio",
            strains: &records,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["storeName"], "Monroe Ohio");
        assert_eq!(value["strains"].as_array().unwrap().len(), 1);
    }
}
