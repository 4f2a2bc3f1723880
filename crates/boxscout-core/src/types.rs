//! Inventory record model and emitted target-group shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label name → label value. A `BTreeMap` keeps serialization order
/// deterministic so unchanged lists produce byte-identical files.
pub type LabelSet = BTreeMap<String, String>;

/// Name of an output target list; always percent-encoded path-safe.
pub type ListName = String;

/// All target lists derived in one reconciliation cycle. Groups accumulate
/// per list name across records; they never replace one another.
pub type TargetListsSnapshot = BTreeMap<ListName, Vec<TargetGroup>>;

/// A Prometheus file_sd scrape unit: endpoints plus a shared label set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    pub targets: Vec<String>,
    /// Omitted from the serialized form entirely when empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: LabelSet,
}

/// A device or virtual machine as returned by the NetBox REST API.
///
/// Only the fields boxscout consumes are deserialized; the rest of the
/// payload is ignored. Every field is optional — absence of any of them
/// must never be an error at this layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub primary_ip: Option<PrimaryIp>,
    #[serde(default)]
    pub config_context: Option<Value>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub site: Option<SiteRef>,
    #[serde(default)]
    pub device_type: Option<DeviceTypeRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryIp {
    /// CIDR-ish form, e.g. `10.0.0.5/24`; may also be a bare address.
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceTypeRef {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<ManufacturerRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManufacturerRef {
    #[serde(default)]
    pub name: Option<String>,
}

impl Record {
    /// Name for diagnostics; records without a name still need to be
    /// identifiable in logs.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Primary address for diagnostics, raw form.
    pub fn display_address(&self) -> &str {
        self.primary_ip.as_ref().map_or("<no address>", |ip| ip.address.as_str())
    }

    /// Site name, navigating through the optional site object.
    pub fn site_name(&self) -> Option<&str> {
        self.site.as_ref().and_then(|s| s.name.as_deref())
    }

    /// Site slug, navigating through the optional site object.
    pub fn site_slug(&self) -> Option<&str> {
        self.site.as_ref().and_then(|s| s.slug.as_deref())
    }

    /// Device-type model, navigating through the optional device type.
    pub fn device_type_model(&self) -> Option<&str> {
        self.device_type.as_ref().and_then(|d| d.model.as_deref())
    }

    /// Manufacturer name + space + model, with each missing segment
    /// replaced by the empty string. Callers treat a whitespace-only
    /// result as absent.
    pub fn device_type_full(&self) -> String {
        let manufacturer = self
            .device_type
            .as_ref()
            .and_then(|d| d.manufacturer.as_ref())
            .and_then(|m| m.name.as_deref())
            .unwrap_or("");
        let model = self.device_type_model().unwrap_or("");
        format!("{manufacturer} {model}")
    }
}
