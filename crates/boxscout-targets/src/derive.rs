//! Per-record target list derivation.
//!
//! One record yields a sequence of (list name, target group) pairs: an
//! auto-list per tag, overlaid with the explicit `prom_targets` entries from
//! its config context. An entry set to `false`/`null` suppresses the list
//! for this record.

use std::sync::OnceLock;

use boxscout_core::{LabelSet, ListName, Record, TargetGroup};
use regex::Regex;
use serde_json::Value;

use crate::encode::encode_list_name;
use crate::error::DeriveError;
use crate::labels::{assemble_labels, label_value};
use crate::normalize::normalize_address;

/// Prefix of tag-derived auto-list names; the tag text is appended before
/// encoding.
pub const TAG_LIST_PREFIX: &str = "_tag__";

/// How a `prom_targets` entry shapes its list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// Explicit `false`/`null`: this record produces nothing for the list,
    /// even when a tag would have auto-generated it.
    Suppressed,
    /// A group specification; `targets` defaults to the record's address and
    /// `labels` overlay the record's base label set.
    Group {
        targets: Option<Vec<String>>,
        labels: Option<LabelSet>,
    },
}

impl TargetSpec {
    fn from_value(list: &str, value: &Value) -> Result<Self, DeriveError> {
        match value {
            Value::Null | Value::Bool(false) => Ok(TargetSpec::Suppressed),
            Value::Object(map) => {
                let targets = match map.get("targets") {
                    None => None,
                    Some(Value::Array(items)) => {
                        let mut out = Vec::with_capacity(items.len());
                        for item in items {
                            match item {
                                Value::String(s) => out.push(s.clone()),
                                _ => return Err(DeriveError::TargetSpecShape(list.to_string())),
                            }
                        }
                        Some(out)
                    }
                    Some(_) => return Err(DeriveError::TargetSpecShape(list.to_string())),
                };
                let labels = match map.get("labels") {
                    None => None,
                    Some(Value::Object(entries)) => {
                        let mut out = LabelSet::new();
                        for (key, value) in entries {
                            let value = label_value(value)
                                .ok_or_else(|| DeriveError::TargetSpecShape(list.to_string()))?;
                            out.insert(key.clone(), value);
                        }
                        Some(out)
                    }
                    Some(_) => return Err(DeriveError::TargetSpecShape(list.to_string())),
                };
                Ok(TargetSpec::Group { targets, labels })
            }
            _ => Err(DeriveError::TargetSpecShape(list.to_string())),
        }
    }
}

/// Matches a target string that carries no host part: optional whitespace,
/// optional scheme, optional `:port`.
fn incomplete_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?P<scheme>https?://)?\s*(?P<port>:\d{1,5})?\s*$").expect("valid pattern")
    })
}

/// Complete an address-incomplete target string with the record's address.
///
/// `":9100"` becomes `"10.0.0.5:9100"`, `""` becomes `"10.0.0.5"`, and a
/// captured scheme is preserved in front of the address. A target that
/// already names a host passes through unchanged.
pub fn complete_target(target: &str, address: &str) -> String {
    let Some(caps) = incomplete_pattern().captures(target) else {
        return target.to_string();
    };
    let scheme = caps.name("scheme").map_or("", |m| m.as_str());
    let port = caps.name("port").map_or("", |m| m.as_str());
    format!("{scheme}{address}{port}")
}

/// Derive the named target lists for a single record.
///
/// Records without a primary address or a config context yield nothing.
/// Pairs are emitted in a stable order: tag auto-lists in tag order, then
/// explicit entries that did not replace one; a replacing entry keeps the
/// replaced list's position.
pub fn derive_record(record: &Record) -> Result<Vec<(ListName, TargetGroup)>, DeriveError> {
    let Some(primary) = record.primary_ip.as_ref() else {
        return Ok(Vec::new());
    };
    let Some(context) = record.config_context.as_ref() else {
        return Ok(Vec::new());
    };
    let context = context.as_object().ok_or(DeriveError::ConfigContextShape)?;

    let address = normalize_address(&primary.address)?;
    let base_labels = assemble_labels(context, record)?;

    let mut entries: Vec<(ListName, TargetSpec)> = Vec::new();
    for tag in &record.tags {
        let name = encode_list_name(&format!("{TAG_LIST_PREFIX}{}", tag.name));
        upsert(&mut entries, name, TargetSpec::Group { targets: None, labels: None });
    }
    match context.get("prom_targets") {
        None => {}
        Some(Value::Object(map)) => {
            for (raw_name, value) in map {
                let spec = TargetSpec::from_value(raw_name, value)?;
                upsert(&mut entries, encode_list_name(raw_name), spec);
            }
        }
        Some(_) => return Err(DeriveError::PromTargetsShape),
    }

    let mut out = Vec::new();
    for (name, spec) in entries {
        let TargetSpec::Group { targets, labels: overlay } = spec else {
            continue;
        };

        let targets: Vec<String> = targets
            .unwrap_or_else(|| vec![address.clone()])
            .iter()
            .map(|target| complete_target(target, &address))
            .collect();
        if targets.is_empty() {
            continue;
        }

        let mut labels = base_labels.clone();
        if let Some(overlay) = overlay {
            labels.extend(overlay);
        }
        labels.retain(|_, value| !value.is_empty());

        out.push((name, TargetGroup { targets, labels }));
    }
    Ok(out)
}

/// Replace a same-named entry in place, or append a new one. In-place
/// replacement keeps the auto-list position stable when `prom_targets`
/// overrides it.
fn upsert(entries: &mut Vec<(ListName, TargetSpec)>, name: ListName, spec: TargetSpec) {
    match entries.iter_mut().find(|(existing, _)| *existing == name) {
        Some(slot) => slot.1 = spec,
        None => entries.push((name, spec)),
    }
}
