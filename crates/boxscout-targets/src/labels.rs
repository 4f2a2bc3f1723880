//! Base label assembly for a record.

use boxscout_core::{LabelSet, Record};
use serde_json::{Map, Value};

use crate::error::DeriveError;

/// Prefix for labels derived from record metadata rather than declared in
/// `prom_labels`.
pub const META_LABEL_PREFIX: &str = "__meta_netbox_";

/// Build the base label set for a record: `prom_labels` from its config
/// context overlaid with derived metadata labels.
///
/// The derived labels are computed after the base copy and therefore win on
/// key collision. A derived label is only set when its source value is
/// non-empty after trimming; the stored value itself is not trimmed.
pub fn assemble_labels(ctx: &Map<String, Value>, record: &Record) -> Result<LabelSet, DeriveError> {
    let mut labels = LabelSet::new();

    match ctx.get("prom_labels") {
        None => {}
        Some(Value::Object(map)) => {
            for (key, value) in map {
                let value = label_value(value).ok_or(DeriveError::PromLabelsShape)?;
                labels.insert(key.clone(), value);
            }
        }
        Some(_) => return Err(DeriveError::PromLabelsShape),
    }

    set_meta(&mut labels, "name", record.name.as_deref());
    set_meta(&mut labels, "site_name", record.site_name());
    set_meta(&mut labels, "site_slug", record.site_slug());
    set_meta(&mut labels, "device_type_model", record.device_type_model());
    let device_type = record.device_type_full();
    set_meta(&mut labels, "device_type", Some(device_type.as_str()));

    Ok(labels)
}

/// Extract a usable label value from config-context JSON.
///
/// Strings pass through; `null` and `false` become the empty string, which
/// the emptiness filter later removes. Any other type is a shape error at
/// the caller.
pub(crate) fn label_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Bool(false) => Some(String::new()),
        _ => None,
    }
}

fn set_meta(labels: &mut LabelSet, key: &str, value: Option<&str>) {
    if let Some(value) = value
        && !value.trim().is_empty()
    {
        labels.insert(format!("{META_LABEL_PREFIX}{key}"), value.to_string());
    }
}
