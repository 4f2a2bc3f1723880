//! boxscout-targets — record-to-target-list derivation.
//!
//! Turns one NetBox record into zero or more named target lists: tag-derived
//! auto-lists plus explicit `prom_targets` entries from config context, each
//! carrying the record's assembled label set. The pipeline merges per-record
//! results into a snapshot keyed by encoded list name.

pub mod derive;
pub mod encode;
pub mod error;
pub mod labels;
pub mod normalize;
pub mod pipeline;

pub use derive::{TAG_LIST_PREFIX, TargetSpec, complete_target, derive_record};
pub use encode::encode_list_name;
pub use error::DeriveError;
pub use labels::{META_LABEL_PREFIX, assemble_labels};
pub use normalize::normalize_address;
pub use pipeline::derive_snapshot;
