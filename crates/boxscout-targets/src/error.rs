//! Record-level derivation errors.

use thiserror::Error;

/// Errors that abort derivation for a single record. The pipeline logs them
/// with the record's name and primary address and moves on; they never abort
/// a cycle.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("primary address {0:?} is not a valid network address")]
    BadAddress(String),

    #[error("config context is not a mapping")]
    ConfigContextShape,

    #[error("prom_labels is not a mapping of string values")]
    PromLabelsShape,

    #[error("prom_targets is not a mapping")]
    PromTargetsShape,

    #[error("prom_targets entry {0:?} is neither false/null nor a target group")]
    TargetSpecShape(String),
}
