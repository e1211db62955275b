use crate::model::RecordId;
use thiserror::Error;

/// Unified error type for the zone data engine.
#[derive(Debug, Clone, Error)]
pub enum ZoneForgeError {
    // Validation errors, raised before anything is written
    #[error("invalid domain name: {0}")]
    InvalidName(String),
    #[error("invalid {rtype} content {content:?}: {reason}")]
    InvalidContent {
        rtype: &'static str,
        content: String,
        reason: String,
    },
    #[error("record type {0} is not allowed by configuration")]
    RecordTypeNotAllowed(String),
    #[error("cannot create CNAME record, conflicting records exist: {}", join_ids(.0))]
    CnameConflict(Vec<RecordId>),
    #[error("cannot create record, conflicting CNAME record exists: {}", join_ids(.0))]
    ConflictsWithCname(Vec<RecordId>),

    // Configuration errors
    #[error("no default reverse domain template is configured")]
    ReverseTemplateUnconfigured,
    #[error("default reverse domain template {0:?} does not exist")]
    ReverseTemplateNotFound(String),
    #[error("configuration parse error: {0}")]
    ConfigParse(String),
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    // Storage errors
    #[error("domain not found: {0}")]
    DomainNotFound(String),
    #[error("record not found: {0}")]
    RecordNotFound(u64),
    #[error("template not found: {0}")]
    TemplateNotFound(u64),
    #[error("metadata not found: {0}")]
    MetadataNotFound(u64),
    #[error("unique constraint violated on {entity}: {key}")]
    UniqueViolation { entity: &'static str, key: String },
}

fn join_ids(ids: &[RecordId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ZoneForgeError {
    /// Whether the error came from a uniqueness race and the operation
    /// is worth retrying once.
    pub fn is_transient(&self) -> bool {
        matches!(self, ZoneForgeError::UniqueViolation { .. })
    }
}

pub type Result<T> = std::result::Result<T, ZoneForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_errors_list_record_ids() {
        let err = ZoneForgeError::CnameConflict(vec![RecordId(3), RecordId(9)]);
        assert_eq!(
            err.to_string(),
            "cannot create CNAME record, conflicting records exist: 3, 9"
        );
    }

    #[test]
    fn unique_violations_are_transient() {
        let err = ZoneForgeError::UniqueViolation {
            entity: "records",
            key: "x".to_string(),
        };
        assert!(err.is_transient());
        assert!(!ZoneForgeError::ReverseTemplateUnconfigured.is_transient());
    }
}
