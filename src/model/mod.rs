pub mod domain;
pub mod enums;
pub mod record;
pub mod template;

pub use domain::{CryptoKey, CryptoKeyId, Domain, DomainId, DomainMetadata, DomainMetadataId};
pub use enums::{AutoPtrPolicy, DomainKind, RecordType};
pub use record::{Record, RecordId};
pub use template::{
    DomainMetadataTemplate, DomainTemplate, DomainTemplateId, MetadataTemplateId, RecordTemplate,
    RecordTemplateId,
};

/// Well-known domain metadata kinds.
pub mod metadata_kinds {
    /// NSEC3 hashing parameters for the zone.
    pub const NSEC3PARAM: &str = "NSEC3PARAM";

    /// Present when the zone runs NSEC3 in narrow mode.
    pub const NSEC3NARROW: &str = "NSEC3NARROW";
}
