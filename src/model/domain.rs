use super::enums::{AutoPtrPolicy, DomainKind};
use super::template::{DomainTemplateId, MetadataTemplateId};
use std::fmt;

/// Identifier of a stored domain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainId(pub u64);

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a stored domain metadata row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainMetadataId(pub u64);

/// Identifier of a stored crypto key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CryptoKeyId(pub u64);

/// An authoritative zone apex and its bookkeeping fields.
///
/// Records referencing the domain live in their own table; the domain row
/// carries the template assignments that drive generated-record
/// reconciliation and the default PTR synthesis policy for its records.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    /// Zone name, unique store-wide. Lowercased on save.
    pub name: String,
    pub kind: Option<DomainKind>,
    /// Master server address for SLAVE zones.
    pub master: Option<String>,
    pub account: Option<String>,
    /// Template this domain's generated records are materialized from.
    pub template: Option<DomainTemplateId>,
    /// Template to use for reverse zones auto-created for A records
    /// in this domain. Falls back to the configured default when unset.
    pub reverse_template: Option<DomainTemplateId>,
    /// Default PTR synthesis policy for records created under this domain.
    pub record_auto_ptr: AutoPtrPolicy,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            master: None,
            account: None,
            template: None,
            reverse_template: None,
            record_auto_ptr: AutoPtrPolicy::Always,
        }
    }

    pub fn with_template(mut self, template: DomainTemplateId) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_reverse_template(mut self, template: DomainTemplateId) -> Self {
        self.reverse_template = Some(template);
        self
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Per-domain metadata consumed by the DNS server (e.g. `NSEC3PARAM`,
/// `NSEC3NARROW`, `TSIG-ALLOW-AXFR`).
#[derive(Debug, Clone, PartialEq)]
pub struct DomainMetadata {
    pub domain: DomainId,
    pub kind: String,
    pub content: String,
    /// Back-reference to the metadata template that generated this row.
    pub template: Option<MetadataTemplateId>,
}

impl DomainMetadata {
    pub fn new(domain: DomainId, kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            domain,
            kind: kind.into(),
            content: content.into(),
            template: None,
        }
    }
}

/// A DNSSEC key for a zone. The presence of any key row for a domain
/// marks the zone as DNSSEC-enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct CryptoKey {
    pub domain: Option<DomainId>,
    pub flags: u32,
    pub active: bool,
    pub content: Option<String>,
}

impl CryptoKey {
    pub fn new(domain: DomainId, flags: u32) -> Self {
        Self {
            domain: Some(domain),
            flags,
            active: true,
            content: None,
        }
    }
}
