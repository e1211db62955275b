use super::domain::{DomainId, DomainMetadata};
use super::enums::{AutoPtrPolicy, RecordType};
use super::record::Record;
use crate::render::render_str;
use std::collections::HashMap;
use std::fmt;

/// Identifier of a stored domain template.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainTemplateId(pub u64);

/// Identifier of a stored record template.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordTemplateId(pub u64);

/// Identifier of a stored domain metadata template.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetadataTemplateId(pub u64);

/// A reusable blueprint grouping record and metadata templates.
/// Assigning it to a domain materializes all of its children.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainTemplate {
    /// Template identifier, unique store-wide.
    pub name: String,
}

impl DomainTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for DomainTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An unmaterialized record blueprint. `name` and `content` may carry
/// `{domain-name}` placeholders that are substituted at materialization.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTemplate {
    pub domain_template: DomainTemplateId,
    pub rtype: RecordType,
    pub name: String,
    pub content: String,
    pub ttl: Option<u32>,
    pub prio: Option<u32>,
    pub auth: bool,
    pub auto_ptr: AutoPtrPolicy,
}

impl RecordTemplate {
    pub fn new(
        domain_template: DomainTemplateId,
        rtype: RecordType,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            domain_template,
            rtype,
            name: name.into(),
            content: content.into(),
            ttl: Some(3600),
            prio: None,
            auth: true,
            auto_ptr: AutoPtrPolicy::default(),
        }
    }

    pub fn with_auto_ptr(mut self, policy: AutoPtrPolicy) -> Self {
        self.auto_ptr = policy;
        self
    }

    /// Render this template into a concrete record for `domain`,
    /// carrying the back-reference to `id`.
    pub fn materialize(&self, id: RecordTemplateId, domain: DomainId, domain_name: &str) -> Record {
        let args = substitution_args(domain_name);
        Record {
            domain,
            name: render_str(&self.name, &args),
            rtype: self.rtype,
            content: render_str(&self.content, &args),
            ttl: self.ttl,
            prio: self.prio,
            auth: self.auth,
            disabled: false,
            ordername: None,
            change_date: None,
            number: None,
            template: Some(id),
            depends_on: None,
            auto_ptr: self.auto_ptr,
        }
    }
}

impl fmt::Display for RecordTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prio {
            Some(prio) => write!(f, "{} IN {} {} {}", self.name, self.rtype, prio, self.content),
            None => write!(f, "{} IN {} {}", self.name, self.rtype, self.content),
        }
    }
}

/// An unmaterialized metadata blueprint; `content` may carry the same
/// placeholders as record templates.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainMetadataTemplate {
    pub domain_template: DomainTemplateId,
    pub kind: String,
    pub content: String,
}

impl DomainMetadataTemplate {
    pub fn new(
        domain_template: DomainTemplateId,
        kind: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            domain_template,
            kind: kind.into(),
            content: content.into(),
        }
    }

    /// Render this template into a concrete metadata row for `domain`.
    pub fn materialize(
        &self,
        id: MetadataTemplateId,
        domain: DomainId,
        domain_name: &str,
    ) -> DomainMetadata {
        let args = substitution_args(domain_name);
        DomainMetadata {
            domain,
            kind: self.kind.clone(),
            content: render_str(&self.content, &args),
            template: Some(id),
        }
    }
}

fn substitution_args(domain_name: &str) -> HashMap<String, String> {
    HashMap::from([("domain-name".to_string(), domain_name.to_string())])
}
