//! Reconciliation of a domain's generated records and metadata against
//! its assigned template.
//!
//! The desired state is the rendered form of every record/metadata
//! template under the domain's current template; the actual state is
//! every stored row carrying a template back-reference. Reconciliation
//! diffs the two sets keyed by template id and converges with creates,
//! updates and deletes. It always runs inside the caller's transaction,
//! so a failure part way through leaves the prior generated set intact.

use crate::engine::{self, EngineCtx};
use crate::error::{Result, ZoneForgeError};
use crate::model::{DomainId, MetadataTemplateId, Record, RecordTemplateId};
use crate::store::Tables;
use std::collections::HashSet;
use tracing::{debug, info};

/// Counts of the writes one reconciliation performed. Reconciling an
/// unchanged domain twice yields a no-op summary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub records_created: usize,
    pub records_updated: usize,
    pub records_deleted: usize,
    pub metadata_created: usize,
    pub metadata_updated: usize,
    pub metadata_deleted: usize,
}

impl ReconcileSummary {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Converge `domain`'s generated records and metadata to its assigned
/// template. With no template assigned, the generated set converges to
/// empty.
pub(crate) fn reconcile(
    ctx: &EngineCtx<'_>,
    tables: &mut Tables,
    domain_id: DomainId,
) -> Result<ReconcileSummary> {
    let domain = tables
        .domain(domain_id)
        .cloned()
        .ok_or_else(|| ZoneForgeError::DomainNotFound(domain_id.to_string()))?;
    let mut summary = ReconcileSummary::default();

    let desired_records = match domain.template {
        Some(template) => tables.record_templates_of(template),
        None => Vec::new(),
    };
    let desired_ids: HashSet<RecordTemplateId> =
        desired_records.iter().map(|(id, _)| *id).collect();

    let generated: Vec<_> = tables
        .records_of_domain(domain_id)
        .into_iter()
        .filter(|(_, r)| r.template.is_some())
        .collect();

    let mut instantiated: HashSet<RecordTemplateId> = HashSet::new();
    for (record_id, record) in generated {
        let Some(source) = record.template else {
            continue;
        };
        if !desired_ids.contains(&source) {
            // Generated by a template outside the current assignment.
            engine::remove_record(ctx, tables, record_id)?;
            summary.records_deleted += 1;
            continue;
        }
        instantiated.insert(source);
        let Some((_, template)) = desired_records.iter().find(|(id, _)| *id == source) else {
            continue;
        };
        let desired = template.materialize(source, domain_id, &domain.name);
        if rendered_differs(&record, &desired) {
            let mut updated = record;
            apply_rendered(&mut updated, &desired);
            engine::apply_record(ctx, tables, Some(record_id), updated)?;
            summary.records_updated += 1;
        }
    }
    for (template_id, template) in &desired_records {
        if instantiated.contains(template_id) {
            continue;
        }
        let record = template.materialize(*template_id, domain_id, &domain.name);
        debug!(record = %record, "materializing templated record");
        engine::apply_record(ctx, tables, None, record)?;
        summary.records_created += 1;
    }

    let desired_metadata = match domain.template {
        Some(template) => tables.metadata_templates_of(template),
        None => Vec::new(),
    };
    let desired_meta_ids: HashSet<MetadataTemplateId> =
        desired_metadata.iter().map(|(id, _)| *id).collect();

    let generated_meta: Vec<_> = tables
        .metadata_of_domain(domain_id)
        .into_iter()
        .filter(|(_, m)| m.template.is_some())
        .collect();

    let mut meta_instantiated: HashSet<MetadataTemplateId> = HashSet::new();
    for (row_id, row) in generated_meta {
        let Some(source) = row.template else {
            continue;
        };
        if !desired_meta_ids.contains(&source) {
            tables.delete_metadata(row_id);
            summary.metadata_deleted += 1;
            continue;
        }
        meta_instantiated.insert(source);
        let Some((_, template)) = desired_metadata.iter().find(|(id, _)| *id == source) else {
            continue;
        };
        let desired = template.materialize(source, domain_id, &domain.name);
        if row.kind != desired.kind || row.content != desired.content {
            tables.update_metadata(row_id, desired)?;
            summary.metadata_updated += 1;
        }
    }
    for (template_id, template) in &desired_metadata {
        if meta_instantiated.contains(template_id) {
            continue;
        }
        tables.insert_metadata(template.materialize(*template_id, domain_id, &domain.name));
        summary.metadata_created += 1;
    }

    if !summary.is_noop() {
        info!(domain = %domain.name, ?summary, "reconciled templated records");
    }
    Ok(summary)
}

/// Whether the rendered fields of a generated record drifted from its
/// template. Derived fields (`ordername`, `change_date`, `number`) and
/// the `depends_on` back-reference are not the template's to manage.
pub(crate) fn rendered_differs(existing: &Record, desired: &Record) -> bool {
    existing.name != desired.name
        || existing.rtype != desired.rtype
        || existing.content != desired.content
        || existing.ttl != desired.ttl
        || existing.prio != desired.prio
        || existing.auth != desired.auth
        || existing.disabled != desired.disabled
        || existing.auto_ptr != desired.auto_ptr
}

/// Overwrite the rendered fields of `existing` from a freshly
/// materialized `desired`, preserving identity and derived state.
pub(crate) fn apply_rendered(existing: &mut Record, desired: &Record) {
    existing.name = desired.name.clone();
    existing.rtype = desired.rtype;
    existing.content = desired.content.clone();
    existing.ttl = desired.ttl;
    existing.prio = desired.prio;
    existing.auth = desired.auth;
    existing.disabled = desired.disabled;
    existing.auto_ptr = desired.auto_ptr;
}
