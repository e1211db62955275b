//! Reverse (PTR) record synthesis for A records.
//!
//! Runs after every A record save, keyed off the record's `auto_ptr`
//! policy. The reverse zone is created on demand under `Always`, using
//! the source domain's reverse template when set and the configured
//! default otherwise; a freshly created reverse zone immediately gets
//! its template's records materialized, so it comes up with a working
//! SOA and NS set.

use crate::engine::{self, EngineCtx};
use crate::error::{Result, ZoneForgeError};
use crate::model::{AutoPtrPolicy, Domain, DomainId, DomainTemplateId, Record, RecordId, RecordType};
use crate::reverse::to_reverse;
use crate::store::Tables;
use crate::templating;
use std::net::Ipv4Addr;
use tracing::{debug, info};

/// Create or refresh the PTR record mirroring a saved A record.
pub(crate) fn synthesize(
    ctx: &EngineCtx<'_>,
    tables: &mut Tables,
    source_id: RecordId,
) -> Result<()> {
    let source = tables
        .record(source_id)
        .cloned()
        .ok_or(ZoneForgeError::RecordNotFound(source_id.0))?;
    // A-record content is validated before this stage.
    let ip: Ipv4Addr = source
        .content
        .parse()
        .map_err(|_| ZoneForgeError::InvalidContent {
            rtype: "A",
            content: source.content.clone(),
            reason: "not a valid IPv4 address".to_string(),
        })?;
    let (reverse_zone, host) = to_reverse(ip);

    let reverse_domain = match source.auto_ptr {
        AutoPtrPolicy::Never => return Ok(()),
        AutoPtrPolicy::Always => match tables.domain_by_name(&reverse_zone) {
            Some((id, _)) => id,
            None => create_reverse_domain(ctx, tables, &source, &reverse_zone)?,
        },
        AutoPtrPolicy::OnlyIfDomain => match tables.domain_by_name(&reverse_zone) {
            Some((id, _)) => id,
            None => {
                debug!(zone = %reverse_zone, "reverse domain absent, skipping PTR");
                return Ok(());
            }
        },
    };

    let name = format!("{}.{}", host, reverse_zone);
    let existing = tables.find_record(&name, RecordType::Ptr, &source.name);
    let mut ptr = match existing {
        Some(id) => tables
            .record(id)
            .cloned()
            .ok_or(ZoneForgeError::RecordNotFound(id.0))?,
        None => Record::new(reverse_domain, RecordType::Ptr, name, source.name.clone()),
    };
    ptr.domain = reverse_domain;
    ptr.depends_on = Some(source_id);
    engine::apply_record(ctx, tables, existing, ptr)?;
    Ok(())
}

fn create_reverse_domain(
    ctx: &EngineCtx<'_>,
    tables: &mut Tables,
    source: &Record,
    reverse_zone: &str,
) -> Result<DomainId> {
    let source_domain = tables
        .domain(source.domain)
        .cloned()
        .ok_or_else(|| ZoneForgeError::DomainNotFound(source.domain.to_string()))?;
    let template = match source_domain.reverse_template {
        Some(template) => template,
        None => default_reverse_template(ctx, tables)?,
    };
    let domain = Domain::new(reverse_zone).with_template(template);
    let id = tables.insert_domain(domain)?;
    info!(zone = %reverse_zone, source = %source.name, "auto-created reverse domain");
    templating::reconcile(ctx, tables, id)?;
    Ok(id)
}

/// Resolve the configured default reverse-zone template by name, once,
/// caching the id for the engine's lifetime.
fn default_reverse_template(ctx: &EngineCtx<'_>, tables: &Tables) -> Result<DomainTemplateId> {
    let mut cache = ctx.reverse_template.lock();
    if let Some(id) = *cache {
        return Ok(id);
    }
    let name = ctx
        .config
        .default_reverse_template
        .as_deref()
        .ok_or(ZoneForgeError::ReverseTemplateUnconfigured)?;
    let (id, _) = tables
        .domain_template_by_name(name)
        .ok_or_else(|| ZoneForgeError::ReverseTemplateNotFound(name.to_string()))?;
    *cache = Some(id);
    Ok(id)
}
