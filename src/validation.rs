//! Type-dependent validation of record names and content, run before
//! anything is persisted.

use crate::error::{Result, ZoneForgeError};
use crate::model::RecordType;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Validate a domain name in the shape the DNS server accepts: dot
/// separated labels of letters, digits and hyphens, a purely
/// alphanumeric final label, and no trailing dot. The server considers
/// a whole zone invalid if any record name ends with a period, so the
/// trailing dot is rejected here rather than stripped.
pub fn validate_domain_name(name: &str) -> Result<()> {
    let invalid = || ZoneForgeError::InvalidName(name.to_string());

    if name.is_empty() {
        return Err(invalid());
    }
    let labels: Vec<&str> = name.split('.').collect();
    for label in &labels {
        if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid());
        }
    }
    // The last label may not contain hyphens.
    let last = labels[labels.len() - 1];
    if !last.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    Ok(())
}

/// Looser domain-name shape used inside SOA content, where a trailing
/// dot is tolerated.
fn is_name_with_optional_dots(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

fn is_number(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Validate SOA content: `mname rname serial refresh retry expire minimum`.
pub fn validate_soa(content: &str) -> Result<()> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    let fail = |reason: &str| ZoneForgeError::InvalidContent {
        rtype: "SOA",
        content: content.to_string(),
        reason: reason.to_string(),
    };

    let &[name, email, serial, refresh, retry, expire, minimum] = fields.as_slice() else {
        return Err(fail("expected 7 fields"));
    };
    for (value, field) in [(name, "primary name server"), (email, "hostmaster")] {
        if !is_name_with_optional_dots(value) {
            return Err(fail(&format!("{} is not a valid domain name", field)));
        }
    }
    for (value, field) in [
        (serial, "serial"),
        (refresh, "refresh"),
        (retry, "retry"),
        (expire, "expire"),
        (minimum, "minimum"),
    ] {
        if !is_number(value) {
            return Err(fail(&format!("{} is not a number", field)));
        }
    }
    Ok(())
}

/// Perform the type-dependent validation of a record's content field.
pub fn validate_record_content(rtype: RecordType, content: &str) -> Result<()> {
    match rtype {
        RecordType::A => {
            content
                .parse::<Ipv4Addr>()
                .map_err(|_| ZoneForgeError::InvalidContent {
                    rtype: "A",
                    content: content.to_string(),
                    reason: "not a valid IPv4 address".to_string(),
                })?;
        }
        RecordType::Aaaa => {
            content
                .parse::<Ipv6Addr>()
                .map_err(|_| ZoneForgeError::InvalidContent {
                    rtype: "AAAA",
                    content: content.to_string(),
                    reason: "not a valid IPv6 address".to_string(),
                })?;
        }
        RecordType::Soa => validate_soa(content)?,
        t if t.content_is_domain_name() => validate_domain_name(content)?,
        _ => {}
    }
    Ok(())
}
