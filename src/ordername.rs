//! DNSSEC `ordername` computation.
//!
//! The DNS server uses this field for canonical zone ordering when
//! answering with NSEC/NSEC3 denial of existence. Which form it takes
//! depends on live zone state (crypto keys and metadata), so it is
//! recomputed on every record save rather than cached.

use crate::model::{Record, metadata_kinds};
use crate::store::Tables;
use thiserror::Error;
use tracing::warn;

/// Errors parsing an `NSEC3PARAM` metadata row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Nsec3ParamError {
    #[error("expected 4 fields: algorithm flags iterations salt")]
    FieldCount,
    #[error("incompatible hash algorithm: {0}")]
    Algorithm(String),
    #[error("incompatible flags: {0}")]
    Flags(String),
    #[error("invalid iteration count: {0}")]
    Iterations(String),
    #[error("invalid salt: {0}")]
    Salt(String),
}

/// Compute the ordername for a record, consulting the zone's current
/// DNSSEC state.
///
/// Returns `None` when the zone has no crypto keys (DNSSEC disabled)
/// or when its NSEC3PARAM metadata is malformed; the latter is logged
/// and deliberately downgraded instead of failing the save. An empty
/// string marks NSEC3 narrow mode, where the server ignores the field.
pub fn generate(tables: &Tables, record: &Record) -> Option<String> {
    let domain = tables.domain(record.domain)?;
    if !tables.has_crypto_key(record.domain) {
        return None;
    }
    let nsec3param = tables
        .metadata_of_kind(record.domain, metadata_kinds::NSEC3PARAM)
        .into_iter()
        .next();
    match nsec3param {
        Some((_, param)) => {
            let narrow = !tables
                .metadata_of_kind(record.domain, metadata_kinds::NSEC3NARROW)
                .is_empty();
            if narrow {
                // In narrow mode the field is ignored and best left empty.
                return Some(String::new());
            }
            match nsec3_ordername(&record.name, &param.content) {
                Ok(hash) => Some(hash),
                Err(err) => {
                    warn!(
                        record = %record.name,
                        domain = %domain.name,
                        %err,
                        "malformed NSEC3PARAM, leaving ordername unset"
                    );
                    None
                }
            }
        }
        None => Some(nsec_ordername(&domain.name, &record.name)),
    }
}

/// NSEC-mode ordername: the labels of the record name relative to the
/// zone apex, reversed, joined with spaces. A record at the apex has no
/// relative labels and gets an empty ordername.
pub fn nsec_ordername(domain_name: &str, record_name: &str) -> String {
    let domain_labels = domain_name.split('.').count();
    let record_labels: Vec<&str> = record_name.split('.').collect();
    let relative = record_labels.len().saturating_sub(domain_labels);
    let mut labels: Vec<&str> = record_labels[..relative].to_vec();
    labels.reverse();
    labels.join(" ")
}

/// NSEC3-mode ordername: the lowercase base32hex encoding of the salted,
/// iterated SHA-1 hash of the record's canonical wire-form name, as
/// `pdnssec hash-zone-record` would print it.
pub fn nsec3_ordername(record_name: &str, nsec3param: &str) -> Result<String, Nsec3ParamError> {
    let fields: Vec<&str> = nsec3param.split_whitespace().collect();
    let &[algorithm, flags, iterations, salt] = fields.as_slice() else {
        return Err(Nsec3ParamError::FieldCount);
    };
    // Only SHA-1 (algorithm 1) is defined for NSEC3.
    if algorithm != "1" {
        return Err(Nsec3ParamError::Algorithm(algorithm.to_string()));
    }
    if flags != "1" {
        return Err(Nsec3ParamError::Flags(flags.to_string()));
    }
    let iterations: u16 = iterations
        .parse()
        .map_err(|_| Nsec3ParamError::Iterations(iterations.to_string()))?;
    let salt = hex::decode(salt).map_err(|_| Nsec3ParamError::Salt(salt.to_string()))?;

    // Canonical form: lowercase, exactly one trailing dot, then DNS wire
    // encoding. The empty label after the trailing dot becomes the root
    // label's zero length byte.
    let canonical = format!("{}.", record_name.to_lowercase().trim_end_matches('.'));
    let mut wire = Vec::with_capacity(canonical.len() + 1);
    for label in canonical.split('.') {
        wire.push(label.len() as u8);
        wire.extend_from_slice(label.as_bytes());
    }

    let mut digest = sha1_with_salt(&wire, &salt);
    for _ in 0..iterations {
        digest = sha1_with_salt(&digest, &salt);
    }

    let encoded = base32::encode(base32::Alphabet::Rfc4648 { padding: false }, &digest);
    Ok(to_base32hex(&encoded).to_lowercase())
}

fn sha1_with_salt(value: &[u8], salt: &[u8]) -> Vec<u8> {
    use ring::digest;

    let mut input = Vec::with_capacity(value.len() + salt.len());
    input.extend_from_slice(value);
    input.extend_from_slice(salt);
    digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, &input)
        .as_ref()
        .to_vec()
}

const BASE32_STANDARD: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const BASE32_HEX: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";

/// Translate the standard RFC 4648 alphabet to base32hex, character by
/// character.
fn to_base32hex(encoded: &str) -> String {
    encoded
        .chars()
        .map(|c| {
            match BASE32_STANDARD.iter().position(|&b| b as char == c) {
                Some(i) => BASE32_HEX[i] as char,
                None => c,
            }
        })
        .collect()
}
