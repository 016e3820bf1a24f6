//! Parsing and validation of untrusted oracle output.
//!
//! The oracle is a probabilistic, externally-hosted component: its structured
//! output may be malformed, carry a string where a number was asked for, or
//! pair a valid id with a hallucinated name. This boundary enforces that only
//! catalog-known identifiers reach callers, always under the catalog's
//! canonical name.

use serde::Deserialize;
use serde_json::Value;

use finder_core::{Catalog, ClassificationResult, Error, Result};

/// The JSON object the oracle is instructed to emit.
#[derive(Debug, Deserialize)]
struct OracleReply {
    #[serde(default)]
    service_id: Value,
    // The oracle also emits a service_name; it is deliberately ignored
    // because the catalog is the single source of truth for naming.
}

/// Parse a `service_id` that may arrive as a JSON number or a numeric string.
fn parse_service_id(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Turn raw oracle text into a validated classification result.
///
/// Every failure mode maps to a failed result, never a panic and never an
/// error propagated past this boundary.
pub fn resolve(catalog: &Catalog, raw: &str) -> ClassificationResult {
    match try_resolve(catalog, raw) {
        Ok((service_id, name)) => ClassificationResult::matched(service_id, name),
        Err(e) => ClassificationResult::failure(e.to_string()),
    }
}

fn try_resolve<'a>(catalog: &'a Catalog, raw: &str) -> Result<(u32, &'a str)> {
    let reply: OracleReply = serde_json::from_str(raw.trim()).map_err(|e| {
        Error::oracle_format(format!("oracle reply is not a valid JSON object: {}", e))
    })?;

    let service_id = parse_service_id(&reply.service_id).ok_or_else(|| {
        Error::validation("oracle reply carries no usable service id; the request matched no service")
    })?;

    let name = catalog.name_of(service_id).ok_or_else(|| {
        Error::validation(format!(
            "oracle returned invalid service id {}; only catalog ids are accepted",
            service_id
        ))
    })?;

    Ok((service_id, name))
}
