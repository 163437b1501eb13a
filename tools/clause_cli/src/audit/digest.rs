use anyhow::bail;
use serde::Serialize;
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Deterministic analysis id: `an_` + first 32 hex chars of
/// SHA-256(`<file_name>:<sha256(text)>`).
pub fn analysis_id_for(file_name: &str, text: &str) -> String {
    let text_sha = sha256_hex(text.as_bytes());
    let fingerprint = sha256_hex(format!("{}:{}", file_name, text_sha).as_bytes());
    format!("an_{}", &fingerprint[..32])
}

/// Compact JSON with keys sorted at every depth, the form audit hashes are
/// taken over. Non-integer numbers are rejected.
pub fn canonical_bytes<T: Serialize>(value: &T) -> anyhow::Result<Vec<u8>> {
    let value = serde_json::to_value(value)?;
    if let Some(n) = first_non_integer(&value) {
        bail!("canonical JSON forbids non-integer number {}", n);
    }
    // serde_json's default Map is a BTreeMap, so serialization is key-ordered.
    Ok(serde_json::to_vec(&value)?)
}

fn first_non_integer(value: &Value) -> Option<&Number> {
    match value {
        Value::Number(n) if !(n.is_i64() || n.is_u64()) => Some(n),
        Value::Array(items) => items.iter().find_map(first_non_integer),
        Value::Object(map) => map.values().find_map(first_non_integer),
        _ => None,
    }
}
