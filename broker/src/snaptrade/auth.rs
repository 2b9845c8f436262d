//! HMAC-SHA256 request signing for the SnapTrade API.
//!
//! Each request carries a `Signature` header: the base64 HMAC-SHA256, keyed by
//! the consumer key, of a canonical JSON document
//! `{"content":<body or null>,"path":"/api/v1/...","query":"<query string>"}`
//! with object keys sorted and no whitespace.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Build the canonical document that gets signed.
pub fn signature_payload(path: &str, query: &str, content: Option<&Value>) -> String {
    let mut out = String::from("{\"content\":");
    match content {
        Some(body) => write_canonical(body, &mut out),
        None => out.push_str("null"),
    }
    out.push_str(",\"path\":");
    write_canonical(&Value::String(path.to_string()), &mut out);
    out.push_str(",\"query\":");
    write_canonical(&Value::String(query.to_string()), &mut out);
    out.push('}');
    out
}

/// Serialize `value` as compact JSON with object keys sorted at every level.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(&Value::String(key.clone()), out);
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Sign a request for the given path, query string and JSON body.
///
/// Returns the base64-encoded signature for the `Signature` header.
pub fn sign(consumer_key: &str, path: &str, query: &str, content: Option<&Value>) -> String {
    let payload = signature_payload(path, query, content);
    let mut mac =
        HmacSha256::new_from_slice(consumer_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
