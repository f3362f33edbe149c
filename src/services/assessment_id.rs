use crate::services::upstream_client::UpstreamResponse;
use serde_json::Value;
use url::Url;

const ID_FIELDS: &[&str] = &["assessmentId", "id"];
const NESTED_OBJECTS: &[&str] = &["data", "assessment"];
const ID_HEADERS: &[&str] = &["x-assessment-id", "assessment-id"];
const MAX_ID_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    JsonField,
    BareString,
    Header,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedId {
    pub id: String,
    pub source: IdSource,
}

// ====================================
// EXTRACTION

/// Recover the assessment identifier from a create response.
///
/// Tried in order: a JSON field, a bare identifier body, then the
/// `x-assessment-id` / `assessment-id` / `location` headers.
pub fn extract_assessment_id(resp: &UpstreamResponse) -> Option<ExtractedId> {
    let parsed = serde_json::from_str::<Value>(&resp.body).ok();

    if let Some(id) = parsed.as_ref().and_then(id_from_json) {
        return Some(ExtractedId {
            id,
            source: IdSource::JsonField,
        });
    }

    let bare = match &parsed {
        Some(Value::String(s)) => bare_identifier(s),
        // integers past i64/u64 parse as f64; the raw text still qualifies
        Some(number @ Value::Number(_)) => {
            scalar_id(number).or_else(|| bare_identifier(&resp.body))
        }
        Some(_) => None,
        None => bare_identifier(&resp.body),
    };
    if let Some(id) = bare {
        return Some(ExtractedId {
            id,
            source: IdSource::BareString,
        });
    }

    id_from_headers(resp).map(|id| ExtractedId {
        id,
        source: IdSource::Header,
    })
}

fn id_from_json(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    if let Some(id) = ID_FIELDS.iter().find_map(|f| obj.get(*f).and_then(scalar_id)) {
        return Some(id);
    }
    NESTED_OBJECTS
        .iter()
        .filter_map(|key| obj.get(*key).and_then(|v| v.as_object()))
        .find_map(|nested| ID_FIELDS.iter().find_map(|f| nested.get(*f).and_then(scalar_id)))
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}

fn id_from_headers(resp: &UpstreamResponse) -> Option<String> {
    if let Some(id) = ID_HEADERS
        .iter()
        .find_map(|h| resp.header(h).and_then(bare_identifier))
    {
        return Some(id);
    }
    resp.header("location").and_then(last_path_segment)
}

fn last_path_segment(location: &str) -> Option<String> {
    let location = location.trim();
    let segment = match Url::parse(location) {
        Ok(url) => url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .last()?
            .to_string(),
        // relative reference: only the path part counts
        Err(_) => location
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .rsplit('/')
            .find(|segment| !segment.is_empty())?
            .to_string(),
    };
    bare_identifier(&segment)
}

/// Accepts text that looks like an opaque identifier: after trimming
/// whitespace and surrounding quotes, 1-128 chars of `[A-Za-z0-9._-]`.
pub fn bare_identifier(text: &str) -> Option<String> {
    let candidate = text.trim().trim_matches('"').trim();
    if candidate.is_empty() || candidate.len() > MAX_ID_LEN {
        return None;
    }
    let valid = candidate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    valid.then(|| candidate.to_string())
}

// ====================================
// BODY NORMALIZATION

/// Parse an upstream body for echoing back to the caller.
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::json!({ "raw": text }))
}
