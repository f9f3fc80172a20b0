//! Tolerant mapping of export API responses
//!
//! The export API has shipped several response shapes over time. The mapper
//! locates the registrant collection and the continuation token by probing
//! ordered lists of candidate locations, and normalizes each entry into a
//! [`RegistrationRecord`].

use crate::domain::{EventId, ExportApiError, RegistrationPage, RegistrationRecord, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Envelope fields probed, in order, when the root is not an array
pub const ENVELOPE_FIELDS: &[&str] = &["registrants", "results", "data", "rows"];

/// Continuation token locations probed, in order. The first present key wins,
/// even when its value is `null`.
pub const TOKEN_PATHS: &[&[&str]] = &[
    &["next"],
    &["links", "next"],
    &["paging", "next"],
    &["paging", "next_page_token"],
];

/// Registrant entry as it appears on the wire
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRegistrant {
    #[serde(default, deserialize_with = "scalar_text")]
    registration_id: Option<String>,
    #[serde(default, rename = "registration_id", deserialize_with = "scalar_text")]
    registration_id_snake: Option<String>,

    #[serde(default)]
    event_id: Option<Value>,
    #[serde(default, rename = "event_id")]
    event_id_snake: Option<Value>,

    #[serde(default, deserialize_with = "scalar_text")]
    email: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    first_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    last_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    full_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    state: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    checked_in: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    paid: Option<bool>,

    #[serde(default, deserialize_with = "scalar_text")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    created_dt: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    created_date: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    modified_at: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    modified_dt: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    modified_date: Option<String>,

    #[serde(default, deserialize_with = "scalar_text")]
    category_path: Option<String>,
    #[serde(default, rename = "category_path", deserialize_with = "scalar_text")]
    category_path_snake: Option<String>,

    #[serde(default)]
    person: Option<Value>,
}

/// Maps raw response bodies into [`RegistrationPage`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationMapper;

impl RegistrationMapper {
    pub fn new() -> Self {
        Self
    }

    /// Parse `body` into a page; entries without an event id inherit `context_event_id`
    ///
    /// # Errors
    ///
    /// Returns [`ExportApiError::InvalidFormat`] if the body is not valid JSON.
    /// Individual entries that cannot be mapped are skipped, not reported.
    pub fn map_page(&self, body: &str, context_event_id: EventId) -> Result<RegistrationPage> {
        let root: Value = serde_json::from_str(body).map_err(|e| {
            ExportApiError::InvalidFormat(format!("Unable to parse export API response: {e}"))
        })?;

        let records = match locate_collection(&root) {
            Value::Array(entries) => entries
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| map_entry(entry, index, context_event_id))
                .collect(),
            single => map_entry(single, 0, context_event_id).into_iter().collect(),
        };

        Ok(RegistrationPage::new(records, continuation_token(&root)))
    }
}

/// Root array, else the first present envelope field, else the root itself
fn locate_collection(root: &Value) -> &Value {
    if root.is_array() {
        return root;
    }
    ENVELOPE_FIELDS
        .iter()
        .find_map(|field| root.get(*field))
        .unwrap_or(root)
}

/// First present token location, rendered as text
pub fn continuation_token(root: &Value) -> Option<String> {
    TOKEN_PATHS
        .iter()
        .find_map(|path| lookup(root, path))
        .and_then(token_text)
}

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.get(*key))
}

/// Strings and numbers as text; objects by their first field; `null` as none
fn token_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => match map.values().next() {
            Some(first) => token_text(first),
            None => Some(value.to_string()),
        },
        other => Some(other.to_string()),
    }
}

fn map_entry(entry: &Value, index: usize, context_event_id: EventId) -> Option<RegistrationRecord> {
    if entry.is_null() {
        tracing::warn!(index = index, "Skipping null registrant entry");
        return None;
    }

    let raw = match RawRegistrant::deserialize(entry) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(index = index, error = %e, "Skipping invalid registrant entry");
            return None;
        }
    };

    let Some(registration_id) = raw.registration_id.or(raw.registration_id_snake) else {
        tracing::warn!(index = index, "Skipping registrant entry without a registration id");
        return None;
    };

    // Unparseable ids under either spelling fall back to the context event
    let event_id = raw
        .event_id
        .as_ref()
        .and_then(lenient_event_id)
        .or_else(|| raw.event_id_snake.as_ref().and_then(lenient_event_id))
        .unwrap_or(context_event_id);

    let mut record = RegistrationRecord::new(registration_id, event_id);
    record.email = raw.email;
    record.first_name = raw.first_name;
    record.last_name = raw.last_name;
    record.full_name = raw.full_name;
    record.state = raw.state;
    record.checked_in = raw.checked_in;
    record.paid = raw.paid;
    record.created_at = raw.created_at.or(raw.created_dt).or(raw.created_date);
    record.modified_at = raw.modified_at.or(raw.modified_dt).or(raw.modified_date);
    record.category_path = raw.category_path.or(raw.category_path_snake);

    if let Some(person) = raw.person.as_ref().filter(|p| p.is_object()) {
        let field = |name: &str| person.get(name).and_then(scalar);
        record.full_name = record.full_name.or_else(|| field("full_name"));
        record.first_name = record.first_name.or_else(|| field("first_name"));
        record.last_name = record.last_name.or_else(|| field("last_name"));
        record.email = record.email.or_else(|| field("email"));
    }

    Some(record)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_event_id(value: &Value) -> Option<EventId> {
    lenient_id(value).and_then(|id| EventId::new(id).ok())
}

fn scalar_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expected a string, number or boolean")),
    }
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(_) => Err(serde::de::Error::custom("expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RollcallError;
    use serde_json::json;

    fn event(id: i64) -> EventId {
        EventId::new(id).unwrap()
    }

    fn map(body: &str) -> RegistrationPage {
        RegistrationMapper::new().map_page(body, event(7)).unwrap()
    }

    fn ids(page: &RegistrationPage) -> Vec<&str> {
        page.records()
            .iter()
            .map(|r| r.registration_id.as_str())
            .collect()
    }

    #[test]
    fn test_registrants_envelope() {
        let page = map(r#"{"registrants":[{"registrationId":"R1","email":"alice@example.org"}],"next":"2"}"#);

        assert_eq!(ids(&page), vec!["R1"]);
        assert_eq!(page.records()[0].email.as_deref(), Some("alice@example.org"));
        assert_eq!(page.records()[0].event_id, event(7));
        assert_eq!(page.next_page_token(), Some("2"));
    }

    #[test]
    fn test_envelope_shapes_map_identically() {
        let entry = json!({
            "registrationId": "R1",
            "eventId": 7,
            "email": "alice@example.org",
            "fullName": "Alice Liddell",
            "state": "complete",
            "checkedIn": true,
            "paid": false,
            "createdDt": "2024-01-01T10:00:00Z",
            "category_path": "Conferences/2024",
            "person": {"first_name": "Alice", "last_name": "Liddell"}
        });

        let shapes = [
            json!({ "registrants": [entry.clone()] }),
            json!({ "results": [entry.clone()] }),
            json!([entry.clone()]),
            json!({ "rows": [entry] }),
        ];
        let pages: Vec<RegistrationPage> =
            shapes.iter().map(|body| map(&body.to_string())).collect();

        let expected = &pages[0].records()[0];
        assert_eq!(expected.first_name.as_deref(), Some("Alice"));
        assert_eq!(expected.category_path.as_deref(), Some("Conferences/2024"));
        for page in &pages {
            assert_eq!(page.records(), std::slice::from_ref(expected));
        }
    }

    #[test]
    fn test_envelope_priority() {
        let page = map(r#"{"data":[{"registrationId":"D"}],"registrants":[{"registrationId":"R"}]}"#);
        assert_eq!(ids(&page), vec!["R"]);
    }

    #[test]
    fn test_root_object_is_single_record() {
        let page = map(r#"{"registrationId":"R9","fullName":"Bob"}"#);
        assert_eq!(ids(&page), vec!["R9"]);
        assert_eq!(page.records()[0].full_name.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_non_array_envelope_value_is_single_record() {
        let page = map(r#"{"data":{"registrationId":"R4"}}"#);
        assert_eq!(ids(&page), vec!["R4"]);
    }

    #[test]
    fn test_person_fallbacks() {
        let page = map(
            r#"[{"registrationId":"R1","person":{"email":"bob@example.org","full_name":"Bob Ross","first_name":"Bob","last_name":"Ross"}}]"#,
        );
        let record = &page.records()[0];
        assert_eq!(record.email.as_deref(), Some("bob@example.org"));
        assert_eq!(record.full_name.as_deref(), Some("Bob Ross"));
        assert_eq!(record.first_name.as_deref(), Some("Bob"));
        assert_eq!(record.last_name.as_deref(), Some("Ross"));
    }

    #[test]
    fn test_primary_fields_win_over_person() {
        let page = map(
            r#"[{"registrationId":"R1","email":"own@example.org","person":{"email":"other@example.org"}}]"#,
        );
        assert_eq!(page.records()[0].email.as_deref(), Some("own@example.org"));
    }

    #[test]
    fn test_snake_case_fallbacks() {
        let page = map(r#"[{"registration_id":42,"event_id":"12","category_path":"Root/Conferences"}]"#);
        let record = &page.records()[0];
        assert_eq!(record.registration_id, "42");
        assert_eq!(record.event_id, event(12));
        assert_eq!(record.category_path.as_deref(), Some("Root/Conferences"));
    }

    #[test]
    fn test_camel_case_wins_over_snake_case() {
        let page = map(r#"[{"registrationId":"A","registration_id":"B","eventId":3,"event_id":4}]"#);
        assert_eq!(page.records()[0].registration_id, "A");
        assert_eq!(page.records()[0].event_id, event(3));
    }

    #[test]
    fn test_unparseable_snake_event_id_inherits_context() {
        let page = map(r#"[{"registrationId":"A","event_id":"soon"}]"#);
        assert_eq!(page.records()[0].event_id, event(7));
    }

    #[test]
    fn test_unparseable_camel_event_id_inherits_context() {
        let page = map(r#"[{"registrationId":"A","eventId":"n/a"},{"registrationId":"B","eventId":0,"event_id":"5"}]"#);
        assert_eq!(ids(&page), vec!["A", "B"]);
        assert_eq!(page.records()[0].event_id, event(7));
        assert_eq!(page.records()[1].event_id, event(5));
    }

    #[test]
    fn test_multiple_date_spellings_keep_record() {
        let page = map(
            r#"[{"registrationId":"R1","createdAt":"2024-01-01","createdDt":"2023-12-31","modifiedDt":"2024-03-01","modifiedDate":"2024-02-01"},{"registrationId":"R2"}]"#,
        );
        assert_eq!(ids(&page), vec!["R1", "R2"]);
        let record = &page.records()[0];
        assert_eq!(record.created_at.as_deref(), Some("2024-01-01"));
        assert_eq!(record.modified_at.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_date_aliases_and_flags() {
        let page = map(
            r#"[{"registrationId":"A","createdDt":"2024-01-01T10:00:00Z","modifiedDate":"2024-02-01","checkedIn":true,"paid":"false","state":"complete"}]"#,
        );
        let record = &page.records()[0];
        assert_eq!(record.created_at.as_deref(), Some("2024-01-01T10:00:00Z"));
        assert_eq!(record.modified_at.as_deref(), Some("2024-02-01"));
        assert_eq!(record.checked_in, Some(true));
        assert_eq!(record.paid, Some(false));
        assert_eq!(record.state.as_deref(), Some("complete"));
    }

    #[test]
    fn test_null_and_malformed_entries_skipped() {
        let page = map(
            r#"[null,{"registrationId":"R1"},"garbage",{"registrationId":"R2","checkedIn":[1]},{"email":"x@y.z"},{"registrationId":"R3"}]"#,
        );
        assert_eq!(ids(&page), vec!["R1", "R3"]);
    }

    #[test]
    fn test_token_precedence() {
        let root = json!({"links": {"next": "L"}, "paging": {"next": "P"}});
        assert_eq!(continuation_token(&root).as_deref(), Some("L"));

        let root = json!({"paging": {"next_page_token": "T"}});
        assert_eq!(continuation_token(&root).as_deref(), Some("T"));

        let root = json!({"paging": {"next": 5, "next_page_token": "T"}});
        assert_eq!(continuation_token(&root).as_deref(), Some("5"));
    }

    #[test]
    fn test_present_null_token_stops_probing() {
        let root = json!({"next": null, "links": {"next": "L"}});
        assert_eq!(continuation_token(&root), None);
    }

    #[test]
    fn test_object_token_uses_first_field() {
        let root = json!({"next": {"cursor": {"value": "abc"}, "other": "x"}});
        assert_eq!(continuation_token(&root).as_deref(), Some("abc"));

        let root = json!({"next": {}});
        assert_eq!(continuation_token(&root).as_deref(), Some("{}"));
    }

    #[test]
    fn test_bare_array_has_no_token() {
        let page = map(r#"[{"registrationId":"R1"}]"#);
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_invalid_json_is_invalid_format() {
        let err = RegistrationMapper::new()
            .map_page("{not json", event(1))
            .unwrap_err();
        assert!(matches!(
            err,
            RollcallError::ExportApi(ExportApiError::InvalidFormat(_))
        ));
    }
}
