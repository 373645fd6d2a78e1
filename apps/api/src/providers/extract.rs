use serde_json::Value;

/// Wrapper keys providers use around their record list, in lookup order.
const LIST_KEYS: &[&str] = &["internships", "jobs", "yc_jobs", "results", "data"];

/// Locates the list of job records inside an arbitrary payload.
/// A payload with no recognisable list yields no records.
pub fn extract_list(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

/// Mutable counterpart of [`extract_list`], used to attach ratings in place.
pub fn extract_list_mut(payload: &mut Value) -> &mut [Value] {
    match payload {
        Value::Array(items) => items.as_mut_slice(),
        Value::Object(map) => {
            let Some(key) = LIST_KEYS
                .iter()
                .find(|key| map.get(**key).is_some_and(Value::is_array))
            else {
                return &mut [];
            };
            match map.get_mut(*key) {
                Some(Value::Array(items)) => items.as_mut_slice(),
                _ => &mut [],
            }
        }
        _ => &mut [],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrapped_and_bare_lists_extract_the_same_records() {
        let records = json!([{"id": "1"}, {"id": "2"}]);
        let jobs = json!({"jobs": records.clone()});
        let results = json!({"results": records.clone()});

        assert_eq!(extract_list(&records), extract_list(&jobs));
        assert_eq!(extract_list(&records), extract_list(&results));
        assert_eq!(extract_list(&records).len(), 2);
    }

    #[test]
    fn test_unrecognised_shape_is_empty() {
        assert!(extract_list(&json!({"foo": 1})).is_empty());
        assert!(extract_list(&json!("nope")).is_empty());
        assert!(extract_list(&Value::Null).is_empty());
    }

    #[test]
    fn test_lookup_order_prefers_earlier_keys() {
        let payload = json!({"data": [{"id": "d"}], "internships": [{"id": "i"}]});
        assert_eq!(extract_list(&payload)[0]["id"], "i");
    }

    #[test]
    fn test_non_list_wrapper_value_is_skipped() {
        let payload = json!({"jobs": {"count": 0}, "results": [{"id": "r"}]});
        assert_eq!(extract_list(&payload)[0]["id"], "r");
    }

    #[test]
    fn test_extract_list_mut_allows_in_place_edits() {
        let mut payload = json!({"yc_jobs": [{"id": "7"}]});
        for record in extract_list_mut(&mut payload) {
            record["rating"] = json!(8.0);
        }
        assert_eq!(payload["yc_jobs"][0]["rating"], 8.0);
        assert!(extract_list_mut(&mut json!({"foo": 1})).is_empty());
    }
}
