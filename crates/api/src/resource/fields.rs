//! Response field trimming.

use serde_json::Value;

/// Keep only `id` and `default_fields` on an object.
///
/// An empty `default_fields` means "everything". Non-object values pass
/// through unchanged.
#[must_use]
pub fn project_fields(value: Value, default_fields: &[&str]) -> Value {
    if default_fields.is_empty() {
        return value;
    }
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key == "id" || default_fields.contains(&key.as_str()))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_keeps_id_and_defaults() {
        let row = json!({"id": 1, "name": "Tee", "sku": "T-1", "description": "long"});
        assert_eq!(
            project_fields(row, &["name", "sku"]),
            json!({"id": 1, "name": "Tee", "sku": "T-1"})
        );
    }

    #[test]
    fn test_empty_defaults_keep_everything() {
        let row = json!({"id": 1, "name": "Tee"});
        assert_eq!(project_fields(row.clone(), &[]), row);
    }

    #[test]
    fn test_missing_default_field_is_skipped() {
        let row = json!({"id": 7, "name": "Summer"});
        assert_eq!(
            project_fields(row, &["name", "slug"]),
            json!({"id": 7, "name": "Summer"})
        );
    }
}
